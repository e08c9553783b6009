//! 遅延適用タスク
//!
//! リセット後の反映を少し遅らせるための、取り消し可能な予約。
//! イベントループから定期的に `take_due` を呼び、期限を過ぎたものだけ取り出す。
//! 予約は常に最大一件で、新しい予約や取り消しは古い予約を破棄する。

use super::surface::SurfaceTransaction;
use std::time::{Duration, Instant};

/// 予約の識別番号
pub type Ticket = u64;

#[derive(Debug, Clone)]
struct PendingApply {
    ticket: Ticket,
    due_at: Instant,
    transaction: SurfaceTransaction,
}

/// 遅延適用の予約
#[derive(Debug, Default)]
pub struct DeferredApply {
    pending: Option<PendingApply>,
    next_ticket: Ticket,
}

impl DeferredApply {
    pub fn new() -> Self {
        Self::default()
    }

    /// 予約を登録（既存の予約は破棄される）
    pub fn schedule(
        &mut self,
        transaction: SurfaceTransaction,
        now: Instant,
        delay: Duration,
    ) -> Ticket {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.pending = Some(PendingApply {
            ticket,
            due_at: now + delay,
            transaction,
        });
        ticket
    }

    /// 予約を取り消す（取り消した予約の番号を返す）
    pub fn cancel(&mut self) -> Option<Ticket> {
        self.pending.take().map(|pending| pending.ticket)
    }

    /// 期限を過ぎた予約を取り出す（一度だけ）
    pub fn take_due(&mut self, now: Instant) -> Option<SurfaceTransaction> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| now >= pending.due_at);
        if !due {
            return None;
        }
        self.pending.take().map(|pending| pending.transaction)
    }

    /// 期限に関わらず予約を取り出す
    pub fn take_now(&mut self) -> Option<SurfaceTransaction> {
        self.pending.take().map(|pending| pending.transaction)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// 予約中の番号
    pub fn pending_ticket(&self) -> Option<Ticket> {
        self.pending.as_ref().map(|pending| pending.ticket)
    }

    /// 予約の期限
    pub fn due_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{LanguageId, SyntaxGrammar};

    fn transaction(text: &str) -> SurfaceTransaction {
        SurfaceTransaction {
            language: LanguageId::Java,
            grammar: SyntaxGrammar::Java,
            text: text.to_string(),
            cursor: 0,
        }
    }

    #[test]
    fn test_fires_once_after_deadline() {
        let mut deferred = DeferredApply::new();
        let start = Instant::now();
        deferred.schedule(transaction("a"), start, Duration::from_millis(10));

        assert_eq!(deferred.take_due(start), None);
        assert!(deferred.is_pending());

        let fired = deferred.take_due(start + Duration::from_millis(10));
        assert_eq!(fired.map(|tx| tx.text), Some("a".to_string()));
        assert_eq!(deferred.take_due(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_new_schedule_supersedes_old() {
        let mut deferred = DeferredApply::new();
        let start = Instant::now();
        let first = deferred.schedule(transaction("old"), start, Duration::from_millis(10));
        let second = deferred.schedule(transaction("new"), start, Duration::from_millis(10));

        assert_ne!(first, second);
        assert_eq!(deferred.pending_ticket(), Some(second));
        let fired = deferred.take_due(start + Duration::from_millis(20));
        assert_eq!(fired.map(|tx| tx.text), Some("new".to_string()));
    }

    #[test]
    fn test_cancel_discards_pending() {
        let mut deferred = DeferredApply::new();
        let start = Instant::now();
        let ticket = deferred.schedule(transaction("a"), start, Duration::ZERO);

        assert_eq!(deferred.cancel(), Some(ticket));
        assert_eq!(deferred.cancel(), None);
        assert_eq!(deferred.take_due(start + Duration::from_secs(1)), None);
    }
}
