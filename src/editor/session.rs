//! エディタセッションコントローラー
//!
//! (問題, 言語) ごとのバッファを保持し、言語切り替え・リセット時には
//! テキストとカーソルを一つのトランザクションとして編集面へ反映する。
//!
//! 状態遷移:
//! * Idle: 問題未ロード
//! * Ready: 一つの言語が選択され、表示内容がそのバッファと一致している
//! * Resetting: リセットの遅延反映を待っている

use super::deferred::DeferredApply;
use super::heuristic::{clamp_offset, find_insertion_point};
use super::surface::{EditorSurface, SurfaceTransaction};
use crate::config::SessionOptions;
use crate::error::{ConfigError, Result, SessionError};
use crate::language::{LanguageId, PresentationTable};
use crate::logging::{SessionEvent, SessionEventLog};
use crate::problem::{ProblemId, StarterCode};
use crate::storage::{BufferStore, CursorStore, FileStorage, MemoryStorage};
use std::time::{Duration, Instant};

/// セッションの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Ready,
    Resetting,
}

/// 表示中の問題に関するメモリ上の状態
#[derive(Debug)]
struct ActiveSession {
    problem: ProblemId,
    starter: StarterCode,
    active: LanguageId,
    /// 言語ごとの作業中テキスト（正本）
    buffers: [String; LanguageId::COUNT],
}

/// エディタセッションコントローラー
pub struct EditorSessionController<S: EditorSurface> {
    surface: S,
    buffer_store: BufferStore,
    cursor_store: CursorStore,
    presentation: PresentationTable,
    default_language: LanguageId,
    reset_delay: Duration,
    session: Option<ActiveSession>,
    deferred: DeferredApply,
    event_log: Option<SessionEventLog>,
}

impl<S: EditorSurface> EditorSessionController<S> {
    pub fn new(surface: S, buffer_store: BufferStore, cursor_store: CursorStore) -> Self {
        let options = SessionOptions::default();
        Self {
            surface,
            buffer_store,
            cursor_store,
            presentation: PresentationTable::default(),
            default_language: options.default_language(),
            reset_delay: options.reset_apply_delay(),
            session: None,
            deferred: DeferredApply::new(),
            event_log: None,
        }
    }

    /// オプションから保存先とログを構成して作成
    ///
    /// 保存先ディレクトリを決定できない環境では、メモリ上のみで動作する。
    pub fn from_options(surface: S, options: &SessionOptions) -> Result<Self> {
        let (buffer_store, cursor_store) = match options.resolve_storage_dir() {
            Some(dir) => (
                BufferStore::new(FileStorage::new(dir.clone())),
                CursorStore::new(FileStorage::new(dir)),
            ),
            None => {
                log::warn!("no storage directory available, buffers will not survive a reload");
                let storage = MemoryStorage::new();
                (BufferStore::new(storage.clone()), CursorStore::new(storage))
            }
        };

        let mut controller = Self::new(surface, buffer_store, cursor_store)
            .with_reset_delay(options.reset_apply_delay())
            .with_default_language(options.default_language());

        if let Some(path) = &options.event_log_path {
            let event_log =
                SessionEventLog::new(path.clone()).map_err(|err| ConfigError::InvalidFile {
                    path: path.display().to_string(),
                    message: err.to_string(),
                })?;
            controller.event_log = Some(event_log);
        }
        Ok(controller)
    }

    pub fn with_presentation(mut self, presentation: PresentationTable) -> Self {
        self.presentation = presentation;
        self
    }

    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    pub fn with_default_language(mut self, language: LanguageId) -> Self {
        self.default_language = language;
        self
    }

    pub fn with_event_log(mut self, event_log: SessionEventLog) -> Self {
        self.event_log = Some(event_log);
        self
    }

    /// 問題を開く
    ///
    /// 全言語のバッファを保存済みテキスト（無ければスターターコード）で初期化し、
    /// 既定言語を表示する。
    pub fn initialize(&mut self, problem: ProblemId, starter: StarterCode) {
        if let Some(ticket) = self.deferred.cancel() {
            log::debug!("discarding pending reset apply {} on initialize", ticket);
        }

        let buffers = LanguageId::ALL
            .map(|lang| self.buffer_store.get(&problem, lang, starter.get(lang)));
        let active = self.default_language;
        let text = buffers[active.index()].clone();
        let cursor = restore_cursor(&mut self.cursor_store, &problem, active, &text);

        let event = SessionEvent::Initialize {
            problem: problem.clone(),
            language: active,
            cursor,
        };
        self.session = Some(ActiveSession {
            problem,
            starter,
            active,
            buffers,
        });
        let transaction = self.transaction(active, text, cursor);
        self.apply(&transaction);
        self.record_event(&event);
    }

    /// 編集面でのテキスト変更を反映し、保存する
    ///
    /// リセットの反映待ち中に呼ばれた場合、その反映は破棄される。
    /// 利用者が入力した内容を後から届いたスターターコードで上書きしないため、
    /// 言語切り替え・再リセットと同じく「最後の操作」として扱う。
    pub fn on_content_change(&mut self, new_text: &str) -> Result<()> {
        let session = self.session.as_mut().ok_or(SessionError::NotInitialized)?;
        let superseded = self.deferred.cancel();

        let language = session.active;
        session.buffers[language.index()] = new_text.to_string();
        self.buffer_store.set(&session.problem, language, new_text);

        if let Some(offset) = self.surface.cursor_offset() {
            self.cursor_store.set(&session.problem, language, offset);
        }

        if let Some(ticket) = superseded {
            log::debug!("content change superseded pending reset apply {}", ticket);
            self.record_event(&SessionEvent::ResetSuperseded { ticket });
        }
        Ok(())
    }

    /// 言語を切り替える（同じ言語なら何もしない）
    pub fn switch_language(&mut self, target: LanguageId) -> Result<()> {
        let session = self.session.as_mut().ok_or(SessionError::NotInitialized)?;
        if session.active == target {
            return Ok(());
        }

        let superseded = self.deferred.cancel();
        let outgoing = session.active;

        self.buffer_store.set(
            &session.problem,
            outgoing,
            &session.buffers[outgoing.index()],
        );
        // リセット反映待ちの間は編集面の内容が古いため、カーソルを記録しない
        if superseded.is_none() {
            if let Some(offset) = self.surface.cursor_offset() {
                self.cursor_store.set(&session.problem, outgoing, offset);
            }
        }

        let text = session.buffers[target.index()].clone();
        let cursor = restore_cursor(&mut self.cursor_store, &session.problem, target, &text);
        session.active = target;

        let transaction = self.transaction(target, text, cursor);
        self.apply(&transaction);

        if let Some(ticket) = superseded {
            self.record_event(&SessionEvent::ResetSuperseded { ticket });
        }
        self.record_event(&SessionEvent::SwitchLanguage {
            from: outgoing,
            to: target,
            cursor,
        });
        Ok(())
    }

    /// 選択中の言語をスターターコードに戻す
    pub fn reset(&mut self) -> Result<()> {
        self.reset_at(Instant::now())
    }

    /// 基準時刻を指定してリセット
    ///
    /// 反映は遅延が 0 でなければ `process_timers` まで保留される。
    pub fn reset_at(&mut self, now: Instant) -> Result<()> {
        let session = self.session.as_mut().ok_or(SessionError::NotInitialized)?;

        if let Some(ticket) = self.deferred.cancel() {
            log::debug!("reset superseded pending reset apply {}", ticket);
        }

        let language = session.active;
        let text = self
            .buffer_store
            .reset(&session.problem, language, session.starter.get(language));
        session.buffers[language.index()] = text.clone();

        // 保存済みのカーソル位置は使わず、常に推定し直す
        let cursor = find_insertion_point(&text);
        let transaction = self.transaction(language, text, cursor);

        let deferred = if self.reset_delay.is_zero() {
            self.apply(&transaction);
            None
        } else {
            Some(self.deferred.schedule(transaction, now, self.reset_delay))
        };
        self.record_event(&SessionEvent::Reset { language, deferred });
        Ok(())
    }

    /// 期限を過ぎた遅延反映を処理（反映したら true）
    pub fn process_timers(&mut self) -> bool {
        self.process_timers_at(Instant::now())
    }

    pub fn process_timers_at(&mut self, now: Instant) -> bool {
        match self.deferred.take_due(now) {
            Some(transaction) => {
                self.apply(&transaction);
                self.record_event(&SessionEvent::ResetApplied {
                    language: transaction.language,
                });
                true
            }
            None => false,
        }
    }

    /// 遅延反映を期限を待たずに適用
    pub fn flush_pending(&mut self) -> bool {
        match self.deferred.take_now() {
            Some(transaction) => {
                self.apply(&transaction);
                self.record_event(&SessionEvent::ResetApplied {
                    language: transaction.language,
                });
                true
            }
            None => false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.session, self.deferred.is_pending()) {
            (None, _) => SessionPhase::Idle,
            (Some(_), false) => SessionPhase::Ready,
            (Some(_), true) => SessionPhase::Resetting,
        }
    }

    pub fn problem(&self) -> Option<&ProblemId> {
        self.session.as_ref().map(|session| &session.problem)
    }

    pub fn active_language(&self) -> Option<LanguageId> {
        self.session.as_ref().map(|session| session.active)
    }

    /// 選択中の言語の作業中テキスト
    pub fn visible_text(&self) -> Option<&str> {
        self.session
            .as_ref()
            .map(|session| session.buffers[session.active.index()].as_str())
    }

    /// 任意の言語の作業中テキスト
    pub fn buffer(&self, language: LanguageId) -> Option<&str> {
        self.session
            .as_ref()
            .map(|session| session.buffers[language.index()].as_str())
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// 永続化をあきらめてメモリのみで動作しているか
    pub fn is_storage_degraded(&self) -> bool {
        self.buffer_store.is_degraded() || self.cursor_store.is_degraded()
    }

    fn transaction(&self, language: LanguageId, text: String, cursor: usize) -> SurfaceTransaction {
        SurfaceTransaction {
            language,
            grammar: self.presentation.grammar(language),
            text,
            cursor,
        }
    }

    fn apply(&mut self, transaction: &SurfaceTransaction) {
        self.surface.apply(transaction);
        self.surface.focus();
    }

    fn record_event(&self, event: &SessionEvent) {
        if let Some(event_log) = &self.event_log {
            if let Err(err) = event_log.record(event) {
                log::warn!("failed to write session event {}: {}", event.kind(), err);
            }
        }
    }
}

/// 保存済みカーソル（テキスト長に収める）、無ければ推定位置
fn restore_cursor(
    cursor_store: &mut CursorStore,
    problem: &ProblemId,
    language: LanguageId,
    text: &str,
) -> usize {
    match cursor_store.get(problem, language) {
        Some(mark) => clamp_offset(mark, text),
        None => find_insertion_point(text),
    }
}
