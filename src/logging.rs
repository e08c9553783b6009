//! セッションイベントログ
//!
//! エディタセッションの遷移を JSON Lines 形式で記録する。
//! 診断メッセージは `log` クレートへ出力し、こちらは機械可読な記録に使う。

use crate::config::ensure_parent_dir;
use crate::editor::deferred::Ticket;
use crate::language::LanguageId;
use crate::problem::ProblemId;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// コントローラーが記録する遷移
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    /// 問題を開いた
    Initialize {
        problem: ProblemId,
        language: LanguageId,
        cursor: usize,
    },
    SwitchLanguage {
        from: LanguageId,
        to: LanguageId,
        cursor: usize,
    },
    /// `deferred` が `Some` なら反映は保留中
    Reset {
        language: LanguageId,
        deferred: Option<Ticket>,
    },
    ResetApplied { language: LanguageId },
    /// 保留中の反映が後続の操作で破棄された
    ResetSuperseded { ticket: Ticket },
}

impl SessionEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::Initialize { .. } => "initialize",
            SessionEvent::SwitchLanguage { .. } => "switch_language",
            SessionEvent::Reset { .. } => "reset",
            SessionEvent::ResetApplied { .. } => "reset_applied",
            SessionEvent::ResetSuperseded { .. } => "reset_superseded",
        }
    }
}

/// ログの一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// UNIX 時刻（ミリ秒）
    pub at_ms: u64,
    pub event: SessionEvent,
}

/// 追記専用のイベントログ
///
/// ファイルは作成時に一度だけ開き、一件ごとに一行書き込む。
#[derive(Debug)]
pub struct SessionEventLog {
    path: PathBuf,
    file: File,
}

impl SessionEventLog {
    pub fn new(path: PathBuf) -> io::Result<Self> {
        ensure_parent_dir(&path)?;
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn record(&self, event: &SessionEvent) -> io::Result<()> {
        let record = EventRecord {
            at_ms: now_ms(),
            event: event.clone(),
        };
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        // 一行を一回の write で追記する
        (&self.file).write_all(&line)
    }

    /// 記録済みのイベントを読み戻す
    pub fn read_events<P: AsRef<Path>>(path: P) -> io::Result<Vec<EventRecord>> {
        fs::read_to_string(path)?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(io::Error::from))
            .collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
