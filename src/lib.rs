//! codedrill - コーディング練習ツールのエディタセッション基盤
//!
//! (問題, 言語) ごとのコードバッファとカーソル位置を保持・永続化し、
//! 言語切り替えやリセットを編集面へ一括で反映する

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;

// データ層
pub mod language;
pub mod problem;
pub mod storage;

// 編集層
pub mod editor;

// 外部サービス
pub mod execution;

// 表示層との境界
pub mod workspace;

// 公開API
pub use config::SessionOptions;
pub use editor::{EditorSessionController, EditorSurface, MemorySurface, SessionPhase};
pub use error::{DrillError, Result};
pub use language::LanguageId;
pub use problem::{ProblemContent, ProblemId, StarterCode};
pub use storage::{BufferStore, CursorStore, FileStorage, MemoryStorage};
pub use workspace::{PracticeView, RunPanel};
