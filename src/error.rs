//! エラーハンドリングシステム
//!
//! codedrill 全体で使用される統一されたエラー型を定義
//! ストレージ障害はストア境界で吸収し、実行系のエラーのみ利用者へ表示する

use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrillError {
    /// ストレージ操作エラー
    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    /// セッション操作エラー
    #[error("Session operation failed: {0}")]
    Session(#[from] SessionError),

    /// 問題データエラー
    #[error("Problem content error: {0}")]
    Problem(#[from] ProblemError),

    /// コード実行エラー
    #[error("Execution failed: {0}")]
    Execution(#[from] ExecutionError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// 永続ストレージ固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Corrupt storage data in {location}: {message}")]
    Corrupt { location: String, message: String },
}

/// セッション操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("No problem is loaded")]
    NotInitialized,
}

/// 問題データ固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("Starter code is missing for language: {language}")]
    MissingStarterCode { language: String },

    #[error("Unknown language: {name}")]
    UnknownLanguage { name: String },

    #[error("Failed to fetch problem {problem}: {reason}")]
    Fetch { problem: String, reason: String },

    #[error("Invalid problem content: {message}")]
    Parse { message: String },
}

/// 実行リクエストの検証エラー（ネットワーク呼び出し前に確定する）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields { fields: Vec<&'static str> },

    #[error("Unsupported language: {name}")]
    UnknownLanguage { name: String },
}

/// バックエンドが報告した失敗の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendFailure {
    CompilationError,
    InternalError,
}

impl BackendFailure {
    /// ペイロード上の `status` 文字列から種別を判定
    pub fn from_status(status: &str) -> Option<Self> {
        match status {
            "compilation_error" => Some(Self::CompilationError),
            "internal_error" => Some(Self::InternalError),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CompilationError => "compilation_error",
            Self::InternalError => "internal_error",
        }
    }
}

/// 通信経路のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Execution service unreachable: {message}")]
    Unreachable { message: String },

    #[error("Execution service returned status {status}")]
    Status { status: u16 },

    #[error("Malformed execution response: {message}")]
    MalformedBody { message: String },
}

/// コード実行の失敗
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}: {message}", .kind.as_str())]
    Backend { kind: BackendFailure, message: String },

    /// プロキシが `error` フィールド付きで中継した失敗
    #[error("{message}")]
    Relayed { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ExecutionError {
    /// UI のエラー欄に表示する文字列
    pub fn user_message(&self) -> String {
        match self {
            ExecutionError::Validation(err) => err.to_string(),
            ExecutionError::Backend { message, .. } => message.clone(),
            ExecutionError::Relayed { message, .. } => message.clone(),
            ExecutionError::Transport(_) => "Execution failed".to_string(),
        }
    }
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration file {path}: {message}")]
    InvalidFile { path: String, message: String },
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, DrillError>;

/// 各モジュール固有のResult型
pub mod storage {
    pub type Result<T> = std::result::Result<T, super::StorageError>;
}

pub mod execution {
    pub type Result<T> = std::result::Result<T, super::ExecutionError>;
}

// std::io::Error から StorageError への変換
impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        StorageError::Io {
            message: error.to_string(),
        }
    }
}

impl From<std::io::Error> for DrillError {
    fn from(error: std::io::Error) -> Self {
        DrillError::Storage(error.into())
    }
}

impl From<serde_json::Error> for ProblemError {
    fn from(error: serde_json::Error) -> Self {
        ProblemError::Parse {
            message: error.to_string(),
        }
    }
}
