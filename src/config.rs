use crate::error::ConfigError;
use crate::language::LanguageId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// リセット反映の既定の遅延
pub const DEFAULT_RESET_APPLY_DELAY_MS: u64 = 10;

/// エディタセッションのオプション
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// バッファ・カーソルの保存先（未指定時は `<data_dir>/codedrill`）
    pub storage_dir: Option<PathBuf>,
    /// セッションイベントログの出力先（未指定時は出力しない）
    pub event_log_path: Option<PathBuf>,
    /// リセット反映の遅延（ミリ秒、0 なら即時）
    pub reset_apply_delay_ms: Option<u64>,
    /// 問題を開いたときに選択する言語
    pub default_language: Option<LanguageId>,
}

impl SessionOptions {
    /// JSON 設定ファイルを読み込む
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let invalid = |message: String| ConfigError::InvalidFile {
            path: path.display().to_string(),
            message,
        };

        let content = fs::read_to_string(path).map_err(|err| invalid(err.to_string()))?;
        serde_json::from_str(&content).map_err(|err| invalid(err.to_string()))
    }

    pub fn resolve_storage_dir(&self) -> Option<PathBuf> {
        match &self.storage_dir {
            Some(path) => Some(path.clone()),
            None => default_storage_dir(),
        }
    }

    pub fn reset_apply_delay(&self) -> Duration {
        Duration::from_millis(
            self.reset_apply_delay_ms
                .unwrap_or(DEFAULT_RESET_APPLY_DELAY_MS),
        )
    }

    pub fn default_language(&self) -> LanguageId {
        self.default_language.unwrap_or(LanguageId::PRIMARY)
    }

    pub fn merged_with(&self, overrides: &SessionOptions) -> SessionOptions {
        SessionOptions {
            storage_dir: overrides
                .storage_dir
                .clone()
                .or_else(|| self.storage_dir.clone()),
            event_log_path: overrides
                .event_log_path
                .clone()
                .or_else(|| self.event_log_path.clone()),
            reset_apply_delay_ms: overrides
                .reset_apply_delay_ms
                .or(self.reset_apply_delay_ms),
            default_language: overrides.default_language.or(self.default_language),
        }
    }
}

fn default_storage_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|data| data.join("codedrill"))
}

/// ヘルパー：親ディレクトリを作成
pub(crate) fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_apply_when_unset() {
        let options = SessionOptions::default();
        assert_eq!(options.reset_apply_delay(), Duration::from_millis(10));
        assert_eq!(options.default_language(), LanguageId::Python);
        assert_eq!(options.event_log_path, None);
    }

    #[test]
    fn overrides_take_precedence() {
        let base = SessionOptions {
            storage_dir: Some(PathBuf::from("/base")),
            reset_apply_delay_ms: Some(25),
            ..SessionOptions::default()
        };
        let overrides = SessionOptions {
            reset_apply_delay_ms: Some(0),
            default_language: Some(LanguageId::Go),
            ..SessionOptions::default()
        };

        let merged = base.merged_with(&overrides);
        assert_eq!(merged.storage_dir, Some(PathBuf::from("/base")));
        assert_eq!(merged.reset_apply_delay(), Duration::ZERO);
        assert_eq!(merged.default_language(), LanguageId::Go);
    }

    #[test]
    fn loads_partial_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("codedrill.json");
        fs::write(&path, r#"{"default_language": "cpp", "reset_apply_delay_ms": 5}"#).unwrap();

        let options = SessionOptions::load(&path).unwrap();
        assert_eq!(options.default_language(), LanguageId::Cpp);
        assert_eq!(options.reset_apply_delay(), Duration::from_millis(5));
        assert_eq!(options.storage_dir, None);
    }

    #[test]
    fn rejects_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("codedrill.json");
        fs::write(&path, r#"{"default_language": "cobol"}"#).unwrap();

        assert!(matches!(
            SessionOptions::load(&path),
            Err(ConfigError::InvalidFile { .. })
        ));
    }
}
