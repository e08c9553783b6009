//! ファイルベースのストレージ
//!
//! 名前空間ごとに一つの JSON オブジェクトファイルを持つ。
//! 操作のたびにファイルを読み直すため、同じディレクトリを指す複数の
//! インスタンスは互いの書き込みを観測できる。

use super::{KeyValueStorage, Namespace, StorageKey};
use crate::error::storage::Result;
use crate::error::StorageError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

type Entries = BTreeMap<String, String>;

/// ディレクトリ配下の JSON ファイルに保存するストレージ
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 名前空間のファイルパス
    pub fn namespace_path(&self, namespace: Namespace) -> PathBuf {
        self.root.join(format!("{}.json", namespace.as_str()))
    }

    fn load(&self, namespace: Namespace) -> Result<Entries> {
        let path = self.namespace_path(namespace);
        if !path.exists() {
            return Ok(Entries::new());
        }

        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|err| StorageError::Corrupt {
            location: path.display().to_string(),
            message: err.to_string(),
        })
    }

    fn store(&self, namespace: Namespace, entries: &Entries) -> Result<()> {
        let path = self.namespace_path(namespace);
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(entries).map_err(|err| StorageError::Corrupt {
            location: path.display().to_string(),
            message: err.to_string(),
        })?;

        // 一時ファイルに書き込んでからアトミックに移動
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn read(&self, key: &StorageKey) -> Result<Option<String>> {
        let mut entries = self.load(key.namespace)?;
        Ok(entries.remove(&key.entry_name()))
    }

    fn write(&mut self, key: &StorageKey, value: &str) -> Result<()> {
        let mut entries = self.load(key.namespace)?;
        entries.insert(key.entry_name(), value.to_string());
        self.store(key.namespace, &entries)
    }
}
