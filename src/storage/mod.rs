//! 永続ストレージ
//!
//! (問題, 言語) をキーとするバッファ・カーソルの保存先。
//! コントローラは具体的な保存先ではなく `KeyValueStorage` に依存する。

pub mod buffer_store;
pub mod cursor_store;
pub mod file;
pub mod memory;

pub use buffer_store::BufferStore;
pub use cursor_store::CursorStore;
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::storage::Result;
use crate::error::StorageError;
use crate::language::LanguageId;
use crate::problem::ProblemId;

/// 論理的な名前空間
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    Buffer,
    Cursor,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Buffer => "buffer",
            Namespace::Cursor => "cursor",
        }
    }
}

/// ストレージキー
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    pub namespace: Namespace,
    pub problem: ProblemId,
    pub language: LanguageId,
}

impl StorageKey {
    pub fn new(namespace: Namespace, problem: &ProblemId, language: LanguageId) -> Self {
        Self {
            namespace,
            problem: problem.clone(),
            language,
        }
    }

    /// 名前空間内での複合キー
    pub fn entry_name(&self) -> String {
        format!("{}:{}", self.problem, self.language)
    }
}

/// キー・値ストレージ
pub trait KeyValueStorage {
    /// 値を読み込む（未保存なら `None`）
    fn read(&self, key: &StorageKey) -> Result<Option<String>>;

    /// 値を上書き保存
    fn write(&mut self, key: &StorageKey, value: &str) -> Result<()>;
}

/// 障害をストア境界で吸収するラッパー
///
/// 書き込みに失敗すると、以降の書き込みはメモリ上の上書き層にのみ行う。
/// 読み込みは上書き層を優先し、無ければ元のストレージを参照する。
/// 元のストレージの読み込みが失敗した時点で、そちらは一切参照しなくなる。
pub(crate) struct GuardedStorage {
    label: &'static str,
    primary: Box<dyn KeyValueStorage>,
    overlay: Option<MemoryStorage>,
    primary_readable: bool,
}

impl GuardedStorage {
    pub(crate) fn new(label: &'static str, primary: Box<dyn KeyValueStorage>) -> Self {
        Self {
            label,
            primary,
            overlay: None,
            primary_readable: true,
        }
    }

    pub(crate) fn is_degraded(&self) -> bool {
        self.overlay.is_some()
    }

    pub(crate) fn read(&mut self, key: &StorageKey) -> Option<String> {
        if let Some(overlay) = &self.overlay {
            if let Ok(Some(value)) = overlay.read(key) {
                return Some(value);
            }
        }
        if !self.primary_readable {
            return None;
        }

        match self.primary.read(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("{} storage unreadable, ignoring saved data: {}", self.label, err);
                self.primary_readable = false;
                self.start_overlay(&err);
                None
            }
        }
    }

    pub(crate) fn write(&mut self, key: &StorageKey, value: &str) {
        if self.overlay.is_none() {
            match self.primary.write(key, value) {
                Ok(()) => return,
                Err(err) => self.start_overlay(&err),
            }
        }

        if let Some(overlay) = self.overlay.as_mut() {
            // メモリ上の書き込みは失敗しない
            let _ = overlay.write(key, value);
        }
    }

    fn start_overlay(&mut self, error: &StorageError) {
        if self.overlay.is_some() {
            return;
        }
        log::warn!(
            "{} storage unavailable, continuing in memory only: {}",
            self.label,
            error
        );
        self.overlay = Some(MemoryStorage::new());
    }
}
