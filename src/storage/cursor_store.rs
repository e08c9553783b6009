//! カーソル位置の永続化

use super::{GuardedStorage, KeyValueStorage, Namespace, StorageKey};
use crate::language::LanguageId;
use crate::problem::ProblemId;

/// (問題, 言語) ごとのカーソル位置（文字オフセット）保存
///
/// 未保存（`None`）と位置 0 は区別される。`None` は既定位置の推定を意味する。
pub struct CursorStore {
    storage: GuardedStorage,
}

impl CursorStore {
    pub fn new<S: KeyValueStorage + 'static>(storage: S) -> Self {
        Self {
            storage: GuardedStorage::new("cursor", Box::new(storage)),
        }
    }

    pub fn get(&mut self, problem: &ProblemId, language: LanguageId) -> Option<usize> {
        let key = StorageKey::new(Namespace::Cursor, problem, language);
        let raw = self.storage.read(&key)?;
        match raw.trim().parse::<usize>() {
            Ok(offset) => Some(offset),
            Err(_) => {
                log::warn!(
                    "ignoring unreadable cursor mark for {}: {:?}",
                    key.entry_name(),
                    raw
                );
                None
            }
        }
    }

    pub fn set(&mut self, problem: &ProblemId, language: LanguageId, offset: usize) {
        let key = StorageKey::new(Namespace::Cursor, problem, language);
        self.storage.write(&key, &offset.to_string());
    }

    pub fn is_degraded(&self) -> bool {
        self.storage.is_degraded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::storage::Result;
    use crate::error::StorageError;
    use crate::storage::MemoryStorage;

    struct ReadOnlyStorage;

    impl KeyValueStorage for ReadOnlyStorage {
        fn read(&self, _key: &StorageKey) -> Result<Option<String>> {
            Ok(Some("7".to_string()))
        }

        fn write(&mut self, _key: &StorageKey, _value: &str) -> Result<()> {
            Err(StorageError::Io {
                message: "read-only".to_string(),
            })
        }
    }

    #[test]
    fn test_absent_is_distinct_from_zero() {
        let mut store = CursorStore::new(MemoryStorage::new());
        let problem = ProblemId::from("two_sum");
        assert_eq!(store.get(&problem, LanguageId::Python), None);

        store.set(&problem, LanguageId::Python, 0);
        assert_eq!(store.get(&problem, LanguageId::Python), Some(0));
    }

    #[test]
    fn test_unreadable_mark_is_absent() {
        let mut storage = MemoryStorage::new();
        let problem = ProblemId::from("two_sum");
        storage
            .write(&StorageKey::new(Namespace::Cursor, &problem, LanguageId::Go), "-3")
            .unwrap();

        let mut store = CursorStore::new(storage);
        assert_eq!(store.get(&problem, LanguageId::Go), None);
        assert!(!store.is_degraded());
    }

    #[test]
    fn test_write_failure_switches_to_memory() {
        let mut store = CursorStore::new(ReadOnlyStorage);
        let problem = ProblemId::from("p");
        assert_eq!(store.get(&problem, LanguageId::Java), Some(7));

        store.set(&problem, LanguageId::Java, 3);
        assert!(store.is_degraded());
        assert_eq!(store.get(&problem, LanguageId::Java), Some(3));
        // 上書きしていない位置は元のストレージから読める
        assert_eq!(store.get(&problem, LanguageId::Go), Some(7));
    }
}
