//! コードバッファの永続化
//!
//! 障害はこの境界で吸収し、保存できない間はメモリ上の上書き層で動作する

use super::{GuardedStorage, KeyValueStorage, Namespace, StorageKey};
use crate::language::LanguageId;
use crate::problem::ProblemId;

/// (問題, 言語) ごとのコードバッファ保存
pub struct BufferStore {
    storage: GuardedStorage,
}

impl BufferStore {
    pub fn new<S: KeyValueStorage + 'static>(storage: S) -> Self {
        Self {
            storage: GuardedStorage::new("buffer", Box::new(storage)),
        }
    }

    /// 保存済みテキスト、無ければスターターコードを返す
    pub fn get(&mut self, problem: &ProblemId, language: LanguageId, starter: &str) -> String {
        let key = StorageKey::new(Namespace::Buffer, problem, language);
        self.storage
            .read(&key)
            .unwrap_or_else(|| starter.to_string())
    }

    /// テキストを上書き保存（失敗は無視）
    pub fn set(&mut self, problem: &ProblemId, language: LanguageId, text: &str) {
        let key = StorageKey::new(Namespace::Buffer, problem, language);
        self.storage.write(&key, text);
    }

    /// スターターコードに戻して保存し、そのテキストを返す
    pub fn reset(&mut self, problem: &ProblemId, language: LanguageId, starter: &str) -> String {
        self.set(problem, language, starter);
        starter.to_string()
    }

    /// メモリのみの動作に切り替わっているか
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
    use std::cell::Cell;
    use std::rc::Rc;

    /// 常に失敗し、呼び出し回数を数えるストレージ
    struct BrokenStorage {
        calls: Rc<Cell<usize>>,
    }

    impl KeyValueStorage for BrokenStorage {
        fn read(&self, _key: &StorageKey) -> Result<Option<String>> {
            self.calls.set(self.calls.get() + 1);
            Err(StorageError::Io {
                message: "quota exceeded".to_string(),
            })
        }

        fn write(&mut self, _key: &StorageKey, _value: &str) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            Err(StorageError::Io {
                message: "quota exceeded".to_string(),
            })
        }
    }

    #[test]
    fn test_get_falls_back_to_starter() {
        let mut store = BufferStore::new(MemoryStorage::new());
        let problem = ProblemId::from("two_sum");
        assert_eq!(store.get(&problem, LanguageId::Python, "pass"), "pass");
    }

    #[test]
    fn test_set_then_get() {
        let mut store = BufferStore::new(MemoryStorage::new());
        let problem = ProblemId::from("two_sum");
        store.set(&problem, LanguageId::Python, "return []");
        assert_eq!(store.get(&problem, LanguageId::Python, "pass"), "return []");
        assert_eq!(store.get(&problem, LanguageId::Go, "package main"), "package main");
    }

    #[test]
    fn test_reset_is_idempotent() {
        let storage = MemoryStorage::new();
        let mut store = BufferStore::new(storage.clone());
        let problem = ProblemId::from("two_sum");
        store.set(&problem, LanguageId::Java, "edited");

        assert_eq!(store.reset(&problem, LanguageId::Java, "starter"), "starter");
        assert_eq!(store.reset(&problem, LanguageId::Java, "starter"), "starter");
        assert_eq!(store.get(&problem, LanguageId::Java, "other"), "starter");
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_failures_degrade_to_memory_only() {
        let calls = Rc::new(Cell::new(0));
        let mut store = BufferStore::new(BrokenStorage {
            calls: Rc::clone(&calls),
        });
        let problem = ProblemId::from("two_sum");

        assert_eq!(store.get(&problem, LanguageId::Cpp, "int main() {}"), "int main() {}");
        assert!(store.is_degraded());

        store.set(&problem, LanguageId::Cpp, "edited");
        assert_eq!(store.get(&problem, LanguageId::Cpp, "int main() {}"), "edited");
        assert_eq!(store.reset(&problem, LanguageId::Cpp, "s"), "s");
        assert_eq!(calls.get(), 1);
    }
}
