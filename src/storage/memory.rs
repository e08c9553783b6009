//! メモリ上のストレージ
//!
//! クローンは同じ領域を共有する（同一環境内の一つの保存領域に相当）

use super::{KeyValueStorage, Namespace, StorageKey};
use crate::error::storage::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// 共有ハンドル型のメモリストレージ
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<(Namespace, String), String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みエントリ数
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &StorageKey) -> Result<Option<String>> {
        Ok(self
            .entries
            .borrow()
            .get(&(key.namespace, key.entry_name()))
            .cloned())
    }

    fn write(&mut self, key: &StorageKey, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert((key.namespace, key.entry_name()), value.to_string());
        Ok(())
    }
}
