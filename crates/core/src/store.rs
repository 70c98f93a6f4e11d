//! Key-value store abstraction used for save games and high scores
//!
//! The simulation never touches a storage medium directly. A session is handed
//! something implementing [`KeyValueStore`]; the on-disk implementation lives
//! in the `blockfall-store` crate, and [`MemoryStore`] covers tests and
//! headless use.

use std::collections::HashMap;

use crate::error::StoreError;

/// Key of the saved game record
pub const SAVE_KEY: &str = "tetrisSavedGame";

/// Key of the high-score table
pub const HIGH_SCORES_KEY: &str = "tetrisHighScores";

pub trait KeyValueStore {
    /// `Ok(None)` when nothing is stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(SAVE_KEY).unwrap(), None);

        store.set(SAVE_KEY, "{}").unwrap();
        assert_eq!(store.get(SAVE_KEY).unwrap().as_deref(), Some("{}"));
        assert_eq!(store.get(HIGH_SCORES_KEY).unwrap(), None);

        store.set(SAVE_KEY, "[]").unwrap();
        assert_eq!(store.get(SAVE_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(store.len(), 1);
    }
}
