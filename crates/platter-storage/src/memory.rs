//! In-process storage. Nothing survives the process.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::{validate_key, StateStorage};

/// `StateStorage` backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Checks if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StateStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("cart-store").await.unwrap(), None);

        storage.set_item("cart-store", "{}").await.unwrap();
        storage.set_item("cart-store", "[1]").await.unwrap();
        assert_eq!(storage.get_item("cart-store").await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(storage.len(), 1);

        storage.remove_item("cart-store").await.unwrap();
        storage.remove_item("cart-store").await.unwrap();
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_bad_key() {
        let storage = MemoryStorage::new();
        assert!(storage.set_item("a/b", "x").await.is_err());
    }
}
