//! In-memory store.

use crate::store::{validate_key, KeyValueStore};
use crate::CacheError;
use dashmap::DashMap;

/// Volatile store backed by a concurrent map.
///
/// Used by tests and by embedders that do not need the cart to survive a
/// restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryStore {
    fn read_key(&self, key: &str) -> Result<Option<String>, CacheError> {
        validate_key(key)?;
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn write_key(&self, key: &str, value: &str) -> Result<(), CacheError> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_key(&self, key: &str) -> Result<(), CacheError> {
        validate_key(key)?;
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let store = MemoryStore::new();
        store.write_key("paymentMethod", "\"COD\"").unwrap();
        assert_eq!(
            store.read_key("paymentMethod").unwrap().as_deref(),
            Some("\"COD\"")
        );
        assert!(store.exists("paymentMethod").unwrap());
    }

    #[test]
    fn test_delete_absent_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.delete_key("cartItems").is_ok());
        assert!(store.is_empty());
    }

    #[test]
    fn test_keys_sorted() {
        let store = MemoryStore::new();
        store.write_key("b", "1").unwrap();
        store.write_key("a", "2").unwrap();
        assert_eq!(store.keys(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(store.len(), 2);
    }
}
