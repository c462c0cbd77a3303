//! The durable storage seam.

use crate::CacheError;
use std::sync::Arc;

/// String-keyed, string-valued durable storage.
///
/// Shaped like browser local storage: values are opaque strings (JSON in
/// practice), keys are short fixed names such as `cartItems`.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` when absent.
    fn read_key(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, replacing any previous value.
    fn write_key(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete_key(&self, key: &str) -> Result<(), CacheError>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.read_key(key)?.is_some())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn read_key(&self, key: &str) -> Result<Option<String>, CacheError> {
        (**self).read_key(key)
    }

    fn write_key(&self, key: &str, value: &str) -> Result<(), CacheError> {
        (**self).write_key(key, value)
    }

    fn delete_key(&self, key: &str) -> Result<(), CacheError> {
        (**self).delete_key(key)
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        (**self).exists(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn read_key(&self, key: &str) -> Result<Option<String>, CacheError> {
        (**self).read_key(key)
    }

    fn write_key(&self, key: &str, value: &str) -> Result<(), CacheError> {
        (**self).write_key(key, value)
    }

    fn delete_key(&self, key: &str) -> Result<(), CacheError> {
        (**self).delete_key(key)
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        (**self).exists(key)
    }
}

/// Validate that a key is usable by every store implementation.
///
/// Keys must be non-empty and consist of ASCII alphanumerics, `-`, `_`,
/// `.` or `:`; a leading `.` is rejected so a key never names a hidden or
/// parent directory entry.
pub fn validate_key(key: &str) -> Result<(), CacheError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'));
    if valid {
        Ok(())
    } else {
        Err(CacheError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_accepts_storage_names() {
        assert!(validate_key("cartItems").is_ok());
        assert!(validate_key("cart:items").is_ok());
        assert!(validate_key("shipping_address.v2").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_paths() {
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key(".hidden").is_err());
    }
}
