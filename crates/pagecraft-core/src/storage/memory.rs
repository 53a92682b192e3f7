//! In-memory key-value storage

use std::collections::HashMap;

use super::{KeyValueStorage, StorageError, StorageResult};

/// Key-value storage held in a `HashMap`
///
/// An optional quota caps the total bytes of keys plus values; a write that
/// would exceed it fails with `StorageError::QuotaExceeded` and leaves the
/// previous value in place.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota: Option<usize>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage that rejects writes beyond `bytes` in total
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::default()
        }
    }

    /// Number of successful `set` calls
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Total bytes used by keys and values
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(quota) = self.quota {
            let previous = self.entries.get(key).map_or(0, |v| key.len() + v.len());
            let needed = self.used_bytes() - previous + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    details: format!("{} bytes needed, quota is {}", needed, quota),
                });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing() {
        let storage = MemoryStorage::new();
        assert!(storage.get("blocks").unwrap().is_none());
    }

    #[test]
    fn test_set_and_get() {
        let mut storage = MemoryStorage::new();
        storage.set("blocks", "[]").unwrap();
        storage.set("blocks", "[1]").unwrap();

        assert_eq!(storage.get("blocks").unwrap().as_deref(), Some("[1]"));
        assert_eq!(storage.write_count(), 2);
        assert_eq!(storage.used_bytes(), "blocks".len() + 3);
    }

    #[test]
    fn test_quota_rejects_and_keeps_previous() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.set("k", "short").unwrap();

        let err = storage.set("k", "much too long").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("short"));
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn test_quota_counts_replacement_not_sum() {
        let mut storage = MemoryStorage::with_quota(8);
        storage.set("k", "1234567").unwrap();
        // Replacing an existing value only needs room for the new one
        storage.set("k", "7654321").unwrap();
        assert_eq!(storage.remove("k").as_deref(), Some("7654321"));
    }
}
