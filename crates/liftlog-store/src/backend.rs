// ABOUTME: The key/value medium under the record store, plus an in-memory implementation.
// ABOUTME: Backends may enforce a byte quota and report it as a distinct error.

use std::collections::HashMap;

use thiserror::Error;

/// Errors a storage medium can report.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("writing {key} needs {required} bytes but the quota is {limit}")]
    QuotaExceeded {
        key: String,
        required: u64,
        limit: u64,
    },

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A persisted medium addressed by string keys holding text values.
pub trait KeyValueBackend {
    /// Read the value stored under `key`, or None if it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), BackendError>;
}

/// Bytes an entry counts against a quota: its key plus its value.
pub(crate) fn entry_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}

/// Fail if writing `key` = `value` would push total usage past `limit`.
/// `used_by_others` is the usage of every entry except `key`.
pub(crate) fn check_quota(
    limit: Option<u64>,
    key: &str,
    value: &str,
    used_by_others: u64,
) -> Result<(), BackendError> {
    let Some(limit) = limit else {
        return Ok(());
    };
    let required = used_by_others + entry_size(key, value);
    if required > limit {
        return Err(BackendError::QuotaExceeded {
            key: key.to_string(),
            required,
            limit,
        });
    }
    Ok(())
}

/// A HashMap-backed medium. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
    quota: Option<u64>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total bytes (keys plus values) this backend will hold.
    pub fn with_quota(mut self, limit: u64) -> Self {
        self.quota = Some(limit);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn used_by_others(&self, key: &str) -> u64 {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| entry_size(k, v))
            .sum()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        check_quota(self.quota, key, value, self.used_by_others(key))?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_get_set_remove() {
        let mut backend = MemoryBackend::new();
        assert_eq!(backend.get("workouts").unwrap(), None);

        backend.set("workouts", "[]").unwrap();
        assert_eq!(backend.get("workouts").unwrap().as_deref(), Some("[]"));
        assert_eq!(backend.len(), 1);

        backend.remove("workouts").unwrap();
        assert_eq!(backend.get("workouts").unwrap(), None);
        // Removing again is fine
        backend.remove("workouts").unwrap();
        assert!(backend.is_empty());
    }

    #[test]
    fn memory_quota_counts_keys_and_values() {
        // "a" + "12345" = 6 bytes, "b" + "123" = 4 bytes
        let mut backend = MemoryBackend::new().with_quota(10);
        backend.set("a", "12345").unwrap();
        backend.set("b", "123").unwrap();

        let err = backend.set("b", "1234").unwrap_err();
        match err {
            BackendError::QuotaExceeded {
                key,
                required,
                limit,
            } => {
                assert_eq!(key, "b");
                assert_eq!(required, 11);
                assert_eq!(limit, 10);
            }
            other => panic!("expected QuotaExceeded, got {other:?}"),
        }

        // The failed write left the old value in place
        assert_eq!(backend.get("b").unwrap().as_deref(), Some("123"));
    }

    #[test]
    fn replacing_a_value_does_not_double_count_it() {
        let mut backend = MemoryBackend::new().with_quota(6);
        backend.set("a", "12345").unwrap();
        backend.set("a", "54321").unwrap();
        assert_eq!(backend.get("a").unwrap().as_deref(), Some("54321"));
    }
}
