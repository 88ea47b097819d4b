// ABOUTME: Configuration loading for the liftlog binary: data directory, backend kind, and byte quota.
// ABOUTME: Reads LIFTLOG_* environment variables and opens the configured storage backend.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use liftlog_store::{BackendError, FileBackend, KeyValueBackend, SqliteBackend};
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LIFTLOG_BACKEND must be \"file\" or \"sqlite\", got {0:?}")]
    UnknownBackend(String),

    #[error("LIFTLOG_QUOTA_BYTES is not a byte count: {0:?}")]
    InvalidQuota(String),
}

/// Which medium holds the collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// One JSON file per collection under `<home>/data`.
    #[default]
    File,
    /// A single SQLite database at `<home>/liftlog.db`.
    Sqlite,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(BackendKind::File),
            "sqlite" => Ok(BackendKind::Sqlite),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::File => f.write_str("file"),
            BackendKind::Sqlite => f.write_str("sqlite"),
        }
    }
}

/// Runtime configuration for the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct LiftlogConfig {
    pub home: PathBuf,
    pub backend: BackendKind,
    pub quota_bytes: Option<u64>,
}

impl LiftlogConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - LIFTLOG_HOME: data directory (default: ~/.liftlog)
    /// - LIFTLOG_BACKEND: `file` or `sqlite` (default: file)
    /// - LIFTLOG_QUOTA_BYTES: byte limit enforced by the backend (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = lookup("LIFTLOG_HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                lookup("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
                    .join(".liftlog")
            });

        let backend = match lookup("LIFTLOG_BACKEND").filter(|b| !b.is_empty()) {
            Some(value) => value.parse()?,
            None => BackendKind::default(),
        };

        let quota_bytes = match lookup("LIFTLOG_QUOTA_BYTES").filter(|q| !q.is_empty()) {
            Some(value) => Some(
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidQuota(value))?,
            ),
            None => None,
        };

        Ok(Self {
            home,
            backend,
            quota_bytes,
        })
    }

    /// Where the configured backend keeps its data.
    pub fn data_path(&self) -> PathBuf {
        match self.backend {
            BackendKind::File => self.home.join("data"),
            BackendKind::Sqlite => self.home.join("liftlog.db"),
        }
    }

    /// Open the configured backend, creating its directory or database if needed.
    pub fn open_backend(&self) -> Result<Backend, BackendError> {
        let path = self.data_path();
        let backend = match self.backend {
            BackendKind::File => {
                let backend = FileBackend::open(&path)?;
                Backend::File(match self.quota_bytes {
                    Some(limit) => backend.with_quota(limit),
                    None => backend,
                })
            }
            BackendKind::Sqlite => {
                let backend = SqliteBackend::open(&path)?;
                Backend::Sqlite(match self.quota_bytes {
                    Some(limit) => backend.with_quota(limit),
                    None => backend,
                })
            }
        };
        tracing::debug!("opened {} backend at {}", self.backend, path.display());
        Ok(backend)
    }
}

/// The backend chosen at startup.
pub enum Backend {
    File(FileBackend),
    Sqlite(SqliteBackend),
}

impl KeyValueBackend for Backend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        match self {
            Backend::File(b) => b.get(key),
            Backend::Sqlite(b) => b.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        match self {
            Backend::File(b) => b.set(key, value),
            Backend::Sqlite(b) => b.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        match self {
            Backend::File(b) => b.remove(key),
            Backend::Sqlite(b) => b.remove(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn config_loads_defaults() {
        let config = LiftlogConfig::from_lookup(lookup(&[("HOME", "/home/lifter")])).unwrap();

        assert_eq!(config.home, PathBuf::from("/home/lifter/.liftlog"));
        assert_eq!(config.backend, BackendKind::File);
        assert!(config.quota_bytes.is_none());
        assert_eq!(config.data_path(), PathBuf::from("/home/lifter/.liftlog/data"));
    }

    #[test]
    fn config_reads_every_variable() {
        let config = LiftlogConfig::from_lookup(lookup(&[
            ("LIFTLOG_HOME", "/srv/liftlog"),
            ("LIFTLOG_BACKEND", "SQLite"),
            ("LIFTLOG_QUOTA_BYTES", "5242880"),
        ]))
        .unwrap();

        assert_eq!(config.home, PathBuf::from("/srv/liftlog"));
        assert_eq!(config.backend, BackendKind::Sqlite);
        assert_eq!(config.quota_bytes, Some(5_242_880));
        assert_eq!(config.data_path(), PathBuf::from("/srv/liftlog/liftlog.db"));
    }

    #[test]
    fn config_rejects_bad_values() {
        let err = LiftlogConfig::from_lookup(lookup(&[("LIFTLOG_BACKEND", "postgres")])).unwrap_err();
        assert!(err.to_string().contains("LIFTLOG_BACKEND"), "{}", err);

        let err =
            LiftlogConfig::from_lookup(lookup(&[("LIFTLOG_QUOTA_BYTES", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidQuota(ref v) if v == "lots"));
    }

    #[test]
    fn opens_each_backend_kind() {
        let dir = TempDir::new().unwrap();
        for backend in [BackendKind::File, BackendKind::Sqlite] {
            let config = LiftlogConfig {
                home: dir.path().to_path_buf(),
                backend,
                quota_bytes: None,
            };
            let mut opened = config.open_backend().unwrap();
            opened.set("workouts", "[]").unwrap();
            assert_eq!(opened.get("workouts").unwrap().as_deref(), Some("[]"));
        }
        assert!(dir.path().join("data").join("workouts.json").exists());
        assert!(dir.path().join("liftlog.db").exists());
    }
}
