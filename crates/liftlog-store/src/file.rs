// ABOUTME: File-per-key backend: each key is stored as <dir>/<key>.json.
// ABOUTME: Writes go through a temp file, fsync, and atomic rename so a crash never leaves a torn value.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::backend::{BackendError, KeyValueBackend, check_quota};

const EXTENSION: &str = "json";

/// Stores each key in its own file inside a data directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
    quota: Option<u64>,
}

impl FileBackend {
    /// Open (or create) a data directory.
    pub fn open(dir: &Path) -> Result<Self, BackendError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            quota: None,
        })
    }

    /// Limit the total bytes (key names plus file contents) under the directory.
    pub fn with_quota(mut self, limit: u64) -> Self {
        self.quota = Some(limit);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys become file names, so only `[A-Za-z0-9_-]` is accepted.
    fn path_for(&self, key: &str) -> Result<PathBuf, BackendError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(BackendError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }

    fn used_by_others(&self, key: &str) -> Result<u64, BackendError> {
        let mut used = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem == key {
                continue;
            }
            used += stem.len() as u64 + fs::metadata(&path)?.len();
        }
        Ok(used)
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        let final_path = self.path_for(key)?;
        if self.quota.is_some() {
            check_quota(self.quota, key, value, self.used_by_others(key)?)?;
        }

        let tmp_path = self.dir.join(format!("{key}.{EXTENSION}.tmp"));
        if let Err(e) = write_and_rename(&tmp_path, &final_path, value) {
            // Nothing may linger under the temp name once the write has failed.
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        // Best-effort: the rename already succeeded, so a failed directory
        // fsync only weakens durability of the directory entry.
        if let Ok(dir) = File::open(&self.dir) {
            let _ = dir.sync_all();
        }

        tracing::trace!("wrote {} bytes to {}", value.len(), final_path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Writes `value` to `tmp_path`, syncs it, and renames it over `final_path`.
fn write_and_rename(tmp_path: &Path, final_path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = File::create(tmp_path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp_path, final_path)
}
