// ABOUTME: Generic whole-collection record store over a key/value backend.
// ABOUTME: Each collection is one JSON array; every mutation reads it, edits in memory, and writes it back.

use serde_json::{Map, Value};
use thiserror::Error;
use ulid::Ulid;

use crate::backend::{BackendError, KeyValueBackend};

/// A stored record: a JSON object with an `id` field once saved.
pub type Record = Map<String, Value>;

/// Errors surfaced by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] BackendError),

    #[error("storage quota exceeded writing {key}: needs {required} bytes, limit is {limit}")]
    QuotaExceeded {
        key: String,
        required: u64,
        limit: u64,
    },

    #[error("collection {collection} is corrupt: {reason}")]
    CorruptCollection { collection: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<BackendError> for StoreError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::QuotaExceeded {
                key,
                required,
                limit,
            } => StoreError::QuotaExceeded {
                key,
                required,
                limit,
            },
            other => StoreError::StorageUnavailable(other),
        }
    }
}

/// Generate a fresh record id: a ULID (millisecond timestamp plus 80 random bits).
pub fn generate_id() -> String {
    Ulid::new().to_string()
}

/// The id of a record, if it carries a non-empty string id. Any other `id`
/// value counts as no id at all.
pub fn record_id(record: &Record) -> Option<&str> {
    record
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

/// Whole-collection CRUD over named collections in a backend.
///
/// Every operation costs O(collection size): collections are read and written
/// as a single value. That suits a personal log of hundreds of records, not a
/// bulk dataset. There is no locking; one handle is one writer.
pub struct RecordStore<B> {
    backend: B,
}

impl<B: KeyValueBackend> RecordStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Release the backend.
    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Every record in the collection, in storage order. Empty if the
    /// collection was never written.
    pub fn get_all(&self, collection: &str) -> Result<Vec<Record>, StoreError> {
        let Some(text) = self.backend.get(collection)? else {
            return Ok(Vec::new());
        };

        let values: Vec<Value> =
            serde_json::from_str(&text).map_err(|e| StoreError::CorruptCollection {
                collection: collection.to_string(),
                reason: e.to_string(),
            })?;

        values
            .into_iter()
            .map(|value| match value {
                Value::Object(record) => Ok(record),
                other => Err(StoreError::CorruptCollection {
                    collection: collection.to_string(),
                    reason: format!("expected an object, found {other}"),
                }),
            })
            .collect()
    }

    /// The record with the given id, or None.
    pub fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Record>, StoreError> {
        Ok(self
            .get_all(collection)?
            .into_iter()
            .find(|r| record_id(r) == Some(id)))
    }

    /// Insert or update a record and return it as stored.
    ///
    /// - `id` matches a stored record: the given fields are shallow-merged over
    ///   it; fields not given keep their stored values.
    /// - `id` is given but matches nothing: the record is appended with that id.
    ///   Imports rely on this to keep their ids.
    /// - no `id`, an empty one, or one that is not a string (a number, say):
    ///   a new id is generated and replaces it. Ids are always strings here,
    ///   so a numeric id from an older export is not kept.
    pub fn save(&mut self, collection: &str, record: Record) -> Result<Record, StoreError> {
        self.save_with(collection, record, |_| Ok(()))
    }

    /// Like [`save`](Self::save), but `check` sees the record exactly as it will
    /// be stored and can veto the write. Nothing is written when it fails.
    pub fn save_with<E, F>(
        &mut self,
        collection: &str,
        record: Record,
        check: F,
    ) -> Result<Record, E>
    where
        E: From<StoreError>,
        F: FnOnce(&Record) -> Result<(), E>,
    {
        let mut all = self.get_all(collection)?;
        let stored = upsert(&mut all, collection, record);
        check(&stored)?;
        self.write(collection, &all)?;
        Ok(stored)
    }

    /// Remove the record with `id`. Removing a missing id is not an error.
    pub fn delete(&mut self, collection: &str, id: &str) -> Result<String, StoreError> {
        let mut all = self.get_all(collection)?;
        let before = all.len();
        all.retain(|r| record_id(r) != Some(id));
        if all.len() != before {
            tracing::debug!("deleted {} record {}", collection, id);
        }
        self.write(collection, &all)?;
        Ok(id.to_string())
    }

    /// Overwrite the whole collection.
    pub fn replace_all(&mut self, collection: &str, records: &[Record]) -> Result<(), StoreError> {
        self.write(collection, records)
    }

    /// Overwrite several collections as one unit. When a write fails, the
    /// collections already written are put back to their previous values
    /// before the error is returned.
    pub fn replace_collections(
        &mut self,
        collections: &[(&str, &[Record])],
    ) -> Result<(), StoreError> {
        let mut pending = Vec::with_capacity(collections.len());
        for (collection, records) in collections {
            let text = serde_json::to_string(records)?;
            let previous = self.backend.get(collection)?;
            pending.push((*collection, text, previous));
        }

        let mut written: Vec<(&str, Option<String>)> = Vec::new();
        for (collection, text, previous) in pending {
            if let Err(err) = self.backend.set(collection, &text) {
                self.restore(written);
                return Err(err.into());
            }
            written.push((collection, previous));
        }
        Ok(())
    }

    /// Undo writes newest first, so every intermediate state is one that
    /// already existed.
    fn restore(&mut self, written: Vec<(&str, Option<String>)>) {
        for (collection, previous) in written.into_iter().rev() {
            let result = match previous {
                Some(text) => self.backend.set(collection, &text),
                None => self.backend.remove(collection),
            };
            match result {
                Ok(()) => tracing::debug!("restored {} after a failed write", collection),
                Err(e) => tracing::warn!(
                    "could not restore {} after a failed write: {}",
                    collection,
                    e
                ),
            }
        }
    }

    fn write(&mut self, collection: &str, records: &[Record]) -> Result<(), StoreError> {
        let text = serde_json::to_string(records)?;
        self.backend.set(collection, &text)?;
        Ok(())
    }
}

/// Merge `record` into `all` in memory, following the rules of
/// [`RecordStore::save`], and return the record as it now stands.
pub fn upsert(all: &mut Vec<Record>, collection: &str, mut record: Record) -> Record {
    let existing =
        record_id(&record).and_then(|id| all.iter().position(|r| record_id(r) == Some(id)));

    if let Some(index) = existing {
        all[index].extend(record);
        tracing::debug!("updated {} record at index {}", collection, index);
        return all[index].clone();
    }

    match record_id(&record) {
        Some(id) => {
            tracing::debug!(
                "appending {} record with caller-supplied id {}",
                collection,
                id
            );
        }
        None => {
            record.insert("id".to_string(), Value::String(generate_id()));
        }
    }
    all.push(record.clone());
    record
}
