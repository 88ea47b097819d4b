// ABOUTME: Persistence for liftlog: key/value backends, the whole-collection record store, and the domain service.
// ABOUTME: Backends are explicit values handed to RecordStore::new; there is no global store.

pub mod backend;
pub mod file;
pub mod record;
pub mod service;
pub mod sqlite;

pub use backend::{BackendError, KeyValueBackend, MemoryBackend};
pub use file::FileBackend;
pub use record::{Record, RecordStore, StoreError, generate_id, record_id};
pub use service::{ServiceError, StorageService};
pub use sqlite::SqliteBackend;
