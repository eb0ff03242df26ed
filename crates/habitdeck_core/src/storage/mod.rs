//! On-device key-value storage.
//!
//! # Responsibility
//! - Define the string key → string value contract used for app state.
//! - Provide SQLite-backed and in-memory implementations.
//! - Run storage I/O on a dedicated worker so callers never block on writes.
//!
//! # Invariants
//! - Values are opaque UTF-8 text (JSON by convention of the callers).
//! - A `set` fully replaces the previous value of the key.
//! - A `set_many` batch is all-or-nothing: either every entry is stored or
//!   none is.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;
pub mod worker;

pub use memory::MemoryKeyValueStore;
pub use sqlite::{latest_table_version, SqliteKeyValueStore};
pub use worker::{StorageHandle, StorageWorker, WriteReport};

pub type StorageResult<T> = Result<T, StorageError>;

/// Key-value backend contract.
///
/// Implementations are moved onto the storage worker thread, so they only
/// need to be `Send`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores every `(key, value)` pair atomically.
    fn set_many(&mut self, entries: &[(&str, &str)]) -> StorageResult<()>;

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.set_many(&[(key, value)])
    }
}

#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    UnsupportedTableVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// The storage worker has shut down or its thread died.
    WorkerUnavailable,
    /// Failure reported by a non-SQLite backend.
    Backend(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedTableVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "storage table version {db_version} is newer than supported {latest_supported}"
            ),
            Self::WorkerUnavailable => write!(f, "storage worker is not running"),
            Self::Backend(message) => write!(f, "storage backend error: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> StorageResult<()> {
        (**self).set_many(entries)
    }
}
