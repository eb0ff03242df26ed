//! Repository layer over the key-value storage.
//!
//! # Responsibility
//! - Encode/decode persisted app state under its well-known keys.
//! - Run record migrations so callers only ever see current-schema data.
//!
//! # Invariants
//! - Decoding never silently drops records: one bad record fails the load.
//! - Every write stamps the latest record schema version.

use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod habit_repo;
pub mod record_migrations;
pub mod reminder_repo;

pub use record_migrations::MigrationError;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Storage(StorageError),
    Json(serde_json::Error),
    Migration(MigrationError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid JSON: {err}"),
            Self::Migration(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Migration(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<MigrationError> for RepoError {
    fn from(value: MigrationError) -> Self {
        Self::Migration(value)
    }
}
