//! Habit collection persistence.
//!
//! # Responsibility
//! - Read `habits_data` and its version stamp, migrate, and decode.
//! - Encode full-collection snapshots and queue them for write-back.
//!
//! # Invariants
//! - The collection is always stored as one JSON array (no partial writes).
//! - `habits_schema_version` is rewritten with every snapshot, in the same
//!   storage transaction as `habits_data`.

use crate::model::habit::Habit;
use crate::repo::record_migrations::{latest_record_version, migrate_records};
use crate::repo::{RepoError, RepoResult};
use crate::storage::StorageHandle;
use log::info;
use serde_json::Value;

pub const HABITS_KEY: &str = "habits_data";
pub const HABITS_VERSION_KEY: &str = "habits_schema_version";

pub struct HabitRepository {
    storage: StorageHandle,
}

impl HabitRepository {
    pub fn new(storage: StorageHandle) -> Self {
        Self { storage }
    }

    /// Loads and migrates the stored collection.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet (first launch).
    pub fn load(&self) -> RepoResult<Option<Vec<Habit>>> {
        let Some(raw) = self.storage.get(HABITS_KEY)? else {
            return Ok(None);
        };
        let version = match self.storage.get(HABITS_VERSION_KEY)? {
            Some(text) => parse_version(&text)?,
            None => 0,
        };
        decode_habits(&raw, version).map(Some)
    }

    /// Queues a full-collection write. Returns once the write is enqueued.
    pub fn save(&self, habits: &[Habit]) -> RepoResult<()> {
        let payload = encode_habits(habits)?;
        self.storage.put_many(vec![
            (HABITS_KEY.to_string(), payload),
            (
                HABITS_VERSION_KEY.to_string(),
                latest_record_version().to_string(),
            ),
        ])?;
        Ok(())
    }
}

/// Decodes a stored JSON array written at record schema `version`.
pub fn decode_habits(raw: &str, version: u32) -> RepoResult<Vec<Habit>> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Array(mut records) = value else {
        return Err(RepoError::InvalidData(format!(
            "`{HABITS_KEY}` must hold a JSON array"
        )));
    };

    let summary = migrate_records(&mut records, version)?;
    if !summary.applied.is_empty() {
        info!(
            "event=habits_migrate module=repo status=ok from_version={} to_version={} steps={} records={}",
            summary.from_version,
            summary.to_version,
            summary.applied.join(","),
            records.len()
        );
    }

    records
        .into_iter()
        .map(|record| serde_json::from_value::<Habit>(record).map_err(RepoError::from))
        .collect()
}

pub fn encode_habits(habits: &[Habit]) -> RepoResult<String> {
    Ok(serde_json::to_string(habits)?)
}

fn parse_version(text: &str) -> RepoResult<u32> {
    text.trim().parse::<u32>().map_err(|_| {
        RepoError::InvalidData(format!("invalid `{HABITS_VERSION_KEY}` value `{text}`"))
    })
}

#[cfg(test)]
mod tests {
    use super::{decode_habits, encode_habits};
    use crate::model::defaults::default_habits;
    use crate::repo::RepoError;

    #[test]
    fn decode_rejects_non_array_payload() {
        let err = decode_habits(r#"{"id":"1"}"#, 0).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
    }

    #[test]
    fn decode_rejects_record_missing_required_field() {
        let raw = r#"[{"id":"1","title":"t","description":"d","isFavorite":false,"createdAt":"x"}]"#;
        let err = decode_habits(raw, 0).unwrap_err();
        assert!(matches!(err, RepoError::Json(_)));
    }

    #[test]
    fn encoded_snapshot_decodes_at_current_version() {
        let habits = default_habits();
        let raw = encode_habits(&habits).unwrap();
        assert_eq!(decode_habits(&raw, 1).unwrap(), habits);
    }
}
