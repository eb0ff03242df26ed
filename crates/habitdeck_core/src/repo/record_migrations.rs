//! Versioned migrations for persisted habit records.
//!
//! # Responsibility
//! - Upgrade raw JSON records written by older builds to the current shape.
//! - Keep every schema change as one numbered, idempotent step.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - A step only fills in or reshapes fields; it never drops a record.
//! - Data stamped with a version newer than `latest_record_version()` is
//!   rejected instead of being guessed at.
//! - Field defaults in `RECORD_DEFAULTS` run on every load, whatever the
//!   stamp says, so a record is never rejected for lacking them.
//!
//! Data written before versioning existed has no version stamp and is
//! treated as version 0.

use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

type RecordFn = fn(&mut Map<String, Value>);

#[derive(Clone, Copy)]
struct RecordMigration {
    version: u32,
    name: &'static str,
    apply: RecordFn,
}

const RECORD_MIGRATIONS: &[RecordMigration] = &[RecordMigration {
    version: 1,
    name: "add_is_archived",
    apply: add_is_archived,
}];

// Idempotent fills applied after the versioned steps, whatever the stored
// version says.
const RECORD_DEFAULTS: &[RecordFn] = &[add_is_archived];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    UnsupportedVersion { stored: u32, latest_supported: u32 },
    NotAnObject { index: usize },
}

impl Display for MigrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedVersion {
                stored,
                latest_supported,
            } => write!(
                f,
                "habit record version {stored} is newer than supported {latest_supported}"
            ),
            Self::NotAnObject { index } => {
                write!(f, "habit record at index {index} is not a JSON object")
            }
        }
    }
}

impl Error for MigrationError {}

/// Names of the steps applied by one `migrate_records` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    pub from_version: u32,
    pub to_version: u32,
    pub applied: Vec<&'static str>,
}

pub fn latest_record_version() -> u32 {
    RECORD_MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Runs every step newer than `from_version` over all records, in place,
/// then the unconditional field defaults.
pub fn migrate_records(
    records: &mut [Value],
    from_version: u32,
) -> Result<MigrationSummary, MigrationError> {
    let latest = latest_record_version();
    if from_version > latest {
        return Err(MigrationError::UnsupportedVersion {
            stored: from_version,
            latest_supported: latest,
        });
    }

    let mut summary = MigrationSummary {
        from_version,
        to_version: latest,
        applied: Vec::new(),
    };

    for migration in RECORD_MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from_version)
    {
        for (index, record) in records.iter_mut().enumerate() {
            let object = record
                .as_object_mut()
                .ok_or(MigrationError::NotAnObject { index })?;
            (migration.apply)(object);
        }
        summary.applied.push(migration.name);
    }

    for (index, record) in records.iter_mut().enumerate() {
        let object = record
            .as_object_mut()
            .ok_or(MigrationError::NotAnObject { index })?;
        for fill in RECORD_DEFAULTS {
            fill(&mut *object);
        }
    }

    Ok(summary)
}

// v1: archive support. Missing or null `isArchived` means active.
fn add_is_archived(record: &mut Map<String, Value>) {
    let missing = record.get("isArchived").map_or(true, Value::is_null);
    if missing {
        record.insert("isArchived".to_string(), Value::Bool(false));
    }
}

#[cfg(test)]
mod tests {
    use super::{latest_record_version, migrate_records, MigrationError};
    use serde_json::json;

    #[test]
    fn v1_fills_missing_and_null_is_archived_only() {
        let mut records = vec![
            json!({"id": "1"}),
            json!({"id": "2", "isArchived": null}),
            json!({"id": "3", "isArchived": true}),
        ];
        let summary = migrate_records(&mut records, 0).unwrap();
        assert_eq!(summary.applied, vec!["add_is_archived"]);
        assert_eq!(records[0]["isArchived"], false);
        assert_eq!(records[1]["isArchived"], false);
        assert_eq!(records[2]["isArchived"], true);
    }

    #[test]
    fn current_version_skips_steps_but_still_fills_defaults() {
        let mut records = vec![json!({"id": "1"}), json!({"id": "2", "isArchived": true})];
        let summary = migrate_records(&mut records, latest_record_version()).unwrap();
        assert!(summary.applied.is_empty());
        assert_eq!(records[0]["isArchived"], false);
        assert_eq!(records[1]["isArchived"], true);
    }

    #[test]
    fn rejects_future_version_and_non_object_records() {
        let mut records = vec![json!({"id": "1"})];
        let err = migrate_records(&mut records, latest_record_version() + 1).unwrap_err();
        assert!(matches!(err, MigrationError::UnsupportedVersion { .. }));

        let mut bad = vec![json!({"id": "1"}), json!("oops")];
        assert_eq!(
            migrate_records(&mut bad, 0).unwrap_err(),
            MigrationError::NotAnObject { index: 1 }
        );
    }
}
