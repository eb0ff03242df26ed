//! SQLite-backed key-value store.
//!
//! # Responsibility
//! - Open file or in-memory databases and bring the `kv_entries` table
//!   up to date before any read or write.
//! - Map `KeyValueStore` calls onto lookups and transactional upserts.
//!
//! # Invariants
//! - Table schema version is mirrored to `PRAGMA user_version`.
//! - Pending table migrations are applied in one transaction.
//! - A database written by a newer build is rejected, never downgraded.

use super::{KeyValueStore, StorageError, StorageResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// (version, sql) in strictly increasing version order.
const TABLE_MIGRATIONS: &[(u32, &str)] = &[(1, include_str!("sql/0001_kv_entries.sql"))];

/// Latest `kv_entries` table version known by this binary.
pub fn latest_table_version() -> u32 {
    TABLE_MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Opens (or creates) the database file at `path`.
    ///
    /// # Side effects
    /// - Emits `kv_open` events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::bootstrap("file", || Connection::open(path))
    }

    /// Opens a private in-memory database, mostly for tests and previews.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::bootstrap("memory", Connection::open_in_memory)
    }

    /// Current `PRAGMA user_version` of the underlying database.
    pub fn table_version(&self) -> StorageResult<u32> {
        user_version(&self.conn)
    }

    fn bootstrap(
        mode: &'static str,
        connect: impl FnOnce() -> rusqlite::Result<Connection>,
    ) -> StorageResult<Self> {
        let started_at = Instant::now();
        info!("event=kv_open module=storage status=start mode={mode}");

        let result = connect()
            .map_err(StorageError::from)
            .and_then(|mut conn| {
                conn.busy_timeout(BUSY_TIMEOUT)?;
                migrate(&mut conn)?;
                Ok(conn)
            });

        match result {
            Ok(conn) => {
                info!(
                    "event=kv_open module=storage status=ok mode={mode} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(Self { conn })
            }
            Err(err) => {
                error!(
                    "event=kv_open module=storage status=error mode={mode} duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut upsert = tx.prepare_cached(
                "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = (strftime('%s', 'now') * 1000);",
            )?;
            for (key, value) in entries {
                upsert.execute(params![key, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn migrate(conn: &mut Connection) -> StorageResult<()> {
    let current = user_version(conn)?;
    let latest = latest_table_version();

    if current > latest {
        return Err(StorageError::UnsupportedTableVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in TABLE_MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        tx.execute_batch(sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {version};"))?;
    }
    tx.commit()?;
    Ok(())
}

fn user_version(conn: &Connection) -> StorageResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

#[cfg(test)]
mod tests {
    use super::{latest_table_version, SqliteKeyValueStore};
    use crate::storage::KeyValueStore;

    #[test]
    fn set_overwrites_previous_value() {
        let mut store = SqliteKeyValueStore::open_in_memory().unwrap();
        assert_eq!(store.get("habits_data").unwrap(), None);

        store.set("habits_data", "[]").unwrap();
        store.set("habits_data", "[1]").unwrap();
        assert_eq!(store.get("habits_data").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn set_many_commits_every_entry() {
        let mut store = SqliteKeyValueStore::open_in_memory().unwrap();
        store
            .set_many(&[("habits_data", "[]"), ("habits_schema_version", "1")])
            .unwrap();
        assert_eq!(store.get("habits_data").unwrap().as_deref(), Some("[]"));
        assert_eq!(
            store.get("habits_schema_version").unwrap().as_deref(),
            Some("1")
        );
    }

    #[test]
    fn in_memory_open_applies_table_migrations() {
        let store = SqliteKeyValueStore::open_in_memory().unwrap();
        assert_eq!(store.table_version().unwrap(), latest_table_version());
    }
}
