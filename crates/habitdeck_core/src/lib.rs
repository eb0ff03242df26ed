//! Core domain logic for HabitDeck.
//! This crate is the single source of truth for habit state and its
//! persistence contract.

pub mod config;
pub mod logging;
pub mod model;
pub mod reminder;
pub mod repo;
pub mod search;
pub mod service;
pub mod storage;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::CategorySet;
pub use model::defaults::{default_categories, default_habits, DEFAULT_CATEGORIES};
pub use model::habit::{Habit, HabitDraft, HabitId, HabitValidationError};
pub use reminder::scheduler::{
    NotificationError, NotificationRequest, NotificationService, PermissionStatus,
    ReminderOutcome, ReminderScheduler,
};
pub use reminder::settings::{ReminderSettings, ReminderSettingsPatch, ReminderTime};
pub use repo::reminder_repo::ReminderRepository;
pub use repo::{RepoError, RepoResult};
pub use search::library::{filter_library, LibraryQuery, LibrarySection};
pub use service::habit_store::{HabitStore, LoadSource};
pub use service::selector::{pick_suggestion, SuggestionCursor};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageHandle,
    StorageWorker, WriteReport,
};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
