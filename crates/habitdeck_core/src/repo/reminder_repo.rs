//! Reminder settings persistence under `reminder_settings`.

use crate::reminder::settings::ReminderSettings;
use crate::repo::RepoResult;
use crate::storage::StorageHandle;
use log::warn;

pub const REMINDER_SETTINGS_KEY: &str = "reminder_settings";

pub struct ReminderRepository {
    storage: StorageHandle,
}

impl ReminderRepository {
    pub fn new(storage: StorageHandle) -> Self {
        Self { storage }
    }

    /// Returns stored settings, or `None` when never saved.
    pub fn load(&self) -> RepoResult<Option<ReminderSettings>> {
        match self.storage.get(REMINDER_SETTINGS_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Loads settings, falling back to defaults on any failure.
    pub fn load_or_default(&self) -> ReminderSettings {
        match self.load() {
            Ok(settings) => settings.unwrap_or_default(),
            Err(err) => {
                warn!("event=reminder_settings_load module=repo status=error fallback=default error={err}");
                ReminderSettings::default()
            }
        }
    }

    /// Queues a write of `settings`.
    pub fn save(&self, settings: &ReminderSettings) -> RepoResult<()> {
        let payload = serde_json::to_string(settings)?;
        self.storage.put(REMINDER_SETTINGS_KEY, payload)?;
        Ok(())
    }
}
