//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the habit store to Dart through one explicitly opened handle.
//! - Keep error semantics simple: envelopes and strings, never panics.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every mutation goes through `HabitStore`; Dart only sees copies.
//! - After `close`, every call returns a failure envelope.

use habitdeck_core::{
    core_version as core_version_inner, filter_library, init_logging as init_logging_inner,
    ping as ping_inner, Habit, HabitDraft, HabitStore, LibraryQuery, LibrarySection,
    NotificationError, NotificationRequest, NotificationService, PermissionStatus,
    ReminderOutcome, ReminderRepository, ReminderScheduler, ReminderSettings,
    ReminderSettingsPatch, ReminderTime, SqliteKeyValueStore, StorageWorker, SuggestionCursor,
};
use log::{info, warn};
use std::sync::{Mutex, MutexGuard};

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Habit record as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub is_favorite: bool,
    pub is_archived: bool,
    pub created_at: String,
}

impl From<&Habit> for HabitItem {
    fn from(habit: &Habit) -> Self {
        Self {
            id: habit.id.clone(),
            title: habit.title.clone(),
            description: habit.description.clone(),
            category: habit.category.clone(),
            is_favorite: habit.is_favorite,
            is_archived: habit.is_archived,
            created_at: habit.created_at.clone(),
        }
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation took effect.
    pub ok: bool,
    /// Target or created habit id, when there is one.
    pub habit_id: Option<String>,
    /// Human-readable message; inline validation text on form errors.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, habit_id: Option<String>) -> Self {
        Self {
            ok: true,
            habit_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            habit_id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSettingsItem {
    pub enabled: bool,
    /// `HH:MM`
    pub time: String,
}

/// What Dart must do with the platform notification plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderPlan {
    /// Cancel every scheduled local notification first.
    pub cancel_existing: bool,
    /// Notification to schedule daily, if any.
    pub notification: Option<ReminderNotification>,
    /// `scheduled|cancelled|permission_denied|no_active_habits|failed`
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderNotification {
    pub title: String,
    pub body: String,
    pub habit_id: String,
    pub hour: u8,
    pub minute: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushResponse {
    pub written: u64,
    pub failed: u64,
    pub message: String,
}

struct Session {
    worker: StorageWorker,
    store: HabitStore,
    reminders: ReminderRepository,
    reminder_settings: ReminderSettings,
    cursor: SuggestionCursor,
}

/// Opaque app handle owning the store for one UI lifetime.
#[flutter_rust_bridge::frb(opaque)]
pub struct HabitApp {
    session: Mutex<Option<Session>>,
}

impl HabitApp {
    /// Opens the SQLite-backed store at `db_path` and loads state.
    #[flutter_rust_bridge::frb(sync)]
    pub fn open(db_path: String) -> Result<HabitApp, String> {
        let path = db_path.trim();
        if path.is_empty() {
            return Err("db_path cannot be empty".to_string());
        }
        let backend =
            SqliteKeyValueStore::open(path).map_err(|err| format!("storage open failed: {err}"))?;
        let worker =
            StorageWorker::spawn(backend).map_err(|err| format!("storage open failed: {err}"))?;
        let store = HabitStore::open(worker.handle());
        let reminders = ReminderRepository::new(worker.handle());
        let reminder_settings = reminders.load_or_default();
        info!(
            "event=app_open module=ffi status=ok habits={} source={:?}",
            store.len(),
            store.load_source()
        );

        Ok(HabitApp {
            session: Mutex::new(Some(Session {
                worker,
                store,
                reminders,
                reminder_settings,
                cursor: SuggestionCursor::new(),
            })),
        })
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn habits(&self) -> Vec<HabitItem> {
        self.with_session(|session| session.store.habits().iter().map(HabitItem::from).collect())
            .unwrap_or_default()
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn categories(&self) -> Vec<String> {
        self.with_session(|session| session.store.categories().to_vec())
            .unwrap_or_default()
    }

    /// Library listing: text search, optional category, section toggle.
    #[flutter_rust_bridge::frb(sync)]
    pub fn library(
        &self,
        text: String,
        category: Option<String>,
        archived: bool,
        favorites_only: bool,
    ) -> Vec<HabitItem> {
        let query = LibraryQuery {
            text,
            category: category.filter(|value| !value.trim().is_empty()),
            section: if archived {
                LibrarySection::Archived
            } else {
                LibrarySection::Active
            },
            favorites_only,
        };
        self.with_session(|session| {
            filter_library(session.store.habits(), &query)
                .into_iter()
                .map(HabitItem::from)
                .collect()
        })
        .unwrap_or_default()
    }

    /// Validates form input and adds the habit.
    #[flutter_rust_bridge::frb(sync)]
    pub fn add_habit(&self, title: String, description: String, category: String) -> ActionResponse {
        let draft = HabitDraft::new(title, description, category);
        self.respond(|session| {
            let habit = match Habit::from_draft(&draft) {
                Ok(habit) => habit,
                Err(err) => return ActionResponse::failure(err.to_string()),
            };
            let id = habit.id.clone();
            if session.store.add(habit) {
                ActionResponse::success("Habit added.", Some(id))
            } else {
                ActionResponse::failure("Habit was not added.")
            }
        })
    }

    /// Replaces title, description and category of an existing habit.
    #[flutter_rust_bridge::frb(sync)]
    pub fn edit_habit(
        &self,
        id: String,
        title: String,
        description: String,
        category: String,
    ) -> ActionResponse {
        let draft = HabitDraft::new(title, description, category);
        self.respond(|session| {
            let Some(existing) = session.store.get(&id) else {
                return ActionResponse::failure(format!("habit not found: {id}"));
            };
            match existing.edited(&draft) {
                Ok(edited) => {
                    session.store.update(edited);
                    ActionResponse::success("Habit updated.", Some(id.clone()))
                }
                Err(err) => ActionResponse::failure(err.to_string()),
            }
        })
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn delete_habit(&self, id: String) -> ActionResponse {
        self.respond(|session| {
            if session.store.delete(&id) {
                ActionResponse::success("Habit deleted.", Some(id.clone()))
            } else {
                ActionResponse::success("Nothing to delete.", None)
            }
        })
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn toggle_favorite(&self, id: String) -> ActionResponse {
        self.respond(|session| match session.store.toggle_favorite(&id) {
            Some(true) => ActionResponse::success("Added to favorites.", Some(id.clone())),
            Some(false) => ActionResponse::success("Removed from favorites.", Some(id.clone())),
            None => ActionResponse::success("Nothing to toggle.", None),
        })
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn toggle_archive(&self, id: String) -> ActionResponse {
        self.respond(|session| match session.store.toggle_archive(&id) {
            Some(true) => ActionResponse::success("Habit archived.", Some(id.clone())),
            Some(false) => ActionResponse::success("Habit restored.", Some(id.clone())),
            None => ActionResponse::success("Nothing to toggle.", None),
        })
    }

    /// Destructive: replaces all habits and categories with the defaults.
    #[flutter_rust_bridge::frb(sync)]
    pub fn reset_to_defaults(&self) -> ActionResponse {
        self.respond(|session| {
            session.store.reset_to_defaults();
            session.cursor = SuggestionCursor::new();
            ActionResponse::success("Habits reset to defaults.", None)
        })
    }

    /// Today's card: keeps the shown habit while it stays active.
    #[flutter_rust_bridge::frb(sync)]
    pub fn current_suggestion(&self) -> Option<HabitItem> {
        self.with_session(|session| {
            let mut rng = rand::rng();
            session
                .cursor
                .refresh(session.store.habits(), &mut rng)
                .map(HabitItem::from)
        })
        .ok()
        .flatten()
    }

    /// "Next" button: a different active habit when one exists.
    #[flutter_rust_bridge::frb(sync)]
    pub fn next_suggestion(&self) -> Option<HabitItem> {
        self.with_session(|session| {
            let mut rng = rand::rng();
            session
                .cursor
                .next(session.store.habits(), &mut rng)
                .map(HabitItem::from)
        })
        .ok()
        .flatten()
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn reminder_settings(&self) -> ReminderSettingsItem {
        let settings = self
            .with_session(|session| session.reminder_settings)
            .unwrap_or_default();
        ReminderSettingsItem {
            enabled: settings.enabled,
            time: settings.time.to_string(),
        }
    }

    /// Applies a partial settings update and persists it.
    #[flutter_rust_bridge::frb(sync)]
    pub fn set_reminder_settings(&self, enabled: Option<bool>, time: Option<String>) -> ActionResponse {
        let time = match time.as_deref().map(str::parse::<ReminderTime>).transpose() {
            Ok(time) => time,
            Err(err) => return ActionResponse::failure(err.to_string()),
        };
        self.respond(|session| {
            let updated = session
                .reminder_settings
                .merged(ReminderSettingsPatch { enabled, time });
            session.reminder_settings = updated;
            match session.reminders.save(&updated) {
                Ok(()) => ActionResponse::success("Reminder settings saved.", None),
                Err(err) => ActionResponse::failure(format!("reminder settings not saved: {err}")),
            }
        })
    }

    /// Computes the notification calls Dart should perform for the current
    /// settings. `permission_granted` is the platform permission result.
    #[flutter_rust_bridge::frb(sync)]
    pub fn plan_reminder(&self, permission_granted: bool) -> ReminderPlan {
        let planned = self.with_session(|session| {
            let mut scheduler = ReminderScheduler::new(PlannedNotifications::new(permission_granted));
            let mut rng = rand::rng();
            let outcome = scheduler.apply(&session.reminder_settings, session.store.habits(), &mut rng);
            (outcome, scheduler.into_inner())
        });

        match planned {
            Ok((outcome, planned)) => ReminderPlan {
                cancel_existing: planned.cancel_existing,
                notification: planned.request.map(|request| ReminderNotification {
                    title: request.title,
                    body: request.body,
                    habit_id: request.habit_id,
                    hour: request.daily_at.hour(),
                    minute: request.daily_at.minute(),
                }),
                status: outcome_label(&outcome).to_string(),
            },
            Err(_) => ReminderPlan {
                cancel_existing: false,
                notification: None,
                status: "failed".to_string(),
            },
        }
    }

    /// Waits for queued writes and reports their counters.
    #[flutter_rust_bridge::frb(sync)]
    pub fn flush(&self) -> FlushResponse {
        match self.with_session(|session| session.worker.handle().flush()) {
            Ok(Ok(report)) => FlushResponse {
                written: report.written,
                failed: report.failed,
                message: String::new(),
            },
            Ok(Err(err)) => FlushResponse {
                written: 0,
                failed: 0,
                message: format!("flush failed: {err}"),
            },
            Err(err) => FlushResponse {
                written: 0,
                failed: 0,
                message: err,
            },
        }
    }

    /// Drains pending writes and releases storage. Idempotent.
    #[flutter_rust_bridge::frb(sync)]
    pub fn close(&self) -> String {
        let mut guard = match self.lock() {
            Ok(guard) => guard,
            Err(err) => return err,
        };
        if let Some(session) = guard.take() {
            let report = session.worker.shutdown();
            info!(
                "event=app_close module=ffi status=ok written={} failed={}",
                report.written, report.failed
            );
            if report.failed > 0 {
                return format!("{} pending write(s) failed", report.failed);
            }
        }
        String::new()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Session>>, String> {
        self.session.lock().map_err(|_| {
            warn!("event=app_lock module=ffi status=error error=poisoned");
            "habit app state is poisoned".to_string()
        })
    }

    fn with_session<T>(&self, f: impl FnOnce(&mut Session) -> T) -> Result<T, String> {
        let mut guard = self.lock()?;
        let session = guard
            .as_mut()
            .ok_or_else(|| "habit app is closed".to_string())?;
        Ok(f(session))
    }

    fn respond(&self, f: impl FnOnce(&mut Session) -> ActionResponse) -> ActionResponse {
        self.with_session(f).unwrap_or_else(ActionResponse::failure)
    }
}

/// Records the notification calls instead of performing them.
struct PlannedNotifications {
    permission_granted: bool,
    cancel_existing: bool,
    request: Option<NotificationRequest>,
}

impl PlannedNotifications {
    fn new(permission_granted: bool) -> Self {
        Self {
            permission_granted,
            cancel_existing: false,
            request: None,
        }
    }
}

impl NotificationService for PlannedNotifications {
    fn request_permission(&mut self) -> Result<PermissionStatus, NotificationError> {
        Ok(if self.permission_granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        })
    }

    fn cancel_all_scheduled(&mut self) -> Result<(), NotificationError> {
        self.cancel_existing = true;
        self.request = None;
        Ok(())
    }

    fn schedule(&mut self, request: &NotificationRequest) -> Result<String, NotificationError> {
        self.request = Some(request.clone());
        Ok(format!("habit-reminder-{}", request.habit_id))
    }
}

fn outcome_label(outcome: &ReminderOutcome) -> &'static str {
    match outcome {
        ReminderOutcome::Scheduled { .. } => "scheduled",
        ReminderOutcome::Cancelled => "cancelled",
        ReminderOutcome::PermissionDenied => "permission_denied",
        ReminderOutcome::NoActiveHabits => "no_active_habits",
        ReminderOutcome::Failed(_) => "failed",
    }
}
