//! Daily reminder scheduling policy.
//!
//! # Responsibility
//! - Turn reminder settings plus the active-habit pool into calls on the
//!   device notification service.
//!
//! # Invariants
//! - Disabled settings always end with every local notification cancelled.
//! - Enabled settings schedule at most one notification, carrying the id
//!   of an active habit as payload.
//! - Failures and permission denial are logged and returned as outcomes,
//!   never raised.

use crate::model::habit::{Habit, HabitId};
use crate::reminder::settings::{ReminderSettings, ReminderTime};
use crate::service::selector::pick_suggestion;
use log::{error, info};
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const REMINDER_TITLE: &str = "Time for a new habit! 🌟";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Content and trigger of one local notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    /// Opened by the app when the user taps the notification.
    pub habit_id: HabitId,
    pub play_sound: bool,
    /// Repeats every day at this local time.
    pub daily_at: ReminderTime,
}

impl NotificationRequest {
    pub fn for_habit(habit: &Habit, daily_at: ReminderTime) -> Self {
        Self {
            title: REMINDER_TITLE.to_string(),
            body: format!("Today's suggestion: {}", habit.title),
            habit_id: habit.id.clone(),
            play_sound: true,
            daily_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationError(pub String);

impl Display for NotificationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "notification service error: {}", self.0)
    }
}

impl Error for NotificationError {}

/// Device-local notification service.
pub trait NotificationService {
    fn request_permission(&mut self) -> Result<PermissionStatus, NotificationError>;
    fn cancel_all_scheduled(&mut self) -> Result<(), NotificationError>;
    /// Returns the platform notification id.
    fn schedule(&mut self, request: &NotificationRequest) -> Result<String, NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderOutcome {
    Scheduled {
        notification_id: String,
        habit_id: HabitId,
    },
    Cancelled,
    PermissionDenied,
    NoActiveHabits,
    Failed(String),
}

pub struct ReminderScheduler<N: NotificationService> {
    service: N,
}

impl<N: NotificationService> ReminderScheduler<N> {
    pub fn new(service: N) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &N {
        &self.service
    }

    pub fn into_inner(self) -> N {
        self.service
    }

    /// Brings scheduled notifications in line with `settings`.
    pub fn apply<R>(
        &mut self,
        settings: &ReminderSettings,
        habits: &[Habit],
        rng: &mut R,
    ) -> ReminderOutcome
    where
        R: Rng + ?Sized,
    {
        let outcome = if settings.enabled {
            self.schedule_daily(settings.time, habits, rng)
        } else {
            self.cancel_all()
        };
        log_outcome(settings, &outcome);
        outcome
    }

    /// Cancels every scheduled local notification.
    pub fn cancel_all(&mut self) -> ReminderOutcome {
        match self.service.cancel_all_scheduled() {
            Ok(()) => ReminderOutcome::Cancelled,
            Err(err) => ReminderOutcome::Failed(err.to_string()),
        }
    }

    fn schedule_daily<R>(&mut self, time: ReminderTime, habits: &[Habit], rng: &mut R) -> ReminderOutcome
    where
        R: Rng + ?Sized,
    {
        match self.service.request_permission() {
            Ok(PermissionStatus::Granted) => {}
            Ok(PermissionStatus::Denied) => return ReminderOutcome::PermissionDenied,
            Err(err) => return ReminderOutcome::Failed(err.to_string()),
        }

        if let Err(err) = self.service.cancel_all_scheduled() {
            return ReminderOutcome::Failed(err.to_string());
        }

        let Some(habit) = pick_suggestion(habits, None, rng) else {
            return ReminderOutcome::NoActiveHabits;
        };

        let request = NotificationRequest::for_habit(habit, time);
        match self.service.schedule(&request) {
            Ok(notification_id) => ReminderOutcome::Scheduled {
                notification_id,
                habit_id: habit.id.clone(),
            },
            Err(err) => ReminderOutcome::Failed(err.to_string()),
        }
    }
}

fn log_outcome(settings: &ReminderSettings, outcome: &ReminderOutcome) {
    match outcome {
        ReminderOutcome::Scheduled {
            notification_id,
            habit_id,
        } => info!(
            "event=reminder_apply module=reminder status=ok action=scheduled time={} habit_id={habit_id} notification_id={notification_id}",
            settings.time
        ),
        ReminderOutcome::Cancelled => {
            info!("event=reminder_apply module=reminder status=ok action=cancelled")
        }
        ReminderOutcome::PermissionDenied => info!(
            "event=reminder_apply module=reminder status=skipped reason=permission_denied"
        ),
        ReminderOutcome::NoActiveHabits => {
            info!("event=reminder_apply module=reminder status=skipped reason=no_active_habits")
        }
        ReminderOutcome::Failed(message) => {
            error!("event=reminder_apply module=reminder status=error error={message}")
        }
    }
}
