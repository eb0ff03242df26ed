//! Daily local reminder: persisted settings and the scheduling policy.
//!
//! The device notification API stays behind `NotificationService`; this
//! module only decides what to cancel and what to schedule.

pub mod scheduler;
pub mod settings;
