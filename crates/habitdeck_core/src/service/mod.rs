//! Core use-case services.
//!
//! # Responsibility
//! - Own the habit collection and route every mutation through one store.
//! - Provide the pure suggestion picker used by the today screen and
//!   reminders.

pub mod habit_store;
pub mod selector;
