//! Domain model for habit suggestions.
//!
//! # Responsibility
//! - Define the canonical habit record shared by every screen.
//! - Own the growable category set and the built-in seed data.
//!
//! # Invariants
//! - Every habit is identified by a stable, never-reused `HabitId`.
//! - Archiving is a flag on the record, not a removal.

pub mod category;
pub mod defaults;
pub mod habit;
