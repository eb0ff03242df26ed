//! Flutter bridge for HabitDeck core.

pub mod api;
