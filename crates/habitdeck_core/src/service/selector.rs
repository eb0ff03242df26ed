//! Random "today's suggestion" picker.
//!
//! # Invariants
//! - Archived habits are never returned.
//! - With two or more active habits, the previous pick is never returned.
//! - Each pick is a single uniform draw; there is no retry loop.

use crate::model::habit::{Habit, HabitId};
use rand::seq::IndexedRandom;
use rand::Rng;

/// Picks one active habit, avoiding `previous` when another one exists.
///
/// Returns `None` when no active habit exists (empty or all archived).
pub fn pick_suggestion<'a, R>(
    habits: &'a [Habit],
    previous: Option<&str>,
    rng: &mut R,
) -> Option<&'a Habit>
where
    R: Rng + ?Sized,
{
    let active = habits
        .iter()
        .filter(|habit| habit.is_active())
        .collect::<Vec<_>>();

    match active.as_slice() {
        [] => None,
        [only] => Some(*only),
        _ => {
            let fresh = active
                .iter()
                .copied()
                .filter(|habit| Some(habit.id.as_str()) != previous)
                .collect::<Vec<_>>();
            let pool = if fresh.is_empty() { &active } else { &fresh };
            pool.choose(rng).copied()
        }
    }
}

/// Tracks which suggestion is on screen between picks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionCursor {
    current: Option<HabitId>,
}

impl SuggestionCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Resolves the shown habit against `habits`.
    ///
    /// Returns `None` if it was deleted or archived since it was picked.
    pub fn current<'a>(&self, habits: &'a [Habit]) -> Option<&'a Habit> {
        let id = self.current.as_deref()?;
        habits
            .iter()
            .find(|habit| habit.id == id && habit.is_active())
    }

    /// Moves to a different suggestion ("next" button).
    pub fn next<'a, R>(&mut self, habits: &'a [Habit], rng: &mut R) -> Option<&'a Habit>
    where
        R: Rng + ?Sized,
    {
        let picked = pick_suggestion(habits, self.current.as_deref(), rng);
        self.current = picked.map(|habit| habit.id.clone());
        picked
    }

    /// Keeps the current suggestion while it is still active, else re-picks.
    pub fn refresh<'a, R>(&mut self, habits: &'a [Habit], rng: &mut R) -> Option<&'a Habit>
    where
        R: Rng + ?Sized,
    {
        if let Some(habit) = self.current(habits) {
            return Some(habit);
        }
        self.next(habits, rng)
    }
}
