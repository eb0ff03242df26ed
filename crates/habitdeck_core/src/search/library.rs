//! Library screen filtering.
//!
//! # Responsibility
//! - Match habits against free text, an optional category and a section.
//!
//! # Invariants
//! - Text matching is a case-insensitive substring test on title or
//!   description; blank text matches everything.
//! - Results keep collection order.

use crate::model::habit::Habit;

/// Which half of the library is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LibrarySection {
    #[default]
    Active,
    Archived,
}

impl LibrarySection {
    pub fn includes(self, habit: &Habit) -> bool {
        match self {
            Self::Active => !habit.is_archived,
            Self::Archived => habit.is_archived,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryQuery {
    pub text: String,
    /// Exact category name; `None` means every category.
    pub category: Option<String>,
    pub section: LibrarySection,
    pub favorites_only: bool,
}

impl LibraryQuery {
    pub fn matches(&self, habit: &Habit) -> bool {
        self.section.includes(habit)
            && (!self.favorites_only || habit.is_favorite)
            && self
                .category
                .as_deref()
                .map_or(true, |category| habit.category == category)
            && matches_text(habit, &self.text)
    }
}

/// Applies `query` to `habits`.
pub fn filter_library<'a>(habits: &'a [Habit], query: &LibraryQuery) -> Vec<&'a Habit> {
    habits.iter().filter(|habit| query.matches(habit)).collect()
}

fn matches_text(habit: &Habit, text: &str) -> bool {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    habit.title.to_lowercase().contains(&needle)
        || habit.description.to_lowercase().contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::matches_text;
    use crate::model::habit::{Habit, HabitDraft};

    #[test]
    fn text_match_is_case_insensitive_on_title_and_description() {
        let habit =
            Habit::from_draft_with_id("1", &HabitDraft::new("Morning Run", "Easy 5K", "Fitness"))
                .unwrap();
        assert!(matches_text(&habit, "run"));
        assert!(matches_text(&habit, "5k"));
        assert!(matches_text(&habit, "   "));
        assert!(!matches_text(&habit, "swim"));
    }
}
