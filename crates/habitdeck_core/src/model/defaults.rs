//! Built-in seed habits and categories.
//!
//! Used on first launch (nothing stored yet), on load failure, and on
//! explicit reset-to-defaults.

use crate::model::category::CategorySet;
use crate::model::habit::{now_iso8601, Habit};

pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Mindfulness",
    "Health",
    "Fitness",
    "Learning",
    "Productivity",
    "Relationships",
    "Career",
    "Personal Growth",
];

// (id, title, description, category)
const DEFAULT_HABITS: &[(&str, &str, &str, &str)] = &[
    (
        "1",
        "Meditate for 10 minutes",
        "Take time to clear your mind and focus on your breath. Just 10 minutes of mindfulness can reduce stress and improve focus.",
        "Mindfulness",
    ),
    (
        "2",
        "Drink 8 glasses of water",
        "Stay hydrated throughout the day. Proper hydration improves cognitive function, energy levels, and overall well-being.",
        "Health",
    ),
    (
        "3",
        "Read for 20 minutes",
        "Reading regularly expands your knowledge, reduces stress, and improves focus and concentration.",
        "Learning",
    ),
    (
        "4",
        "Practice gratitude",
        "Write down three things you're grateful for today. Gratitude practice increases happiness and reduces negative emotions.",
        "Mindfulness",
    ),
    (
        "5",
        "Take a 30-minute walk",
        "Walking improves cardiovascular health, boosts creativity, and helps clear your mind.",
        "Fitness",
    ),
    (
        "6",
        "Learn one new word",
        "Expanding your vocabulary improves communication skills and cognitive function over time.",
        "Learning",
    ),
    (
        "7",
        "Stretch for 5 minutes",
        "Regular stretching increases flexibility, improves posture, and helps prevent injuries.",
        "Fitness",
    ),
    (
        "8",
        "Write in a journal",
        "Journaling helps process emotions, gain clarity, and track personal growth over time.",
        "Mindfulness",
    ),
    (
        "9",
        "Plan your day",
        "Take 5 minutes to plan your priorities. This simple habit increases productivity and reduces stress.",
        "Productivity",
    ),
    (
        "10",
        "Eat a piece of fruit",
        "Fruits provide essential vitamins, minerals, and fiber that support overall health.",
        "Health",
    ),
    (
        "11",
        "Practice deep breathing",
        "Deep, intentional breathing reduces stress, lowers blood pressure, and improves mental clarity.",
        "Mindfulness",
    ),
    (
        "12",
        "Learn something new for 15 minutes",
        "Consistent learning keeps your mind sharp and expands your knowledge base over time.",
        "Learning",
    ),
];

/// Materializes the seed habits, stamping `created_at` with the current time.
pub fn default_habits() -> Vec<Habit> {
    let created_at = now_iso8601();
    DEFAULT_HABITS
        .iter()
        .map(|(id, title, description, category)| Habit {
            id: (*id).to_string(),
            title: (*title).to_string(),
            description: (*description).to_string(),
            category: (*category).to_string(),
            is_favorite: false,
            is_archived: false,
            created_at: created_at.clone(),
        })
        .collect()
}

pub fn default_categories() -> CategorySet {
    CategorySet::from_names(DEFAULT_CATEGORIES.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::{default_categories, default_habits, DEFAULT_CATEGORIES};
    use std::collections::HashSet;

    #[test]
    fn seed_ids_are_unique_and_categories_are_known() {
        let habits = default_habits();
        let categories = default_categories();
        let ids = habits.iter().map(|h| h.id.as_str()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), habits.len());
        assert!(habits.iter().all(|h| categories.contains(&h.category)));
        assert_eq!(categories.len(), DEFAULT_CATEGORIES.len());
    }

    #[test]
    fn seed_habits_fit_form_limits() {
        for habit in default_habits() {
            assert!(habit.title.chars().count() <= 50, "{}", habit.id);
            assert!(habit.description.chars().count() <= 200, "{}", habit.id);
        }
    }
}
