use habitdeck_core::{default_habits, filter_library, Habit, LibraryQuery, LibrarySection};

fn library() -> Vec<Habit> {
    let mut habits = default_habits();
    // "Read for 20 minutes" archived, "Take a 30-minute walk" favorite
    habits[2].is_archived = true;
    habits[4].is_favorite = true;
    habits
}

fn ids(habits: &[&Habit]) -> Vec<String> {
    habits.iter().map(|habit| habit.id.clone()).collect()
}

#[test]
fn default_query_lists_active_habits_in_collection_order() {
    let habits = library();
    let result = filter_library(&habits, &LibraryQuery::default());
    assert_eq!(result.len(), habits.len() - 1);
    assert!(result.iter().all(|habit| !habit.is_archived));
    assert_eq!(result[0].id, "1");
    assert_eq!(result[2].id, "4");
}

#[test]
fn archived_section_only_shows_archived() {
    let habits = library();
    let query = LibraryQuery {
        section: LibrarySection::Archived,
        ..LibraryQuery::default()
    };
    assert_eq!(ids(&filter_library(&habits, &query)), vec!["3"]);
}

#[test]
fn text_matches_title_or_description_case_insensitively() {
    let habits = library();
    let by_title = LibraryQuery {
        text: "LEARN".to_string(),
        ..LibraryQuery::default()
    };
    assert_eq!(ids(&filter_library(&habits, &by_title)), vec!["6", "12"]);

    let by_description = LibraryQuery {
        text: "blood pressure".to_string(),
        ..LibraryQuery::default()
    };
    assert_eq!(ids(&filter_library(&habits, &by_description)), vec!["11"]);
}

#[test]
fn category_and_favorites_filters_combine() {
    let habits = library();
    let fitness = LibraryQuery {
        category: Some("Fitness".to_string()),
        ..LibraryQuery::default()
    };
    assert_eq!(ids(&filter_library(&habits, &fitness)), vec!["5", "7"]);

    let favorites = LibraryQuery {
        favorites_only: true,
        ..fitness
    };
    assert_eq!(ids(&filter_library(&habits, &favorites)), vec!["5"]);
}
