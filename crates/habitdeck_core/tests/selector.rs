use habitdeck_core::{pick_suggestion, Habit, SuggestionCursor};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

const TRIALS: usize = 500;

fn habit(id: &str, archived: bool) -> Habit {
    Habit {
        id: id.to_string(),
        title: format!("habit {id}"),
        description: "d".to_string(),
        category: "Health".to_string(),
        is_favorite: false,
        is_archived: archived,
        created_at: "2024-01-01T00:00:00.000Z".to_string(),
    }
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn empty_or_fully_archived_pool_yields_no_suggestion() {
    let mut rng = rng();
    assert!(pick_suggestion(&[], None, &mut rng).is_none());

    let archived = vec![habit("1", true), habit("2", true)];
    assert!(pick_suggestion(&archived, Some("1"), &mut rng).is_none());
}

#[test]
fn single_active_habit_is_returned_regardless_of_previous() {
    let mut rng = rng();
    let habits = vec![habit("1", true), habit("2", false), habit("3", true)];
    for previous in [None, Some("2"), Some("1"), Some("zzz")] {
        let picked = pick_suggestion(&habits, previous, &mut rng).unwrap();
        assert_eq!(picked.id, "2");
    }
}

#[test]
fn two_active_habits_alternate_deterministically() {
    let mut rng = rng();
    let habits = vec![habit("1", false), habit("2", false)];
    for _ in 0..TRIALS {
        assert_eq!(pick_suggestion(&habits, Some("1"), &mut rng).unwrap().id, "2");
    }
}

#[test]
fn previous_pick_is_never_repeated_in_larger_pool() {
    let mut rng = rng();
    let habits = (1..=6)
        .map(|i| habit(&i.to_string(), i == 6))
        .collect::<Vec<_>>();

    let mut seen = HashSet::new();
    for _ in 0..TRIALS {
        let picked = pick_suggestion(&habits, Some("3"), &mut rng).unwrap();
        assert_ne!(picked.id, "3");
        assert!(!picked.is_archived);
        seen.insert(picked.id.clone());
    }
    // every other active habit shows up over enough trials
    assert_eq!(seen.len(), 4);
}

#[test]
fn unknown_previous_id_draws_from_whole_active_pool() {
    let mut rng = rng();
    let habits = vec![habit("1", false), habit("2", false), habit("3", false)];
    let seen = (0..TRIALS)
        .filter_map(|_| pick_suggestion(&habits, Some("gone"), &mut rng))
        .map(|h| h.id.clone())
        .collect::<HashSet<_>>();
    assert_eq!(seen.len(), 3);
}

#[test]
fn cursor_next_never_repeats_and_refresh_keeps_active_current() {
    let mut rng = rng();
    let mut habits = vec![habit("1", false), habit("2", false), habit("3", false)];
    let mut cursor = SuggestionCursor::new();

    let mut previous = cursor.next(&habits, &mut rng).unwrap().id.clone();
    for _ in 0..50 {
        let next = cursor.next(&habits, &mut rng).unwrap().id.clone();
        assert_ne!(next, previous);
        previous = next;
    }

    let kept = cursor.refresh(&habits, &mut rng).unwrap().id.clone();
    assert_eq!(kept, previous);

    let index = habits.iter().position(|h| h.id == previous).unwrap();
    habits[index].is_archived = true;
    assert!(cursor.current(&habits).is_none());
    let replaced = cursor.refresh(&habits, &mut rng).unwrap().id.clone();
    assert_ne!(replaced, previous);
    assert_eq!(cursor.current_id(), Some(replaced.as_str()));
}

#[test]
fn cursor_clears_when_nothing_is_active() {
    let mut rng = rng();
    let habits = vec![habit("1", true)];
    let mut cursor = SuggestionCursor::new();
    assert!(cursor.next(&habits, &mut rng).is_none());
    assert_eq!(cursor.current_id(), None);
}
