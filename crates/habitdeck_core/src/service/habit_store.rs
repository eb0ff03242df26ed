//! Habit store: the single owner of the habit collection.
//!
//! # Responsibility
//! - Load (and migrate) the persisted collection at startup, falling back
//!   to seed defaults when storage is empty or unreadable.
//! - Expose the only mutation surface for habits and categories.
//! - Queue a full-collection write-back after every effective mutation.
//!
//! # Invariants
//! - Habit ids are unique within the collection.
//! - The category set contains the seed categories plus every category
//!   used by a habit; it never shrinks except on reset.
//! - In-memory state is authoritative; failed writes never roll it back.
//! - An empty collection is never written back.
//! - Unknown ids on update/delete/toggle are no-ops, not errors.

use crate::model::category::CategorySet;
use crate::model::defaults::{default_categories, default_habits};
use crate::model::habit::Habit;
use crate::repo::habit_repo::HabitRepository;
use crate::storage::StorageHandle;
use log::{debug, error, info, warn};

/// Where the startup collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Decoded from storage.
    Stored,
    /// Nothing stored yet; seed defaults were written.
    FirstRunSeed,
    /// Storage could not be read or decoded; seed defaults live in memory only.
    FallbackSeed,
}

pub struct HabitStore {
    habits: Vec<Habit>,
    categories: CategorySet,
    repo: HabitRepository,
    load_source: LoadSource,
}

impl HabitStore {
    /// Loads the collection through `storage`.
    ///
    /// Never fails: storage problems degrade to seed defaults and are logged.
    pub fn open(storage: StorageHandle) -> Self {
        let repo = HabitRepository::new(storage);
        let mut categories = default_categories();

        let (habits, load_source) = match repo.load() {
            Ok(Some(habits)) => {
                info!(
                    "event=habits_load module=store status=ok source=stored count={}",
                    habits.len()
                );
                (habits, LoadSource::Stored)
            }
            Ok(None) => {
                let habits = default_habits();
                info!(
                    "event=habits_load module=store status=ok source=first_run_seed count={}",
                    habits.len()
                );
                (habits, LoadSource::FirstRunSeed)
            }
            Err(err) => {
                error!(
                    "event=habits_load module=store status=error fallback=seed error={err}"
                );
                (default_habits(), LoadSource::FallbackSeed)
            }
        };
        categories.register_all(&habits);

        let store = Self {
            habits,
            categories,
            repo,
            load_source,
        };
        if load_source == LoadSource::FirstRunSeed {
            store.write_back("seed");
        }
        store
    }

    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    /// Owned copy for consumers that outlive the borrow (e.g. FFI).
    pub fn snapshot(&self) -> Vec<Habit> {
        self.habits.clone()
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn active_habits(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter().filter(|habit| habit.is_active())
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// Appends `habit` and registers its category.
    ///
    /// Silently ignored (returns `false`) when the title is blank or the id
    /// already exists; callers validate drafts before reaching here.
    pub fn add(&mut self, habit: Habit) -> bool {
        if !habit.has_title() {
            warn!("event=habit_add module=store status=skipped reason=empty_title");
            return false;
        }
        if self.get(&habit.id).is_some() {
            warn!(
                "event=habit_add module=store status=skipped reason=duplicate_id id={}",
                habit.id
            );
            return false;
        }

        self.categories.register(habit.category.as_str());
        self.habits.push(habit);
        self.write_back("add");
        true
    }

    /// Replaces the record with the same id. Returns `false` if none matched.
    pub fn update(&mut self, habit: Habit) -> bool {
        let Some(slot) = self.habits.iter_mut().find(|existing| existing.id == habit.id) else {
            debug!(
                "event=habit_update module=store status=skipped reason=not_found id={}",
                habit.id
            );
            return false;
        };

        self.categories.register(habit.category.as_str());
        *slot = habit;
        self.write_back("update");
        true
    }

    /// Removes the record with `id`. Returns `false` if none matched.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.habits.len();
        self.habits.retain(|habit| habit.id != id);
        if self.habits.len() == before {
            debug!("event=habit_delete module=store status=skipped reason=not_found id={id}");
            return false;
        }
        self.write_back("delete");
        true
    }

    /// Flips `is_favorite`; returns the new value, or `None` if not found.
    pub fn toggle_favorite(&mut self, id: &str) -> Option<bool> {
        let value = self.toggle(id, |habit| &mut habit.is_favorite)?;
        self.write_back("toggle_favorite");
        Some(value)
    }

    /// Flips `is_archived`; returns the new value, or `None` if not found.
    pub fn toggle_archive(&mut self, id: &str) -> Option<bool> {
        let value = self.toggle(id, |habit| &mut habit.is_archived)?;
        self.write_back("toggle_archive");
        Some(value)
    }

    /// Discards all user data and restores the seed habits and categories.
    pub fn reset_to_defaults(&mut self) {
        self.habits = default_habits();
        self.categories = default_categories();
        info!(
            "event=habits_reset module=store status=ok count={}",
            self.habits.len()
        );
        self.write_back("reset");
    }

    fn toggle(&mut self, id: &str, field: impl FnOnce(&mut Habit) -> &mut bool) -> Option<bool> {
        let habit = self.habits.iter_mut().find(|habit| habit.id == id)?;
        let flag = field(habit);
        *flag = !*flag;
        Some(*flag)
    }

    fn write_back(&self, reason: &'static str) {
        if self.habits.is_empty() {
            debug!("event=habits_persist module=store status=skipped reason=empty trigger={reason}");
            return;
        }
        match self.repo.save(&self.habits) {
            Ok(()) => debug!(
                "event=habits_persist module=store status=queued trigger={reason} count={}",
                self.habits.len()
            ),
            Err(err) => error!(
                "event=habits_persist module=store status=error trigger={reason} error={err}"
            ),
        }
    }
}
