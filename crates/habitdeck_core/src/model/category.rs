//! Ordered, growable category set.
//!
//! # Invariants
//! - Names are unique (exact, case-sensitive match).
//! - Insertion order is preserved; names are never removed automatically.

use crate::model::habit::Habit;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategorySet {
    names: Vec<String>,
}

impl CategorySet {
    /// Builds a set from names, dropping blanks and duplicates.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for name in names {
            set.register(name);
        }
        set
    }

    /// Adds `name` when it is new. Returns `true` if the set grew.
    pub fn register(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name.trim().is_empty() || self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Registers every category used by `habits`, in collection order.
    pub fn register_all<'a>(&mut self, habits: impl IntoIterator<Item = &'a Habit>) {
        for habit in habits {
            self.register(habit.category.as_str());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.names.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::CategorySet;

    #[test]
    fn register_preserves_order_and_ignores_duplicates() {
        let mut set = CategorySet::from_names(["Health", "Fitness", "Health"]);
        assert_eq!(set.as_slice(), ["Health", "Fitness"]);

        assert!(set.register("Cooking"));
        assert!(!set.register("Fitness"));
        assert!(!set.register("  "));
        assert_eq!(set.as_slice(), ["Health", "Fitness", "Cooking"]);
    }
}
