//! Habit domain model.
//!
//! # Responsibility
//! - Define the persisted habit record and its JSON shape.
//! - Validate user drafts at the add/edit boundary.
//!
//! # Invariants
//! - `id` is stable and never reused for another habit.
//! - `created_at` is set once and never rewritten by edits.
//! - A draft that passes `validate()` always yields a non-empty title.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a habit record.
///
/// Seed habits use short numeric strings, user habits use UUID text.
pub type HabitId = String;

pub const TITLE_MAX_CHARS: usize = 50;
pub const DESCRIPTION_MAX_CHARS: usize = 200;
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Canonical habit record.
///
/// Field names serialize in camelCase to stay readable by data written
/// by earlier app builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub is_favorite: bool,
    /// Records older than the archive feature lack this field; the record
    /// migrations fill it in before deserialization.
    pub is_archived: bool,
    /// ISO-8601 UTC timestamp.
    pub created_at: String,
}

impl Habit {
    /// Builds a new habit from a validated draft.
    ///
    /// # Invariants
    /// - `id` is a fresh UUID v4.
    /// - `is_favorite` and `is_archived` start as `false`.
    ///
    /// # Errors
    /// - Returns the first draft validation failure.
    pub fn from_draft(draft: &HabitDraft) -> Result<Self, HabitValidationError> {
        Self::from_draft_with_id(Uuid::new_v4().to_string(), draft)
    }

    /// Builds a habit from a draft with a caller-provided id.
    ///
    /// Used by seed/import paths where identity already exists.
    pub fn from_draft_with_id(
        id: impl Into<HabitId>,
        draft: &HabitDraft,
    ) -> Result<Self, HabitValidationError> {
        draft.validate()?;
        Ok(Self {
            id: id.into(),
            title: draft.normalized_title(),
            description: draft.normalized_description(),
            category: draft.normalized_category(),
            is_favorite: false,
            is_archived: false,
            created_at: now_iso8601(),
        })
    }

    /// Returns an edited copy that keeps identity, flags and `created_at`.
    pub fn edited(&self, draft: &HabitDraft) -> Result<Self, HabitValidationError> {
        draft.validate()?;
        Ok(Self {
            title: draft.normalized_title(),
            description: draft.normalized_description(),
            category: draft.normalized_category(),
            ..self.clone()
        })
    }

    /// Returns whether this habit takes part in suggestions and reminders.
    pub fn is_active(&self) -> bool {
        !self.is_archived
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Raw user input from the add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitDraft {
    pub title: String,
    pub description: String,
    pub category: String,
}

impl HabitDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: category.into(),
        }
    }

    /// Checks form constraints on trimmed input.
    ///
    /// Lengths are counted in characters, not bytes.
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(HabitValidationError::EmptyTitle);
        }
        let title_chars = title.chars().count();
        if title_chars > TITLE_MAX_CHARS {
            return Err(HabitValidationError::TitleTooLong {
                max: TITLE_MAX_CHARS,
                actual: title_chars,
            });
        }
        let description_chars = self.description.trim().chars().count();
        if description_chars > DESCRIPTION_MAX_CHARS {
            return Err(HabitValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX_CHARS,
                actual: description_chars,
            });
        }
        if self.category.trim().is_empty() {
            return Err(HabitValidationError::EmptyCategory);
        }
        Ok(())
    }

    fn normalized_title(&self) -> String {
        self.title.trim().to_string()
    }

    fn normalized_description(&self) -> String {
        let description = self.description.trim();
        if description.is_empty() {
            DEFAULT_DESCRIPTION.to_string()
        } else {
            description.to_string()
        }
    }

    fn normalized_category(&self) -> String {
        self.category.trim().to_string()
    }
}

/// Validation failures for habit drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitValidationError {
    EmptyTitle,
    TitleTooLong { max: usize, actual: usize },
    DescriptionTooLong { max: usize, actual: usize },
    EmptyCategory,
}

impl Display for HabitValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Please enter a habit title"),
            Self::TitleTooLong { max, actual } => {
                write!(f, "title must be at most {max} characters, got {actual}")
            }
            Self::DescriptionTooLong { max, actual } => {
                write!(f, "description must be at most {max} characters, got {actual}")
            }
            Self::EmptyCategory => write!(f, "category cannot be empty"),
        }
    }
}

impl Error for HabitValidationError {}

/// Current time as ISO-8601 with millisecond precision and `Z` suffix.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::{Habit, HabitDraft, HabitValidationError, DEFAULT_DESCRIPTION};

    #[test]
    fn from_draft_trims_and_defaults_description() {
        let draft = HabitDraft::new("  Walk the dog  ", "   ", " Fitness ");
        let habit = Habit::from_draft(&draft).expect("draft should be valid");
        assert_eq!(habit.title, "Walk the dog");
        assert_eq!(habit.description, DEFAULT_DESCRIPTION);
        assert_eq!(habit.category, "Fitness");
        assert!(!habit.is_favorite);
        assert!(!habit.is_archived);
        assert!(habit.created_at.ends_with('Z'));
    }

    #[test]
    fn validate_counts_characters_not_bytes() {
        let title = "é".repeat(50);
        let draft = HabitDraft::new(title, "", "Health");
        assert!(draft.validate().is_ok());

        let too_long = HabitDraft::new("é".repeat(51), "", "Health");
        assert_eq!(
            too_long.validate(),
            Err(HabitValidationError::TitleTooLong {
                max: 50,
                actual: 51
            })
        );
    }

    #[test]
    fn edited_keeps_identity_and_flags() {
        let mut habit =
            Habit::from_draft_with_id("42", &HabitDraft::new("Read", "", "Learning")).unwrap();
        habit.is_favorite = true;
        let edited = habit
            .edited(&HabitDraft::new("Read more", "Two chapters", "Learning"))
            .unwrap();
        assert_eq!(edited.id, "42");
        assert_eq!(edited.created_at, habit.created_at);
        assert!(edited.is_favorite);
        assert_eq!(edited.title, "Read more");
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let habit =
            Habit::from_draft_with_id("7", &HabitDraft::new("Stretch", "", "Fitness")).unwrap();
        let json = serde_json::to_value(&habit).unwrap();
        assert_eq!(json["isFavorite"], false);
        assert_eq!(json["isArchived"], false);
        assert!(json["createdAt"].is_string());
    }
}
