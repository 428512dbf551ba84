//! Reactions left by friends on activity events.
//!
//! A user holds at most one reaction per event. Reacting again replaces the
//! previous row (and its identifier) instead of adding a second one.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{EventId, UserProfile};

/// Maximum label length, matching the `event_reactions.content` column.
pub const REACTION_LABEL_MAX: usize = 32;

/// Validation errors for reaction values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReactionValidationError {
    /// Label is blank.
    #[error("reaction content must not be empty")]
    EmptyLabel,
    /// Label exceeds the column width.
    #[error("reaction content must be at most {max} characters")]
    LabelTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

/// Storage-assigned reaction identifier. Changes on every replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionId(i64);

impl ReactionId {
    /// Wrap a storage identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ReactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Open string reaction label such as `like` or `love`.
///
/// # Examples
/// ```
/// use fitfeed::domain::ReactionLabel;
///
/// let label = ReactionLabel::new("like").expect("valid label");
/// assert_eq!(label.as_ref(), "like");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReactionLabel(String);

impl ReactionLabel {
    /// Validate and construct a [`ReactionLabel`].
    pub fn new(label: impl Into<String>) -> Result<Self, ReactionValidationError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(ReactionValidationError::EmptyLabel);
        }
        if label.chars().count() > REACTION_LABEL_MAX {
            return Err(ReactionValidationError::LabelTooLong {
                max: REACTION_LABEL_MAX,
            });
        }
        Ok(Self(label))
    }
}

impl AsRef<str> for ReactionLabel {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ReactionLabel> for String {
    fn from(value: ReactionLabel) -> Self {
        value.0
    }
}

impl TryFrom<String> for ReactionLabel {
    type Error = ReactionValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Reaction joined with the reacting user's public profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    /// Storage identifier.
    pub id: ReactionId,
    /// Event the reaction belongs to.
    pub event_id: EventId,
    /// Label chosen by the reacting user.
    pub content: ReactionLabel,
    /// Reacting user identity fields.
    pub reactor: UserProfile,
}
