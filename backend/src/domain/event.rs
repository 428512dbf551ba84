//! Activity events and their opaque metadata.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{UserId, UserProfile};

/// Tag used for workout events counted by the health correlator.
pub const WORKOUT_EVENT_TYPE: &str = "workout";
/// Maximum event type length, matching the `events.event_type` column.
pub const EVENT_TYPE_MAX: usize = 64;

/// Validation errors for event values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventValidationError {
    /// Identifier is zero or negative.
    #[error("event id must be a positive integer")]
    InvalidId,
    /// Type tag is blank.
    #[error("event type must not be empty")]
    EmptyType,
    /// Type tag exceeds the column width.
    #[error("event type must be at most {max} characters")]
    TypeTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

/// Stable numeric event identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct EventId(i64);

impl EventId {
    /// Validate and construct an [`EventId`].
    pub fn new(id: i64) -> Result<Self, EventValidationError> {
        if id <= 0 {
            return Err(EventValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Access the raw identifier.
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EventId> for i64 {
    fn from(value: EventId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for EventId {
    type Error = EventValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Open string tag classifying an event, e.g. `workout`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventType(String);

impl EventType {
    /// Validate and construct an [`EventType`].
    pub fn new(tag: impl Into<String>) -> Result<Self, EventValidationError> {
        let tag = tag.into();
        if tag.trim().is_empty() {
            return Err(EventValidationError::EmptyType);
        }
        if tag.chars().count() > EVENT_TYPE_MAX {
            return Err(EventValidationError::TypeTooLong {
                max: EVENT_TYPE_MAX,
            });
        }
        Ok(Self(tag))
    }

    /// The tag counted as a workout.
    pub fn workout() -> Self {
        Self(WORKOUT_EVENT_TYPE.to_owned())
    }
}

impl AsRef<str> for EventType {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        value.0
    }
}

impl TryFrom<String> for EventType {
    type Error = EventValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Event metadata in its stored, serialised form.
///
/// The payload is opaque to the domain. It is serialised once when the event
/// is written and parsed again when the event is read; a payload that does
/// not parse is a storage fault, never silently replaced by a default.
///
/// # Examples
/// ```
/// use fitfeed::domain::EventMetadata;
/// use serde_json::json;
///
/// let metadata = EventMetadata::from_value(&json!({ "km": 5 }));
/// assert_eq!(metadata.parse().expect("valid json"), json!({ "km": 5 }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMetadata(String);

impl EventMetadata {
    /// Serialise a structured payload for storage.
    pub fn from_value(value: &Value) -> Self {
        Self(value.to_string())
    }

    /// Wrap a payload read back from storage.
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Serialised representation.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Parse the stored representation.
    pub fn parse(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.0)
    }
}

/// Persisted activity event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Stable identifier.
    pub id: EventId,
    /// Owning user; the only user allowed to create or delete it.
    pub owner_id: UserId,
    /// Classification tag.
    pub event_type: EventType,
    /// When the activity happened.
    pub occurred_at: DateTime<Utc>,
    /// Serialised payload.
    pub metadata: EventMetadata,
}

/// Event joined with its owner's public profile.
#[derive(Debug, Clone, PartialEq)]
pub struct EventWithOwner {
    /// The event row.
    pub event: Event,
    /// Owner identity fields.
    pub owner: UserProfile,
}

/// Values for a new event row; the identifier is assigned by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    /// Owning user.
    pub owner_id: UserId,
    /// Classification tag.
    pub event_type: EventType,
    /// When the activity happened.
    pub occurred_at: DateTime<Utc>,
    /// Serialised payload.
    pub metadata: EventMetadata,
}
