//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Event, EventId, EventMetadata, EventType, UserId, UserProfile, UserValidationError,
};

use super::schema::{event_reactions, events, health_metrics, users};

/// Public profile columns of the users table.
///
/// Deliberately omits `password`; selecting through this struct keeps
/// credential material out of every query.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: i64,
    pub name: String,
    pub handle: String,
}

impl ProfileRow {
    /// Validate the stored columns into a domain profile.
    pub fn into_profile(self) -> Result<UserProfile, UserValidationError> {
        UserProfile::try_from_parts(self.id, self.name, self.handle)
    }
}

// ---------------------------------------------------------------------------
// Event models
// ---------------------------------------------------------------------------

/// Row struct for reading from the events table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: i64,
    pub user_id: i64,
    pub event_type: String,
    pub occurred_at: DateTime<Utc>,
    pub metadata: String,
}

impl EventRow {
    /// Validate the stored columns into a domain event.
    ///
    /// Metadata stays serialised; it is parsed where it is served.
    pub fn into_event(self) -> Result<Event, String> {
        Ok(Event {
            id: EventId::new(self.id).map_err(|err| err.to_string())?,
            owner_id: UserId::new(self.user_id).map_err(|err| err.to_string())?,
            event_type: EventType::new(self.event_type).map_err(|err| err.to_string())?,
            occurred_at: self.occurred_at,
            metadata: EventMetadata::from_stored(self.metadata),
        })
    }
}

/// Insertable struct for creating new events.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub user_id: i64,
    pub event_type: &'a str,
    pub occurred_at: DateTime<Utc>,
    pub metadata: &'a str,
}

// ---------------------------------------------------------------------------
// Reaction models
// ---------------------------------------------------------------------------

/// Row struct for reading from the event_reactions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = event_reactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReactionRow {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub content: String,
}

/// Insertable struct for the reaction upsert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = event_reactions)]
pub(crate) struct NewReactionRow<'a> {
    pub event_id: i64,
    pub user_id: i64,
    pub content: &'a str,
}

// ---------------------------------------------------------------------------
// Health metric models
// ---------------------------------------------------------------------------

/// Row struct for reading from the health_metrics table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = health_metrics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HealthMetricRow {
    pub id: i64,
    pub user_id: i64,
    pub metric_type: String,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Insertable struct for creating new metrics.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = health_metrics)]
pub(crate) struct NewHealthMetricRow<'a> {
    pub user_id: i64,
    pub metric_type: &'a str,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}
