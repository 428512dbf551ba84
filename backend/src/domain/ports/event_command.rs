//! Driving port for recording and deleting activity events.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{Error, Event, EventId, EventType, UserId};

/// Request to record an event owned by `owner_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordEventRequest {
    pub owner_id: UserId,
    pub event_type: EventType,
    /// Defaults to the current instant when absent.
    pub occurred_at: Option<DateTime<Utc>>,
    pub metadata: Value,
}

/// Stored event as returned to its owner.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[schema(value_type = i64, example = 41)]
    pub id: EventId,
    #[schema(value_type = i64, example = 7)]
    pub user_id: UserId,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "workout")]
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    #[schema(value_type = Object)]
    pub metadata: Value,
}

impl EventPayload {
    /// Convert a stored event, parsing its metadata.
    pub fn try_from_event(event: Event) -> Result<Self, serde_json::Error> {
        let metadata = event.metadata.parse()?;
        Ok(Self {
            id: event.id,
            user_id: event.owner_id,
            event_type: event.event_type,
            timestamp: event.occurred_at,
            metadata,
        })
    }
}

/// Response for a recorded event.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RecordEventResponse {
    pub event: EventPayload,
}

/// Request to delete an event; only its owner may do so.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteEventRequest {
    pub actor_id: UserId,
    pub event_id: EventId,
}

/// Driving port for event writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventCommand: Send + Sync {
    /// Record a new event for the caller.
    async fn record_event(&self, request: RecordEventRequest) -> Result<RecordEventResponse, Error>;

    /// Delete an owned event together with its reactions.
    async fn delete_event(&self, request: DeleteEventRequest) -> Result<(), Error>;
}
