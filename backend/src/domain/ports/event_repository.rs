//! Port for activity event persistence and grouped event reads.

use async_trait::async_trait;

use crate::domain::{Event, EventId, EventType, EventWithOwner, NewEvent, TimeWindow, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by event repository adapters.
    pub enum EventRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "event repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "event repository query failed: {message}",
    }
}

/// Port for reading and writing events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Find a single event by identifier.
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError>;

    /// Events owned by any of `owners` inside `window`, joined with the
    /// owner's profile. Newest first; ties broken by descending id.
    async fn list_for_owners(
        &self,
        owners: &[UserId],
        window: TimeWindow,
    ) -> Result<Vec<EventWithOwner>, EventRepositoryError>;

    /// Number of distinct events of `event_type` per owner inside `window`.
    ///
    /// Owners without matching events are omitted from the result.
    async fn count_by_owner(
        &self,
        owners: &[UserId],
        event_type: &EventType,
        window: TimeWindow,
    ) -> Result<Vec<(UserId, u64)>, EventRepositoryError>;

    /// Insert a new event and return the stored row.
    async fn insert(&self, event: &NewEvent) -> Result<Event, EventRepositoryError>;

    /// Delete an event and, through the foreign key, its reactions.
    ///
    /// Returns `false` when no row matched.
    async fn delete(&self, id: EventId) -> Result<bool, EventRepositoryError>;
}
