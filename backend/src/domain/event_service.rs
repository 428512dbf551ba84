//! Event recording and deletion.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::health_correlator::map_event_error;
use crate::domain::ports::{
    DeleteEventRequest, EventCommand, EventPayload, EventRepository, RecordEventRequest,
    RecordEventResponse,
};
use crate::domain::reaction_service::EVENT_NOT_FOUND;
use crate::domain::{Error, EventMetadata, NewEvent};

/// Message returned when a user tries to delete someone else's event.
pub const NOT_EVENT_OWNER: &str = "only the owner may delete an event";

/// Event service implementing the [`EventCommand`] driving port.
pub struct EventService<E> {
    events: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<E> EventService<E> {
    /// Create an event service; `clock` stamps events recorded without a
    /// timestamp.
    pub fn new(events: Arc<E>, clock: Arc<dyn Clock>) -> Self {
        Self { events, clock }
    }
}

#[async_trait]
impl<E> EventCommand for EventService<E>
where
    E: EventRepository,
{
    async fn record_event(&self, request: RecordEventRequest) -> Result<RecordEventResponse, Error> {
        let new_event = NewEvent {
            owner_id: request.owner_id,
            event_type: request.event_type,
            occurred_at: request.occurred_at.unwrap_or_else(|| self.clock.utc()),
            metadata: EventMetadata::from_value(&request.metadata),
        };
        let event = self
            .events
            .insert(&new_event)
            .await
            .map_err(map_event_error)?;
        info!(owner = %event.owner_id, event_id = %event.id, "event recorded");

        let event = EventPayload::try_from_event(event).map_err(|err| {
            error!(error = %err, "stored event metadata is not valid JSON");
            Error::internal("stored event metadata is not valid JSON")
        })?;
        Ok(RecordEventResponse { event })
    }

    async fn delete_event(&self, request: DeleteEventRequest) -> Result<(), Error> {
        let event = self
            .events
            .find_by_id(request.event_id)
            .await
            .map_err(map_event_error)?
            .ok_or_else(|| Error::not_found(EVENT_NOT_FOUND))?;
        if event.owner_id != request.actor_id {
            return Err(Error::forbidden(NOT_EVENT_OWNER));
        }

        // A concurrent delete may win between the lookup and this call.
        if !self
            .events
            .delete(request.event_id)
            .await
            .map_err(map_event_error)?
        {
            return Err(Error::not_found(EVENT_NOT_FOUND));
        }
        info!(owner = %request.actor_id, event_id = %request.event_id, "event deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ports::MockEventRepository;
    use crate::domain::{ErrorCode, Event, EventId, EventType, UserId};
    use crate::test_support::MutableClock;

    fn user(id: i64) -> UserId {
        UserId::new(id).expect("valid user id")
    }

    fn event_id(id: i64) -> EventId {
        EventId::new(id).expect("valid event id")
    }

    fn stored(id: i64, owner: i64) -> Event {
        Event {
            id: event_id(id),
            owner_id: user(owner),
            event_type: EventType::workout(),
            occurred_at: Utc::now(),
            metadata: EventMetadata::from_value(&json!({ "km": 3 })),
        }
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 3, 10, 7, 0, 0)
                .single()
                .expect("timestamp"),
        ))
    }

    #[rstest]
    #[tokio::test]
    async fn recording_without_timestamp_uses_the_clock() {
        let expected_at = clock().utc();
        let mut repo = MockEventRepository::new();
        repo.expect_insert()
            .withf(move |event| {
                event.occurred_at == expected_at && event.metadata.as_str() == r#"{"km":3}"#
            })
            .times(1)
            .return_once(|event| {
                Ok(Event {
                    id: event_id(9),
                    owner_id: event.owner_id,
                    event_type: event.event_type.clone(),
                    occurred_at: event.occurred_at,
                    metadata: event.metadata.clone(),
                })
            });

        let response = EventService::new(Arc::new(repo), clock())
            .record_event(RecordEventRequest {
                owner_id: user(1),
                event_type: EventType::workout(),
                occurred_at: None,
                metadata: json!({ "km": 3 }),
            })
            .await
            .expect("event recorded");

        assert_eq!(response.event.id, event_id(9));
        assert_eq!(response.event.metadata, json!({ "km": 3 }));
        assert_eq!(response.event.timestamp, expected_at);
    }

    #[rstest]
    #[tokio::test]
    async fn owners_can_delete_their_events() {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_id()
            .return_once(|_| Ok(Some(stored(4, 1))));
        repo.expect_delete()
            .withf(|id| *id == event_id(4))
            .times(1)
            .return_once(|_| Ok(true));

        EventService::new(Arc::new(repo), clock())
            .delete_event(DeleteEventRequest {
                actor_id: user(1),
                event_id: event_id(4),
            })
            .await
            .expect("event deleted");
    }

    #[rstest]
    #[tokio::test]
    async fn other_users_cannot_delete() {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_id()
            .return_once(|_| Ok(Some(stored(4, 1))));
        repo.expect_delete().times(0);

        let error = EventService::new(Arc::new(repo), clock())
            .delete_event(DeleteEventRequest {
                actor_id: user(2),
                event_id: event_id(4),
            })
            .await
            .expect_err("not owner");

        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some(1), false)]
    #[tokio::test]
    async fn missing_events_are_not_found(#[case] owner: Option<i64>, #[case] deleted: bool) {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(owner.map(|owner| stored(4, owner))));
        repo.expect_delete().returning(move |_| Ok(deleted));

        let error = EventService::new(Arc::new(repo), clock())
            .delete_event(DeleteEventRequest {
                actor_id: user(1),
                event_id: event_id(4),
            })
            .await
            .expect_err("missing event");

        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), EVENT_NOT_FOUND);
    }
}
