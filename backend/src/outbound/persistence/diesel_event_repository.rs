//! PostgreSQL-backed `EventRepository` implementation using Diesel ORM.
//!
//! Owner profiles are loaded through an inner join with `users`, selecting
//! only public profile columns.

use async_trait::async_trait;
use diesel::dsl::count_distinct;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EventRepository, EventRepositoryError};
use crate::domain::{Event, EventId, EventType, EventWithOwner, NewEvent, TimeWindow, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{EventRow, NewEventRow, ProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::{events, users};

/// Diesel-backed implementation of the event repository port.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EventRepositoryError {
    map_basic_pool_error(error, EventRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EventRepositoryError {
    map_basic_diesel_error(
        error,
        EventRepositoryError::query,
        EventRepositoryError::connection,
    )
}

fn row_to_event(row: EventRow) -> Result<Event, EventRepositoryError> {
    row.into_event().map_err(EventRepositoryError::query)
}

fn raw_ids(owners: &[UserId]) -> Vec<i64> {
    owners.iter().map(|owner| owner.as_i64()).collect()
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = events::table
            .find(id.as_i64())
            .select(EventRow::as_select())
            .first::<EventRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_event).transpose()
    }

    async fn list_for_owners(
        &self,
        owners: &[UserId],
        window: TimeWindow,
    ) -> Result<Vec<EventWithOwner>, EventRepositoryError> {
        if owners.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(EventRow, ProfileRow)> = events::table
            .inner_join(users::table)
            .filter(events::user_id.eq_any(raw_ids(owners)))
            .filter(events::occurred_at.between(window.start(), window.end()))
            .order((events::occurred_at.desc(), events::id.desc()))
            .select((EventRow::as_select(), ProfileRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(event, owner)| {
                Ok(EventWithOwner {
                    event: row_to_event(event)?,
                    owner: owner
                        .into_profile()
                        .map_err(|err| EventRepositoryError::query(err.to_string()))?,
                })
            })
            .collect()
    }

    async fn count_by_owner(
        &self,
        owners: &[UserId],
        event_type: &EventType,
        window: TimeWindow,
    ) -> Result<Vec<(UserId, u64)>, EventRepositoryError> {
        if owners.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(i64, i64)> = events::table
            .filter(events::user_id.eq_any(raw_ids(owners)))
            .filter(events::event_type.eq(event_type.as_ref()))
            .filter(events::occurred_at.between(window.start(), window.end()))
            .group_by(events::user_id)
            .select((events::user_id, count_distinct(events::id)))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(owner, count)| {
                let count = u64::try_from(count)
                    .map_err(|_| EventRepositoryError::query(format!("negative count {count}")))?;
                Ok((UserId::from_db(owner), count))
            })
            .collect()
    }

    async fn insert(&self, event: &NewEvent) -> Result<Event, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewEventRow {
            user_id: event.owner_id.as_i64(),
            event_type: event.event_type.as_ref(),
            occurred_at: event.occurred_at,
            metadata: event.metadata.as_str(),
        };
        let stored: EventRow = diesel::insert_into(events::table)
            .values(&row)
            .returning(EventRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_event(stored)
    }

    async fn delete(&self, id: EventId) -> Result<bool, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(events::table.find(id.as_i64()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
