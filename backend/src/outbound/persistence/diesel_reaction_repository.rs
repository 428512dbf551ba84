//! PostgreSQL-backed `ReactionRepository` implementation using Diesel ORM.
//!
//! Replacement is one `INSERT .. ON CONFLICT (event_id, user_id) DO UPDATE`
//! statement. The conflicting row takes a fresh identifier from the table's
//! sequence, so a replaced reaction is indistinguishable from a delete
//! followed by an insert, without the window in which two concurrent
//! requests could both insert.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReactionRepository, ReactionRepositoryError};
use crate::domain::{EventId, Reaction, ReactionId, ReactionLabel, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewReactionRow, ProfileRow, ReactionRow};
use super::pool::{DbPool, PoolError};
use super::schema::{event_reactions, users};

const NEXT_REACTION_ID: &str = "nextval('event_reactions_id_seq')";

/// Diesel-backed implementation of the reaction repository port.
#[derive(Clone)]
pub struct DieselReactionRepository {
    pool: DbPool,
}

impl DieselReactionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReactionRepositoryError {
    map_basic_pool_error(error, ReactionRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ReactionRepositoryError {
    map_basic_diesel_error(
        error,
        ReactionRepositoryError::query,
        ReactionRepositoryError::connection,
    )
}

fn rows_to_reaction(row: ReactionRow, reactor: ProfileRow) -> Result<Reaction, ReactionRepositoryError> {
    Ok(Reaction {
        id: ReactionId::new(row.id),
        event_id: EventId::new(row.event_id)
            .map_err(|err| ReactionRepositoryError::query(err.to_string()))?,
        content: ReactionLabel::new(row.content)
            .map_err(|err| ReactionRepositoryError::query(err.to_string()))?,
        reactor: reactor
            .into_profile()
            .map_err(|err| ReactionRepositoryError::query(err.to_string()))?,
    })
}

#[async_trait]
impl ReactionRepository for DieselReactionRepository {
    async fn list_with_reactors(&self) -> Result<Vec<Reaction>, ReactionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(ReactionRow, ProfileRow)> = event_reactions::table
            .inner_join(users::table)
            .order(event_reactions::id.asc())
            .select((ReactionRow::as_select(), ProfileRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, reactor)| rows_to_reaction(row, reactor))
            .collect()
    }

    async fn replace_for_user(
        &self,
        event_id: EventId,
        user_id: UserId,
        content: &ReactionLabel,
    ) -> Result<Reaction, ReactionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewReactionRow {
            event_id: event_id.as_i64(),
            user_id: user_id.as_i64(),
            content: content.as_ref(),
        };
        let stored: ReactionRow = diesel::insert_into(event_reactions::table)
            .values(&new_row)
            .on_conflict((event_reactions::event_id, event_reactions::user_id))
            .do_update()
            .set((
                event_reactions::id.eq(sql::<BigInt>(NEXT_REACTION_ID)),
                event_reactions::content.eq(excluded(event_reactions::content)),
            ))
            .returning(ReactionRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let reactor: ProfileRow = users::table
            .find(stored.user_id)
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_reaction(stored, reactor)
    }
}
