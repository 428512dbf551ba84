//! PostgreSQL-backed `FriendshipRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::UserId;
use crate::domain::ports::{FriendshipRepository, FriendshipRepositoryError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::friendships;

/// Diesel-backed implementation of the friendship repository port.
#[derive(Clone)]
pub struct DieselFriendshipRepository {
    pool: DbPool,
}

impl DieselFriendshipRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FriendshipRepositoryError {
    map_basic_pool_error(error, FriendshipRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FriendshipRepositoryError {
    map_basic_diesel_error(
        error,
        FriendshipRepositoryError::query,
        FriendshipRepositoryError::connection,
    )
}

#[async_trait]
impl FriendshipRepository for DieselFriendshipRepository {
    async fn friend_ids(&self, owner: UserId) -> Result<Vec<UserId>, FriendshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let ids: Vec<i64> = friendships::table
            .filter(friendships::user_id.eq(owner.as_i64()))
            .select(friendships::friend_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(ids.into_iter().map(UserId::from_db).collect())
    }

    async fn exists_between(&self, a: UserId, b: UserId) -> Result<bool, FriendshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (a, b) = (a.as_i64(), b.as_i64());

        diesel::select(exists(
            friendships::table.filter(
                friendships::user_id
                    .eq(a)
                    .and(friendships::friend_id.eq(b))
                    .or(friendships::user_id.eq(b).and(friendships::friend_id.eq(a))),
            ),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}
