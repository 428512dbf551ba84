//! Port for reading the friendship graph.
//!
//! Friendship rows are directed `(user_id, friend_id)` edges written in
//! symmetric pairs by the invite workflow, which lives outside this crate.

use async_trait::async_trait;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by friendship repository adapters.
    pub enum FriendshipRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "friendship repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "friendship repository query failed: {message}",
    }
}

/// Port for friendship lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendshipRepository: Send + Sync {
    /// Friends listed on rows owned by `owner` (outgoing edges only).
    async fn friend_ids(&self, owner: UserId) -> Result<Vec<UserId>, FriendshipRepositoryError>;

    /// Whether an edge exists from `a` to `b` or from `b` to `a`.
    async fn exists_between(&self, a: UserId, b: UserId) -> Result<bool, FriendshipRepositoryError>;
}
