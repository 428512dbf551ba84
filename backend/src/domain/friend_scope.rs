//! Friend scope resolution.
//!
//! A viewer's scope is the viewer plus everyone listed on the viewer's own
//! friendship rows. Scope drives which events appear in the feed and whose
//! health data is correlated.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::domain::Error;
use crate::domain::UserId;
use crate::domain::ports::{FriendshipRepository, FriendshipRepositoryError};

/// Message returned when a non-friend touches another user's data.
pub const FRIENDS_ONLY: &str = "not authorized — friends only";

pub(crate) fn map_friendship_error(error: FriendshipRepositoryError) -> Error {
    match error {
        FriendshipRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("friendship repository unavailable: {message}"))
        }
        FriendshipRepositoryError::Query { message } => {
            Error::internal(format!("friendship repository error: {message}"))
        }
    }
}

/// Users whose activity a viewer may see.
///
/// ## Invariants
/// - Always contains the viewer.
/// - Members are unique and iterate in ascending id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    viewer: UserId,
    members: BTreeSet<UserId>,
}

impl Scope {
    /// Build a scope from the viewer and their friends.
    pub fn new(viewer: UserId, friends: impl IntoIterator<Item = UserId>) -> Self {
        let mut members: BTreeSet<UserId> = friends.into_iter().collect();
        members.insert(viewer);
        Self { viewer, members }
    }

    /// The user the scope was resolved for.
    pub fn viewer(&self) -> UserId {
        self.viewer
    }

    /// Whether `user` is in scope.
    pub fn contains(&self, user: UserId) -> bool {
        self.members.contains(&user)
    }

    /// Members in ascending id order.
    pub fn members(&self) -> Vec<UserId> {
        self.members.iter().copied().collect()
    }

    /// Number of members, viewer included.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Resolves friend scopes and pairwise friendship.
#[derive(Clone)]
pub struct FriendScopeResolver<F> {
    friendships: Arc<F>,
}

impl<F> FriendScopeResolver<F> {
    /// Create a resolver over the friendship repository.
    pub fn new(friendships: Arc<F>) -> Self {
        Self { friendships }
    }
}

impl<F> FriendScopeResolver<F>
where
    F: FriendshipRepository,
{
    /// The viewer plus the friends listed on rows the viewer owns.
    pub async fn resolve_scope(&self, viewer: UserId) -> Result<Scope, Error> {
        let friends = self
            .friendships
            .friend_ids(viewer)
            .await
            .inspect_err(|err| debug!(user_id = %viewer, error = %err, "friend lookup failed"))
            .map_err(map_friendship_error)?;
        Ok(Scope::new(viewer, friends))
    }

    /// Whether a friendship row links `a` and `b` in either direction.
    pub async fn are_friends(&self, a: UserId, b: UserId) -> Result<bool, Error> {
        self.friendships
            .exists_between(a, b)
            .await
            .map_err(map_friendship_error)
    }
}
