//! Reaction state machine.
//!
//! Per `(actor, event)` pair the state is either "no reaction" or "holds a
//! label". Reacting always moves the pair to the new label through a single
//! atomic replacement in storage.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::Error;
use crate::domain::feed_service::map_reaction_error;
use crate::domain::friend_scope::{FRIENDS_ONLY, FriendScopeResolver};
use crate::domain::health_correlator::map_event_error;
use crate::domain::ports::{
    EventRepository, FriendshipRepository, ReactRequest, ReactResponse, ReactionCommand,
    ReactionRepository,
};

/// Message returned when the event does not exist.
pub const EVENT_NOT_FOUND: &str = "event not found";
/// Message returned when the actor owns the event.
pub const SELF_REACTION_FORBIDDEN: &str = "cannot react to own event";

/// Reaction service implementing the [`ReactionCommand`] driving port.
pub struct ReactionService<F, E, R> {
    scope: FriendScopeResolver<F>,
    events: Arc<E>,
    reactions: Arc<R>,
}

impl<F, E, R> ReactionService<F, E, R> {
    /// Create a reaction service.
    pub fn new(friendships: Arc<F>, events: Arc<E>, reactions: Arc<R>) -> Self {
        Self {
            scope: FriendScopeResolver::new(friendships),
            events,
            reactions,
        }
    }
}

#[async_trait]
impl<F, E, R> ReactionCommand for ReactionService<F, E, R>
where
    F: FriendshipRepository,
    E: EventRepository,
    R: ReactionRepository,
{
    async fn react(&self, request: ReactRequest) -> Result<ReactResponse, Error> {
        let ReactRequest {
            actor_id,
            event_id,
            content,
        } = request;

        let event = self
            .events
            .find_by_id(event_id)
            .await
            .map_err(map_event_error)?
            .ok_or_else(|| Error::not_found(EVENT_NOT_FOUND))?;

        if event.owner_id == actor_id {
            return Err(Error::forbidden(SELF_REACTION_FORBIDDEN));
        }
        if !self.scope.are_friends(actor_id, event.owner_id).await? {
            debug!(actor = %actor_id, owner = %event.owner_id, "reaction rejected outside friendship");
            return Err(Error::forbidden(FRIENDS_ONLY));
        }

        let reaction = self
            .reactions
            .replace_for_user(event_id, actor_id, &content)
            .await
            .map_err(map_reaction_error)?;
        info!(
            actor = %actor_id,
            event_id = %event_id,
            reaction_id = %reaction.id,
            "reaction stored"
        );

        Ok(ReactResponse {
            reaction: reaction.into(),
        })
    }
}

#[cfg(test)]
#[path = "reaction_service_tests.rs"]
mod tests;
