//! Driving port for reacting to friends' events.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, EventId, Reaction, ReactionId, ReactionLabel, UserId, UserProfile};

/// Request to set or replace the actor's reaction on an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactRequest {
    pub actor_id: UserId,
    pub event_id: EventId,
    pub content: ReactionLabel,
}

/// Stored reaction joined with the actor's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReactionSummary {
    #[schema(value_type = i64, example = 12)]
    pub id: ReactionId,
    #[schema(value_type = i64, example = 41)]
    pub event_id: EventId,
    #[schema(value_type = String, example = "love")]
    pub content: ReactionLabel,
    pub user: UserProfile,
}

impl From<Reaction> for ReactionSummary {
    fn from(value: Reaction) -> Self {
        Self {
            id: value.id,
            event_id: value.event_id,
            content: value.content,
            user: value.reactor,
        }
    }
}

/// Response carrying the reaction that now holds for the pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReactResponse {
    pub reaction: ReactionSummary,
}

/// Driving port for the reaction state machine.
///
/// Each `(actor, event)` pair is either without a reaction or holds exactly
/// one label. `react` moves the pair to holding `content`, whatever its
/// previous state; there is no transition back to "no reaction".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReactionCommand: Send + Sync {
    /// Set or replace the actor's reaction.
    ///
    /// Fails with `not_found` when the event is missing and `forbidden` when
    /// the actor owns the event or is not a friend of the owner.
    async fn react(&self, request: ReactRequest) -> Result<ReactResponse, Error>;
}
