//! Driving port for the friend-scoped activity feed.
//!
//! Inbound adapters use this port to read the assembled feed without
//! knowing how scope, events, reactions and health data are combined.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{Error, EventId, HealthSummary, ReactionId, UserId, UserProfile};

/// Request to assemble the feed for an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetFeedRequest {
    pub requester_id: UserId,
}

/// Assembled feed, newest event first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetFeedResponse {
    pub items: Vec<FeedItem>,
}

/// Public profile enriched with the windowed health summary.
///
/// Both health fields serialise as `null` when the person is outside the
/// requester's scope, so clients always see the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedPerson {
    #[schema(value_type = i64, example = 7)]
    pub id: UserId,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub handle: String,
    #[schema(example = 82.5)]
    pub sleep_score: Option<f64>,
    #[schema(example = 2)]
    pub workout_count: Option<u64>,
}

impl FeedPerson {
    /// Combine a profile with an optional health summary.
    pub fn new(profile: &UserProfile, summary: Option<&HealthSummary>) -> Self {
        Self {
            id: profile.id(),
            name: profile.name().to_string(),
            handle: profile.handle().to_string(),
            sleep_score: summary.and_then(|s| s.sleep_score),
            workout_count: summary.map(|s| s.workout_count),
        }
    }
}

/// Reaction attached to a feed item.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedReaction {
    #[schema(value_type = i64, example = 12)]
    pub id: ReactionId,
    #[schema(example = "like")]
    pub content: String,
    pub user: FeedPerson,
}

/// One event enriched with its owner, health correlation and reactions.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    #[schema(value_type = i64, example = 41)]
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    #[schema(example = "workout")]
    pub event_type: String,
    #[schema(value_type = Object)]
    pub metadata: Value,
    pub user: FeedPerson,
    pub reactions: Vec<FeedReaction>,
}

/// Driving port for feed reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedQuery: Send + Sync {
    /// Assemble the feed visible to `request.requester_id`.
    ///
    /// Any storage failure aborts the whole assembly; partial feeds are never
    /// returned.
    async fn get_feed(&self, request: GetFeedRequest) -> Result<GetFeedResponse, Error>;
}
