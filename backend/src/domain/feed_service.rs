//! Feed assembly service.
//!
//! Resolves the requester's scope, loads the windowed events of everyone in
//! it, attaches every reaction and decorates owners and reactors with their
//! health correlation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::try_join;
use mockable::Clock;
use tracing::{debug, error};

use crate::domain::friend_scope::FriendScopeResolver;
use crate::domain::health_correlator::{Correlation, HealthCorrelator, map_event_error};
use crate::domain::ports::{
    EventRepository, FeedItem, FeedPerson, FeedQuery, FeedReaction, FriendshipRepository,
    GetFeedRequest, GetFeedResponse, HealthMetricRepository, ReactionRepository,
    ReactionRepositoryError,
};
use crate::domain::{Error, EventId, EventWithOwner, FeedSettings, Reaction, TimeWindow};

pub(crate) fn map_reaction_error(error: ReactionRepositoryError) -> Error {
    match error {
        ReactionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("reaction repository unavailable: {message}"))
        }
        ReactionRepositoryError::Query { message } => {
            Error::internal(format!("reaction repository error: {message}"))
        }
    }
}

/// Feed service implementing the [`FeedQuery`] driving port.
pub struct FeedService<F, E, R, H> {
    scope: FriendScopeResolver<F>,
    correlator: HealthCorrelator<E, H>,
    events: Arc<E>,
    reactions: Arc<R>,
    clock: Arc<dyn Clock>,
    settings: FeedSettings,
}

impl<F, E, R, H> FeedService<F, E, R, H> {
    /// Create a feed service.
    ///
    /// The window is recomputed from `clock` on every request.
    pub fn new(
        friendships: Arc<F>,
        events: Arc<E>,
        reactions: Arc<R>,
        metrics: Arc<H>,
        clock: Arc<dyn Clock>,
        settings: FeedSettings,
    ) -> Self {
        Self {
            scope: FriendScopeResolver::new(friendships),
            correlator: HealthCorrelator::new(Arc::clone(&events), metrics),
            events,
            reactions,
            clock,
            settings,
        }
    }
}

#[async_trait]
impl<F, E, R, H> FeedQuery for FeedService<F, E, R, H>
where
    F: FriendshipRepository,
    E: EventRepository,
    R: ReactionRepository,
    H: HealthMetricRepository,
{
    async fn get_feed(&self, request: GetFeedRequest) -> Result<GetFeedResponse, Error> {
        let scope = self.scope.resolve_scope(request.requester_id).await?;
        let window = TimeWindow::trailing_days(
            self.clock.utc(),
            self.settings.feed_window_days(),
            self.settings.day_offset(),
        )?;
        let members = scope.members();

        let events = async {
            self.events
                .list_for_owners(&members, window)
                .await
                .map_err(map_event_error)
        };
        let reactions = async {
            self.reactions
                .list_with_reactors()
                .await
                .map_err(map_reaction_error)
        };
        let correlation = self.correlator.correlate(&members, window);
        let (events, reactions, correlation) = try_join!(events, reactions, correlation)?;

        debug!(
            requester = %request.requester_id,
            scope = scope.member_count(),
            events = events.len(),
            "assembling feed"
        );

        let mut by_event = group_by_event(reactions);
        let items = events
            .into_iter()
            .map(|entry| {
                let reactions = by_event.remove(&entry.event.id).unwrap_or_default();
                build_item(entry, reactions, &correlation)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GetFeedResponse { items })
    }
}

fn group_by_event(reactions: Vec<Reaction>) -> HashMap<EventId, Vec<Reaction>> {
    let mut grouped: HashMap<EventId, Vec<Reaction>> = HashMap::new();
    for reaction in reactions {
        grouped.entry(reaction.event_id).or_default().push(reaction);
    }
    grouped
}

fn build_item(
    entry: EventWithOwner,
    reactions: Vec<Reaction>,
    correlation: &Correlation,
) -> Result<FeedItem, Error> {
    let EventWithOwner { event, owner } = entry;
    let metadata = event.metadata.parse().map_err(|err| {
        error!(event_id = %event.id, error = %err, "stored event metadata is not valid JSON");
        Error::internal(format!("event {} has corrupt metadata", event.id))
    })?;

    let reactions = reactions
        .into_iter()
        .map(|reaction| FeedReaction {
            id: reaction.id,
            content: reaction.content.as_ref().to_owned(),
            user: FeedPerson::new(&reaction.reactor, correlation.get(&reaction.reactor.id())),
        })
        .collect();

    Ok(FeedItem {
        id: event.id,
        timestamp: event.occurred_at,
        event_type: event.event_type.to_string(),
        metadata,
        user: FeedPerson::new(&owner, correlation.get(&owner.id())),
        reactions,
    })
}

#[cfg(test)]
#[path = "feed_service_tests.rs"]
mod tests;
