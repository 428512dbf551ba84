//! Wiring of Diesel adapters into domain services and HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use fitfeed::domain::{
    EventService, FeedService, FeedSettings, HealthMetricService, ReactionService,
    SleepSeriesService,
};
use fitfeed::inbound::http::state::HttpState;
use fitfeed::outbound::persistence::{
    DbPool, DieselEventRepository, DieselFriendshipRepository, DieselHealthMetricRepository,
    DieselReactionRepository, DieselUserRepository,
};

/// Build the HTTP state backed by PostgreSQL repositories.
pub(crate) fn build_http_state(pool: &DbPool, settings: FeedSettings) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let friendships = Arc::new(DieselFriendshipRepository::new(pool.clone()));
    let events = Arc::new(DieselEventRepository::new(pool.clone()));
    let reactions = Arc::new(DieselReactionRepository::new(pool.clone()));
    let metrics = Arc::new(DieselHealthMetricRepository::new(pool.clone()));

    let feed = FeedService::new(
        friendships.clone(),
        events.clone(),
        reactions.clone(),
        metrics.clone(),
        clock.clone(),
        settings,
    );
    let reaction_service = ReactionService::new(friendships.clone(), events.clone(), reactions);
    let sleep_series = SleepSeriesService::new(
        users,
        friendships,
        metrics.clone(),
        clock.clone(),
        settings,
    );
    let event_service = EventService::new(events, clock.clone());
    let metric_service = HealthMetricService::new(metrics, clock, settings);

    web::Data::new(HttpState::new(
        Arc::new(feed),
        Arc::new(reaction_service),
        Arc::new(sleep_series),
        Arc::new(event_service),
        Arc::new(metric_service),
    ))
}
