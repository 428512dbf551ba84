//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    EventCommand, FeedQuery, HealthMetricCommand, ReactionCommand, SleepSeriesQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub feed: Arc<dyn FeedQuery>,
    pub reactions: Arc<dyn ReactionCommand>,
    pub sleep_series: Arc<dyn SleepSeriesQuery>,
    pub events: Arc<dyn EventCommand>,
    pub health_metrics: Arc<dyn HealthMetricCommand>,
}

impl HttpState {
    /// Construct state from the driving port implementations.
    pub fn new(
        feed: Arc<dyn FeedQuery>,
        reactions: Arc<dyn ReactionCommand>,
        sleep_series: Arc<dyn SleepSeriesQuery>,
        events: Arc<dyn EventCommand>,
        health_metrics: Arc<dyn HealthMetricCommand>,
    ) -> Self {
        Self {
            feed,
            reactions,
            sleep_series,
            events,
            health_metrics,
        }
    }
}
