//! Health metric recording.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::health_correlator::map_health_metric_error;
use crate::domain::ports::{
    HealthMetricCommand, HealthMetricRepository, RecordMetricRequest, RecordMetricResponse,
};
use crate::domain::{Error, FeedSettings, NewHealthMetric, start_of_day};

/// Health metric service implementing the [`HealthMetricCommand`] driving
/// port.
pub struct HealthMetricService<H> {
    metrics: Arc<H>,
    clock: Arc<dyn Clock>,
    settings: FeedSettings,
}

impl<H> HealthMetricService<H> {
    /// Create a metric service. Dated metrics are stamped at the start of
    /// that day in the configured offset.
    pub fn new(metrics: Arc<H>, clock: Arc<dyn Clock>, settings: FeedSettings) -> Self {
        Self {
            metrics,
            clock,
            settings,
        }
    }
}

#[async_trait]
impl<H> HealthMetricCommand for HealthMetricService<H>
where
    H: HealthMetricRepository,
{
    async fn record_metric(&self, request: RecordMetricRequest) -> Result<RecordMetricResponse, Error> {
        let recorded_at = match request.date {
            Some(date) => start_of_day(date, self.settings.day_offset())?,
            None => self.clock.utc(),
        };
        let metric = NewHealthMetric::new(
            request.user_id,
            request.metric_type,
            request.value,
            recorded_at,
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        let stored = self
            .metrics
            .insert(&metric)
            .await
            .map_err(map_health_metric_error)?;
        info!(
            user = %stored.user_id,
            metric_type = %stored.metric_type,
            "health metric recorded"
        );
        Ok(RecordMetricResponse {
            metric: stored.into(),
        })
    }
}
