//! Port for health metric persistence and windowed aggregates.

use async_trait::async_trait;

use crate::domain::{HealthMetric, MetricSample, MetricType, NewHealthMetric, TimeWindow, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by health metric repository adapters.
    pub enum HealthMetricRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "health metric repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "health metric repository query failed: {message}",
    }
}

/// Port for reading and writing health metrics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthMetricRepository: Send + Sync {
    /// Maximum value of `metric_type` per user inside `window`, computed as a
    /// single grouped aggregate. Users without rows are omitted.
    async fn max_value_by_user(
        &self,
        users: &[UserId],
        metric_type: MetricType,
        window: TimeWindow,
    ) -> Result<Vec<(UserId, f64)>, HealthMetricRepositoryError>;

    /// Raw samples of `metric_type` for one user inside `window`, oldest
    /// first.
    async fn samples_for_user(
        &self,
        user: UserId,
        metric_type: MetricType,
        window: TimeWindow,
    ) -> Result<Vec<MetricSample>, HealthMetricRepositoryError>;

    /// Insert a metric and return the stored row.
    async fn insert(&self, metric: &NewHealthMetric) -> Result<HealthMetric, HealthMetricRepositoryError>;
}
