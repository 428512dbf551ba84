//! Driving port for recording health metrics.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, HealthMetric, MetricType, UserId};

/// Request to store a metric for `user_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordMetricRequest {
    pub user_id: UserId,
    pub metric_type: MetricType,
    pub value: f64,
    /// Calendar day the value applies to; today when absent.
    pub date: Option<NaiveDate>,
}

/// Stored metric as returned to its owner.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetricPayload {
    #[schema(example = 3)]
    pub id: i64,
    #[schema(value_type = i64, example = 7)]
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub metric_type: MetricType,
    #[schema(example = 70.0)]
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}

impl From<HealthMetric> for HealthMetricPayload {
    fn from(value: HealthMetric) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            metric_type: value.metric_type,
            value: value.value,
            recorded_at: value.recorded_at,
        }
    }
}

/// Response for a recorded metric.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RecordMetricResponse {
    pub metric: HealthMetricPayload,
}

/// Driving port for metric writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthMetricCommand: Send + Sync {
    /// Store a metric for the caller.
    async fn record_metric(&self, request: RecordMetricRequest) -> Result<RecordMetricResponse, Error>;
}
