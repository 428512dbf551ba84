//! Health metrics uploaded by users and the per-user summary derived from them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Closed set of metric kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    /// Nightly sleep score.
    Sleep,
    /// Fitness score.
    Fitness,
    /// Stress score.
    Stress,
}

impl MetricType {
    /// Storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::Fitness => "fitness",
            Self::Stress => "stress",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown metric type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric type: {0}")]
pub struct UnknownMetricType(pub String);

impl FromStr for MetricType {
    type Err = UnknownMetricType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sleep" => Ok(Self::Sleep),
            "fitness" => Ok(Self::Fitness),
            "stress" => Ok(Self::Stress),
            other => Err(UnknownMetricType(other.to_owned())),
        }
    }
}

/// Validation errors for metric values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HealthMetricValidationError {
    /// Value is NaN or infinite.
    #[error("metric value must be a finite number")]
    NotFinite,
    /// Value is below zero.
    #[error("metric value must not be negative")]
    Negative,
}

/// Values for a new metric row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHealthMetric {
    user_id: UserId,
    metric_type: MetricType,
    value: f64,
    recorded_at: DateTime<Utc>,
}

impl NewHealthMetric {
    /// Validate the value and construct a new metric.
    pub fn new(
        user_id: UserId,
        metric_type: MetricType,
        value: f64,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, HealthMetricValidationError> {
        if !value.is_finite() {
            return Err(HealthMetricValidationError::NotFinite);
        }
        if value < 0.0 {
            return Err(HealthMetricValidationError::Negative);
        }
        Ok(Self {
            user_id,
            metric_type,
            value,
            recorded_at,
        })
    }

    /// Owning user.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Metric kind.
    pub fn metric_type(&self) -> MetricType {
        self.metric_type
    }

    /// Numeric value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Timestamp the metric applies to.
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Persisted metric row.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthMetric {
    /// Storage identifier.
    pub id: i64,
    /// Owning user.
    pub user_id: UserId,
    /// Metric kind.
    pub metric_type: MetricType,
    /// Numeric value.
    pub value: f64,
    /// Timestamp the metric applies to.
    pub recorded_at: DateTime<Utc>,
}

/// Single `(timestamp, value)` observation used for day grouping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSample {
    /// Timestamp the metric applies to.
    pub recorded_at: DateTime<Utc>,
    /// Numeric value.
    pub value: f64,
}

/// Windowed health summary for one user.
///
/// ## Invariants
/// - `sleep_score` is the maximum sleep value in the window, or `None` when
///   no sleep metric was recorded.
/// - `workout_count` counts distinct workout events and defaults to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HealthSummary {
    /// Representative sleep score for the window.
    pub sleep_score: Option<f64>,
    /// Number of workout events in the window.
    pub workout_count: u64,
}
