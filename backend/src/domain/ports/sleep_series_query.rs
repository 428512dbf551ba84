//! Driving port for the seven-day sleep history of a user.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, Handle, MetricType, UserId, UserProfile};

/// Request for `target_handle`'s recent sleep series as seen by `viewer_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SleepWeekRequest {
    pub viewer_id: UserId,
    pub target_handle: Handle,
}

/// One calendar day of the series.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SeriesEntry {
    #[schema(value_type = String, format = Date, example = "2026-03-10")]
    pub date: NaiveDate,
    /// Highest sleep value recorded that day, or zero.
    #[schema(example = 70.0)]
    pub value: f64,
    #[serde(rename = "type")]
    pub metric_type: MetricType,
    pub user: UserProfile,
}

/// Dense series, oldest day first and ending today.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SleepWeekResponse {
    pub scores: Vec<SeriesEntry>,
}

/// Driving port for sleep series reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SleepSeriesQuery: Send + Sync {
    /// Build the dense series for the target.
    ///
    /// Fails with `not_found` when the handle is unknown and `forbidden`
    /// when the viewer is neither the target nor one of their friends.
    async fn build_week(&self, request: SleepWeekRequest) -> Result<SleepWeekResponse, Error>;
}
