//! Dense sleep series reconstruction.
//!
//! Sleep metrics are sparse: a user may log several values on one day and
//! none on others. The series has one entry per calendar day, carrying the
//! highest value logged that day or zero.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use tracing::debug;

use crate::domain::friend_scope::{FRIENDS_ONLY, FriendScopeResolver};
use crate::domain::health_correlator::map_health_metric_error;
use crate::domain::ports::{
    FriendshipRepository, HealthMetricRepository, SeriesEntry, SleepSeriesQuery, SleepWeekRequest,
    SleepWeekResponse, UserRepository, UserRepositoryError,
};
use crate::domain::{DayRange, Error, FeedSettings, MetricSample, MetricType, local_date};

/// Message returned when the target handle is unknown.
pub const USER_NOT_FOUND: &str = "user not found";

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Sleep series service implementing the [`SleepSeriesQuery`] driving port.
pub struct SleepSeriesService<U, F, H> {
    users: Arc<U>,
    scope: FriendScopeResolver<F>,
    metrics: Arc<H>,
    clock: Arc<dyn Clock>,
    settings: FeedSettings,
}

impl<U, F, H> SleepSeriesService<U, F, H> {
    /// Create a sleep series service.
    pub fn new(
        users: Arc<U>,
        friendships: Arc<F>,
        metrics: Arc<H>,
        clock: Arc<dyn Clock>,
        settings: FeedSettings,
    ) -> Self {
        Self {
            users,
            scope: FriendScopeResolver::new(friendships),
            metrics,
            clock,
            settings,
        }
    }
}

#[async_trait]
impl<U, F, H> SleepSeriesQuery for SleepSeriesService<U, F, H>
where
    U: UserRepository,
    F: FriendshipRepository,
    H: HealthMetricRepository,
{
    async fn build_week(&self, request: SleepWeekRequest) -> Result<SleepWeekResponse, Error> {
        let target = self
            .users
            .find_by_handle(&request.target_handle)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;

        if target.id() != request.viewer_id
            && !self.scope.are_friends(request.viewer_id, target.id()).await?
        {
            return Err(Error::forbidden(FRIENDS_ONLY));
        }

        let offset = self.settings.day_offset();
        let days = DayRange::trailing(self.clock.utc(), self.settings.series_days(), offset)?;
        let samples = self
            .metrics
            .samples_for_user(target.id(), MetricType::Sleep, days.window(offset)?)
            .await
            .map_err(map_health_metric_error)?;
        debug!(target = %target.id(), samples = samples.len(), "reconstructing sleep series");

        let daily = daily_maximum(&samples, offset);
        let scores = days
            .dates()
            .map(|date| SeriesEntry {
                date,
                value: daily.get(&date).copied().unwrap_or(0.0),
                metric_type: MetricType::Sleep,
                user: target.clone(),
            })
            .collect();

        Ok(SleepWeekResponse { scores })
    }
}

fn daily_maximum(samples: &[MetricSample], offset: chrono::FixedOffset) -> BTreeMap<NaiveDate, f64> {
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for sample in samples {
        let day = local_date(sample.recorded_at, offset);
        daily
            .entry(day)
            .and_modify(|best| *best = best.max(sample.value))
            .or_insert(sample.value);
    }
    daily
}

#[cfg(test)]
#[path = "sleep_series_service_tests.rs"]
mod tests;
