//! Windowed health correlation for a set of users.
//!
//! Two grouped aggregates are issued per call, one over health metrics and
//! one over events, regardless of how many users are requested.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::try_join;
use tracing::debug;

use crate::domain::ports::{
    EventRepository, EventRepositoryError, HealthMetricRepository, HealthMetricRepositoryError,
};
use crate::domain::{Error, EventType, HealthSummary, MetricType, TimeWindow, UserId};

pub(crate) fn map_event_error(error: EventRepositoryError) -> Error {
    match error {
        EventRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("event repository unavailable: {message}"))
        }
        EventRepositoryError::Query { message } => {
            Error::internal(format!("event repository error: {message}"))
        }
    }
}

pub(crate) fn map_health_metric_error(error: HealthMetricRepositoryError) -> Error {
    match error {
        HealthMetricRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("health metric repository unavailable: {message}"))
        }
        HealthMetricRepositoryError::Query { message } => {
            Error::internal(format!("health metric repository error: {message}"))
        }
    }
}

/// Summaries keyed by user.
pub type Correlation = HashMap<UserId, HealthSummary>;

/// Combines sleep metrics and workout events into per-user summaries.
#[derive(Clone)]
pub struct HealthCorrelator<E, H> {
    events: Arc<E>,
    metrics: Arc<H>,
}

impl<E, H> HealthCorrelator<E, H> {
    /// Create a correlator over the event and metric repositories.
    pub fn new(events: Arc<E>, metrics: Arc<H>) -> Self {
        Self { events, metrics }
    }
}

impl<E, H> HealthCorrelator<E, H>
where
    E: EventRepository,
    H: HealthMetricRepository,
{
    /// Summaries for every user in `users` over `window`.
    ///
    /// Each requested user receives exactly one entry. `sleep_score` is the
    /// highest sleep value inside the window or `None`; `workout_count` is
    /// the number of workout events and defaults to zero.
    pub async fn correlate(&self, users: &[UserId], window: TimeWindow) -> Result<Correlation, Error> {
        let mut correlation: Correlation = users
            .iter()
            .map(|user| (*user, HealthSummary::default()))
            .collect();
        if users.is_empty() {
            return Ok(correlation);
        }

        let workout = EventType::workout();
        let sleep = async {
            self.metrics
                .max_value_by_user(users, MetricType::Sleep, window)
                .await
                .map_err(map_health_metric_error)
        };
        let workouts = async {
            self.events
                .count_by_owner(users, &workout, window)
                .await
                .map_err(map_event_error)
        };
        let (sleep_rows, workout_rows) = try_join!(sleep, workouts)
            .inspect_err(|err| debug!(users = users.len(), error = %err, "correlation failed"))?;

        // Rows for users outside the request are ignored so the result keeps
        // exactly one entry per requested user.
        for (user, score) in sleep_rows {
            if let Some(summary) = correlation.get_mut(&user) {
                summary.sleep_score = Some(score);
            }
        }
        for (user, count) in workout_rows {
            if let Some(summary) = correlation.get_mut(&user) {
                summary.workout_count = count;
            }
        }
        Ok(correlation)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockEventRepository, MockHealthMetricRepository};

    fn user(id: i64) -> UserId {
        UserId::new(id).expect("valid user id")
    }

    #[fixture]
    fn window() -> TimeWindow {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 8, 0, 0, 0)
            .single()
            .expect("start");
        let end = Utc
            .with_ymd_and_hms(2026, 3, 10, 23, 59, 59)
            .single()
            .expect("end");
        TimeWindow::new(start, end).expect("window")
    }

    #[rstest]
    #[tokio::test]
    async fn every_user_gets_one_entry(window: TimeWindow) {
        let mut metrics = MockHealthMetricRepository::new();
        metrics
            .expect_max_value_by_user()
            .withf(|_, metric_type, _| *metric_type == MetricType::Sleep)
            .times(1)
            .return_once(|_, _, _| Ok(vec![(user(1), 82.0)]));
        let mut events = MockEventRepository::new();
        events
            .expect_count_by_owner()
            .withf(|_, event_type, _| event_type.as_ref() == "workout")
            .times(1)
            .return_once(|_, _, _| Ok(vec![(user(2), 3)]));

        let correlator = HealthCorrelator::new(Arc::new(events), Arc::new(metrics));
        let result = correlator
            .correlate(&[user(1), user(2), user(3)], window)
            .await
            .expect("correlation succeeds");

        assert_eq!(result.len(), 3);
        assert_eq!(
            result.get(&user(1)),
            Some(&HealthSummary {
                sleep_score: Some(82.0),
                workout_count: 0
            })
        );
        assert_eq!(
            result.get(&user(2)),
            Some(&HealthSummary {
                sleep_score: None,
                workout_count: 3
            })
        );
        assert_eq!(result.get(&user(3)), Some(&HealthSummary::default()));
    }

    #[rstest]
    #[tokio::test]
    async fn window_is_passed_through_unchanged(window: TimeWindow) {
        let mut metrics = MockHealthMetricRepository::new();
        metrics
            .expect_max_value_by_user()
            .withf(move |users, metric_type, w| {
                users == [user(1)] && *metric_type == MetricType::Sleep && *w == window
            })
            .return_once(|_, _, _| Ok(Vec::new()));
        let mut events = MockEventRepository::new();
        events
            .expect_count_by_owner()
            .withf(move |users, _, w| users == [user(1)] && *w == window)
            .return_once(|_, _, _| Ok(Vec::new()));

        let correlator = HealthCorrelator::new(Arc::new(events), Arc::new(metrics));
        let result = correlator
            .correlate(&[user(1)], window)
            .await
            .expect("correlation succeeds");

        assert_eq!(result.get(&user(1)), Some(&HealthSummary::default()));
    }

    #[rstest]
    #[tokio::test]
    async fn empty_user_set_skips_storage(window: TimeWindow) {
        let mut metrics = MockHealthMetricRepository::new();
        metrics.expect_max_value_by_user().times(0);
        let mut events = MockEventRepository::new();
        events.expect_count_by_owner().times(0);

        let correlator = HealthCorrelator::new(Arc::new(events), Arc::new(metrics));
        let result = correlator.correlate(&[], window).await.expect("empty");

        assert!(result.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn unrequested_rows_are_ignored(window: TimeWindow) {
        let mut metrics = MockHealthMetricRepository::new();
        metrics
            .expect_max_value_by_user()
            .return_once(|_, _, _| Ok(vec![(user(99), 10.0)]));
        let mut events = MockEventRepository::new();
        events
            .expect_count_by_owner()
            .return_once(|_, _, _| Ok(vec![(user(98), 1)]));

        let correlator = HealthCorrelator::new(Arc::new(events), Arc::new(metrics));
        let result = correlator
            .correlate(&[user(1)], window)
            .await
            .expect("correlation succeeds");

        assert_eq!(result.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn metric_failure_aborts_correlation(window: TimeWindow) {
        let mut metrics = MockHealthMetricRepository::new();
        metrics
            .expect_max_value_by_user()
            .return_once(|_, _, _| Err(HealthMetricRepositoryError::connection("pool closed")));
        let mut events = MockEventRepository::new();
        events
            .expect_count_by_owner()
            .returning(|_, _, _| Ok(Vec::new()));

        let correlator = HealthCorrelator::new(Arc::new(events), Arc::new(metrics));
        let error = correlator
            .correlate(&[user(1)], window)
            .await
            .expect_err("failure propagates");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
