//! PostgreSQL-backed `HealthMetricRepository` implementation using Diesel
//! ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::max;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{HealthMetricRepository, HealthMetricRepositoryError};
use crate::domain::{
    HealthMetric, MetricSample, MetricType, NewHealthMetric, TimeWindow, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{HealthMetricRow, NewHealthMetricRow};
use super::pool::{DbPool, PoolError};
use super::schema::health_metrics;

/// Diesel-backed implementation of the health metric repository port.
#[derive(Clone)]
pub struct DieselHealthMetricRepository {
    pool: DbPool,
}

impl DieselHealthMetricRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> HealthMetricRepositoryError {
    map_basic_pool_error(error, HealthMetricRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> HealthMetricRepositoryError {
    map_basic_diesel_error(
        error,
        HealthMetricRepositoryError::query,
        HealthMetricRepositoryError::connection,
    )
}

fn row_to_metric(row: HealthMetricRow) -> Result<HealthMetric, HealthMetricRepositoryError> {
    let metric_type: MetricType = row
        .metric_type
        .parse()
        .map_err(|err: crate::domain::UnknownMetricType| {
            HealthMetricRepositoryError::query(err.to_string())
        })?;
    Ok(HealthMetric {
        id: row.id,
        user_id: UserId::from_db(row.user_id),
        metric_type,
        value: row.value,
        recorded_at: row.recorded_at,
    })
}

#[async_trait]
impl HealthMetricRepository for DieselHealthMetricRepository {
    async fn max_value_by_user(
        &self,
        users: &[UserId],
        metric_type: MetricType,
        window: TimeWindow,
    ) -> Result<Vec<(UserId, f64)>, HealthMetricRepositoryError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<i64> = users.iter().map(|user| user.as_i64()).collect();

        let rows: Vec<(i64, Option<f64>)> = health_metrics::table
            .filter(health_metrics::user_id.eq_any(ids))
            .filter(health_metrics::metric_type.eq(metric_type.as_str()))
            .filter(health_metrics::recorded_at.between(window.start(), window.end()))
            .group_by(health_metrics::user_id)
            .select((health_metrics::user_id, max(health_metrics::value)))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .filter_map(|(user, value)| value.map(|value| (UserId::from_db(user), value)))
            .collect())
    }

    async fn samples_for_user(
        &self,
        user: UserId,
        metric_type: MetricType,
        window: TimeWindow,
    ) -> Result<Vec<MetricSample>, HealthMetricRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(DateTime<Utc>, f64)> = health_metrics::table
            .filter(health_metrics::user_id.eq(user.as_i64()))
            .filter(health_metrics::metric_type.eq(metric_type.as_str()))
            .filter(health_metrics::recorded_at.between(window.start(), window.end()))
            .order(health_metrics::recorded_at.asc())
            .select((health_metrics::recorded_at, health_metrics::value))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(recorded_at, value)| MetricSample { recorded_at, value })
            .collect())
    }

    async fn insert(&self, metric: &NewHealthMetric) -> Result<HealthMetric, HealthMetricRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewHealthMetricRow {
            user_id: metric.user_id().as_i64(),
            metric_type: metric.metric_type().as_str(),
            value: metric.value(),
            recorded_at: metric.recorded_at(),
        };
        let stored: HealthMetricRow = diesel::insert_into(health_metrics::table)
            .values(&row)
            .returning(HealthMetricRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_metric(stored)
    }
}
