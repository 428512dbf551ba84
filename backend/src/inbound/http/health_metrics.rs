//! Health metric HTTP handler.
//!
//! ```text
//! POST /api/v1/health-metrics
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{RecordMetricRequest, RecordMetricResponse};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_metric_type, parse_optional_date};

/// Request payload for recording a health metric.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RecordMetricRequestBody {
    #[serde(rename = "type")]
    #[schema(example = "sleep")]
    pub metric_type: String,
    #[schema(example = 70.0)]
    pub value: f64,
    /// Calendar date (`YYYY-MM-DD`) the value applies to; defaults to now.
    #[serde(default)]
    #[schema(example = "2026-03-10")]
    pub date: Option<String>,
}

/// Record a health metric for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/health-metrics",
    request_body = RecordMetricRequestBody,
    responses(
        (status = 201, description = "Metric recorded", body = RecordMetricResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["health"],
    operation_id = "recordHealthMetric",
    security(("SessionCookie" = []))
)]
#[post("/health-metrics")]
pub async fn record_metric(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecordMetricRequestBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let body = payload.into_inner();
    let metric_type = parse_metric_type(&body.metric_type, FieldName::new("type"))?;
    let date = parse_optional_date(body.date, FieldName::new("date"))?;

    let response = state
        .health_metrics
        .record_metric(RecordMetricRequest {
            user_id,
            metric_type,
            value: body.value,
            date,
        })
        .await?;
    Ok(HttpResponse::Created().json(response))
}
