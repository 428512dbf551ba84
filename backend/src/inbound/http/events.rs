//! Activity event HTTP handlers.
//!
//! ```text
//! POST   /api/v1/events
//! DELETE /api/v1/events/{event_id}
//! ```

use actix_web::{HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{DeleteEventRequest, RecordEventRequest, RecordEventResponse};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_event_id, parse_event_type, parse_optional_rfc3339_timestamp,
};

/// Request payload for recording an activity event.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RecordEventRequestBody {
    #[serde(rename = "type")]
    #[schema(example = "workout")]
    pub event_type: String,
    /// RFC 3339 timestamp; defaults to the time of the request.
    #[serde(default)]
    #[schema(example = "2026-03-10T07:30:00Z")]
    pub timestamp: Option<String>,
    /// Arbitrary JSON payload stored with the event.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Option<Value>,
}

/// Record an activity event owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = RecordEventRequestBody,
    responses(
        (status = 201, description = "Event recorded", body = RecordEventResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["events"],
    operation_id = "recordEvent",
    security(("SessionCookie" = []))
)]
#[post("/events")]
pub async fn record_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecordEventRequestBody>,
) -> ApiResult<HttpResponse> {
    let owner_id = session.require_user_id()?;
    let body = payload.into_inner();
    let event_type = parse_event_type(body.event_type, FieldName::new("type"))?;
    let occurred_at = parse_optional_rfc3339_timestamp(body.timestamp, FieldName::new("timestamp"))?;

    let response = state
        .events
        .record_event(RecordEventRequest {
            owner_id,
            event_type,
            occurred_at,
            metadata: body.metadata.unwrap_or_else(|| Value::Object(Default::default())),
        })
        .await?;
    Ok(HttpResponse::Created().json(response))
}

/// Delete one of the caller's events together with its reactions.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{event_id}",
    params(("event_id" = i64, Path, description = "Event identifier")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 400, description = "Invalid event id", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Caller does not own the event", body = Error),
        (status = 404, description = "Event not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["events"],
    operation_id = "deleteEvent",
    security(("SessionCookie" = []))
)]
#[delete("/events/{event_id}")]
pub async fn delete_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor_id = session.require_user_id()?;
    let event_id = parse_event_id(&path.into_inner(), FieldName::new("eventId"))?;

    state
        .events
        .delete_event(DeleteEventRequest { actor_id, event_id })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
