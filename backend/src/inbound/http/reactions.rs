//! Reaction HTTP handler.
//!
//! ```text
//! POST /api/v1/events/{event_id}/reactions
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{ReactRequest, ReactResponse};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_event_id, parse_reaction_label};

/// Request payload for reacting to an event.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ReactionRequestBody {
    #[schema(example = "like")]
    pub content: String,
}

/// Set or replace the caller's reaction on a friend's event.
///
/// Reacting again with any label replaces the previous reaction; the
/// returned reaction carries a new identifier each time.
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/reactions",
    params(("event_id" = i64, Path, description = "Event identifier")),
    request_body = ReactionRequestBody,
    responses(
        (status = 200, description = "Reaction stored", body = ReactResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Own event or not a friend of the owner", body = Error),
        (status = 404, description = "Event not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["reactions"],
    operation_id = "reactToEvent",
    security(("SessionCookie" = []))
)]
#[post("/events/{event_id}/reactions")]
pub async fn react_to_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReactionRequestBody>,
) -> ApiResult<web::Json<ReactResponse>> {
    let actor_id = session.require_user_id()?;
    let event_id = parse_event_id(&path.into_inner(), FieldName::new("eventId"))?;
    let content = parse_reaction_label(payload.into_inner().content, FieldName::new("content"))?;

    let response = state
        .reactions
        .react(ReactRequest {
            actor_id,
            event_id,
            content,
        })
        .await?;
    Ok(web::Json(response))
}

#[cfg(test)]
#[path = "reactions_tests.rs"]
mod tests;
