//! Activity feed HTTP handler.
//!
//! ```text
//! GET /api/v1/feed
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{FeedItem, GetFeedRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Feed response envelope.
///
/// `error` is always `null` on success; failures use the shared error body
/// with the mapped status instead.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FeedEnvelope {
    pub data: Vec<FeedItem>,
    pub error: Option<Error>,
}

/// Feed of the caller and their friends over the trailing window.
#[utoipa::path(
    get,
    path = "/api/v1/feed",
    responses(
        (status = 200, description = "Assembled feed, newest first", body = FeedEnvelope),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["feed"],
    operation_id = "getFeed",
    security(("SessionCookie" = []))
)]
#[get("/feed")]
pub async fn get_feed(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<FeedEnvelope>> {
    let requester_id = session.require_user_id()?;
    let response = state.feed.get_feed(GetFeedRequest { requester_id }).await?;
    Ok(web::Json(FeedEnvelope {
        data: response.items,
        error: None,
    }))
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
