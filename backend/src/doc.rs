//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together
//! with the request and response schemas they reference, plus the session
//! cookie security scheme. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{
    EventPayload, FeedItem, FeedPerson, FeedReaction, HealthMetricPayload, ReactResponse,
    ReactionSummary, RecordEventResponse, RecordMetricResponse, SeriesEntry, SleepWeekResponse,
};
use crate::domain::{Error, ErrorCode, MetricType, UserProfile};
use crate::inbound::http::events::RecordEventRequestBody;
use crate::inbound::http::feed::FeedEnvelope;
use crate::inbound::http::health_metrics::RecordMetricRequestBody;
use crate::inbound::http::reactions::ReactionRequestBody;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Signed session cookie issued by the authentication service.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Fitfeed backend API",
        description = "Friend-scoped activity feed, reactions and health history."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::feed::get_feed,
        crate::inbound::http::reactions::react_to_event,
        crate::inbound::http::sleep_series::get_sleep_week,
        crate::inbound::http::events::record_event,
        crate::inbound::http::events::delete_event,
        crate::inbound::http::health_metrics::record_metric,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserProfile,
        MetricType,
        FeedEnvelope,
        FeedItem,
        FeedPerson,
        FeedReaction,
        ReactionRequestBody,
        ReactResponse,
        ReactionSummary,
        SleepWeekResponse,
        SeriesEntry,
        RecordEventRequestBody,
        RecordEventResponse,
        EventPayload,
        RecordMetricRequestBody,
        RecordMetricResponse,
        HealthMetricPayload,
    )),
    tags(
        (name = "feed", description = "Friend-scoped activity feed"),
        (name = "reactions", description = "Reactions on friends' events"),
        (name = "events", description = "Recording and deleting activity events"),
        (name = "health", description = "Health metrics and sleep history"),
        (name = "probes", description = "Liveness and readiness checks")
    )
)]
pub struct ApiDoc;
