//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities for the social fitness feed and
//! the services that combine friendships, events, reactions and health
//! metrics. Services depend only on the traits in [`ports`]; adapters live
//! in `inbound` and `outbound`.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - UserId / Handle / UserProfile: identity values.
//! - Event / Reaction / HealthMetric: persisted records.
//! - FeedService / ReactionService / SleepSeriesService: driving port
//!   implementations.

pub mod error;
mod event;
mod event_service;
mod feed_service;
mod feed_settings;
mod friend_scope;
mod health_correlator;
mod health_metric;
mod health_metric_service;
pub mod ports;
mod reaction;
mod reaction_service;
mod sleep_series_service;
mod time_window;
pub mod trace_id;
pub mod user;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::event::{
    EVENT_TYPE_MAX, Event, EventId, EventMetadata, EventType, EventValidationError,
    EventWithOwner, NewEvent, WORKOUT_EVENT_TYPE,
};
pub use self::event_service::{EventService, NOT_EVENT_OWNER};
pub use self::feed_service::FeedService;
pub use self::feed_settings::{DEFAULT_FEED_WINDOW_DAYS, DEFAULT_SERIES_DAYS, FeedSettings};
pub use self::friend_scope::{FRIENDS_ONLY, FriendScopeResolver, Scope};
pub use self::health_correlator::{Correlation, HealthCorrelator};
pub use self::health_metric::{
    HealthMetric, HealthMetricValidationError, HealthSummary, MetricSample, MetricType,
    NewHealthMetric, UnknownMetricType,
};
pub use self::health_metric_service::HealthMetricService;
pub use self::reaction::{
    REACTION_LABEL_MAX, Reaction, ReactionId, ReactionLabel, ReactionValidationError,
};
pub use self::reaction_service::{EVENT_NOT_FOUND, ReactionService, SELF_REACTION_FORBIDDEN};
pub use self::sleep_series_service::{SleepSeriesService, USER_NOT_FOUND};
pub use self::time_window::{DayRange, TimeWindow, local_date, start_of_day};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, Handle, UserId, UserProfile, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use fitfeed::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
