//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters;
//! driving ports (`*Query`, `*Command`) are implemented by domain services
//! and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod event_command;
mod event_repository;
mod feed_query;
mod friendship_repository;
mod health_metric_command;
mod health_metric_repository;
mod reaction_command;
mod reaction_repository;
mod sleep_series_query;
mod user_repository;

#[cfg(test)]
pub use event_command::MockEventCommand;
pub use event_command::{
    DeleteEventRequest, EventCommand, EventPayload, RecordEventRequest, RecordEventResponse,
};
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{EventRepository, EventRepositoryError};
#[cfg(test)]
pub use feed_query::MockFeedQuery;
pub use feed_query::{FeedItem, FeedPerson, FeedQuery, FeedReaction, GetFeedRequest, GetFeedResponse};
#[cfg(test)]
pub use friendship_repository::MockFriendshipRepository;
pub use friendship_repository::{FriendshipRepository, FriendshipRepositoryError};
#[cfg(test)]
pub use health_metric_command::MockHealthMetricCommand;
pub use health_metric_command::{
    HealthMetricCommand, HealthMetricPayload, RecordMetricRequest, RecordMetricResponse,
};
#[cfg(test)]
pub use health_metric_repository::MockHealthMetricRepository;
pub use health_metric_repository::{HealthMetricRepository, HealthMetricRepositoryError};
#[cfg(test)]
pub use reaction_command::MockReactionCommand;
pub use reaction_command::{ReactRequest, ReactResponse, ReactionCommand, ReactionSummary};
#[cfg(test)]
pub use reaction_repository::MockReactionRepository;
pub use reaction_repository::{ReactionRepository, ReactionRepositoryError};
#[cfg(test)]
pub use sleep_series_query::MockSleepSeriesQuery;
pub use sleep_series_query::{SeriesEntry, SleepSeriesQuery, SleepWeekRequest, SleepWeekResponse};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
