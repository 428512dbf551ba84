//! Port for event reactions.

use async_trait::async_trait;

use crate::domain::{EventId, Reaction, ReactionLabel, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by reaction repository adapters.
    pub enum ReactionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "reaction repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "reaction repository query failed: {message}",
    }
}

/// Port for reading and replacing reactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Every reaction joined with its reacting user's profile.
    ///
    /// The read is deliberately not scoped to a viewer: reactions from users
    /// outside the viewer's friend set must still attach to visible events.
    async fn list_with_reactors(&self) -> Result<Vec<Reaction>, ReactionRepositoryError>;

    /// Atomically replace the reaction `user_id` holds on `event_id`.
    ///
    /// Any previous row for the pair disappears and a row with a fresh
    /// identifier takes its place, in a single atomic operation so two
    /// concurrent calls can never leave two rows behind.
    async fn replace_for_user(
        &self,
        event_id: EventId,
        user_id: UserId,
        content: &ReactionLabel,
    ) -> Result<Reaction, ReactionRepositoryError>;
}
