//! Port for reading public user profiles.

use async_trait::async_trait;

use crate::domain::{Handle, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query failed during execution or returned invalid data.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Port for public profile lookups.
///
/// Implementations select identity columns only; credential material never
/// crosses this boundary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique handle.
    async fn find_by_handle(&self, handle: &Handle) -> Result<Option<UserProfile>, UserRepositoryError>;
}
