//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};

use fitfeed::domain::FeedSettings;
use fitfeed::outbound::persistence::DbPool;

/// Everything `create_server` needs, resolved from [`super::AppSettings`].
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) feed_settings: FeedSettings,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            key,
            cookie_secure: true,
            same_site: SameSite::Lax,
            bind_addr,
            db_pool,
            feed_settings: FeedSettings::default(),
        }
    }

    /// Toggle the `Secure` flag on session cookies.
    #[must_use]
    pub fn with_cookie_secure(mut self, cookie_secure: bool) -> Self {
        self.cookie_secure = cookie_secure;
        self
    }

    /// Window sizes and day boundary handed to the domain services.
    #[must_use]
    pub fn with_feed_settings(mut self, feed_settings: FeedSettings) -> Self {
        self.feed_settings = feed_settings;
        self
    }
}
