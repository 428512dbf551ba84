//! Process settings loaded via OrthoConfig and the session key they point at.
//!
//! Values layer CLI flags over `FITFEED_*` environment variables over an
//! optional configuration file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use chrono::{Local, Offset};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroize;

use fitfeed::domain::{DEFAULT_FEED_WINDOW_DAYS, DEFAULT_SERIES_DAYS, FeedSettings};
use fitfeed::outbound::persistence::DEFAULT_POOL_SIZE;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FITFEED")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_size: Option<u32>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`; on unless explicitly disabled.
    pub cookie_secure: Option<bool>,
    /// Trailing feed window in calendar days.
    pub feed_window_days: Option<u32>,
    /// Sleep series length in calendar days.
    pub series_days: Option<u32>,
    /// Day boundary in minutes east of UTC.
    ///
    /// When unset, the host's UTC offset is read once at startup and kept
    /// for the life of the process. Hosts that observe daylight saving time
    /// therefore drift by an hour from local midnight after a transition
    /// until restarted; set this explicitly to pin the boundary.
    pub day_offset_minutes: Option<i32>,
}

/// Errors raised while turning settings into server inputs.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("database url is not configured; set FITFEED_DATABASE_URL")]
    MissingDatabaseUrl,
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid feed settings: {0}")]
    InvalidFeedSettings(String),
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Build mode for session key validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing keys fall back to an ephemeral key with a warning.
    Debug,
    /// Keys must exist and be long enough.
    Release,
}

impl BuildMode {
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn pool_size(&self) -> u32 {
        self.pool_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Feed windows and the day boundary. Without an explicit offset the
    /// host's current UTC offset is captured at call time and not revisited.
    pub fn feed_settings(&self) -> Result<FeedSettings, SettingsError> {
        let window = self.feed_window_days.unwrap_or(DEFAULT_FEED_WINDOW_DAYS);
        let series = self.series_days.unwrap_or(DEFAULT_SERIES_DAYS);
        let result = match self.day_offset_minutes {
            Some(minutes) => FeedSettings::with_offset_minutes(window, series, minutes),
            None => FeedSettings::new(window, series, Local::now().offset().fix()),
        };
        result.map_err(|err| SettingsError::InvalidFeedSettings(err.message().to_owned()))
    }
}

/// Read and derive the session signing key, wiping the raw bytes afterwards.
pub fn load_session_key(path: &Path, mode: BuildMode) -> Result<Key, SettingsError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SettingsError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode == BuildMode::Debug => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SettingsError::KeyRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 8] = [
        "FITFEED_BIND_ADDR",
        "FITFEED_DATABASE_URL",
        "FITFEED_POOL_SIZE",
        "FITFEED_SESSION_KEY_FILE",
        "FITFEED_COOKIE_SECURE",
        "FITFEED_FEED_WINDOW_DAYS",
        "FITFEED_SERIES_DAYS",
        "FITFEED_DAY_OFFSET_MINUTES",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("fitfeed")]).expect("config should load")
    }

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(cleared());

        let settings = load_from_empty_args();
        assert!(settings.cookie_secure());
        assert_eq!(settings.pool_size(), DEFAULT_POOL_SIZE);
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("default addr")
        );
        assert_eq!(
            settings.session_key_file(),
            PathBuf::from(DEFAULT_SESSION_KEY_FILE)
        );
        assert!(matches!(
            settings.database_url(),
            Err(SettingsError::MissingDatabaseUrl)
        ));
        let feed = settings.feed_settings().expect("feed settings");
        assert_eq!(feed.feed_window_days(), DEFAULT_FEED_WINDOW_DAYS);
        assert_eq!(feed.series_days(), DEFAULT_SERIES_DAYS);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = cleared();
        vars.retain(|(name, _)| {
            !matches!(
                *name,
                "FITFEED_DATABASE_URL"
                    | "FITFEED_COOKIE_SECURE"
                    | "FITFEED_SERIES_DAYS"
                    | "FITFEED_DAY_OFFSET_MINUTES"
            )
        });
        vars.extend([
            ("FITFEED_DATABASE_URL", Some("postgres://fit@db/fit".to_owned())),
            ("FITFEED_COOKIE_SECURE", Some("false".to_owned())),
            ("FITFEED_SERIES_DAYS", Some("14".to_owned())),
            ("FITFEED_DAY_OFFSET_MINUTES", Some("-300".to_owned())),
        ]);
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert!(!settings.cookie_secure());
        assert_eq!(
            settings.database_url().expect("database url"),
            "postgres://fit@db/fit"
        );
        let feed = settings.feed_settings().expect("feed settings");
        assert_eq!(feed.series_days(), 14);
        assert_eq!(feed.day_offset().local_minus_utc(), -300 * 60);
    }

    #[rstest]
    #[case("true", true)]
    #[case("false", false)]
    fn cookie_secure_follows_the_environment(#[case] raw: &str, #[case] expected: bool) {
        let mut vars = cleared();
        vars.retain(|(name, _)| *name != "FITFEED_COOKIE_SECURE");
        vars.push(("FITFEED_COOKIE_SECURE", Some(raw.to_owned())));
        let _guard = lock_env(vars);

        assert_eq!(load_from_empty_args().cookie_secure(), expected);
    }

    #[rstest]
    fn cookie_secure_is_on_without_configuration() {
        let _guard = lock_env(cleared());

        let settings = load_from_empty_args();
        assert_eq!(settings.cookie_secure, None);
        assert!(settings.cookie_secure());
    }

    #[rstest]
    fn zero_day_series_are_rejected() {
        let mut vars = cleared();
        vars.retain(|(name, _)| *name != "FITFEED_SERIES_DAYS");
        vars.push(("FITFEED_SERIES_DAYS", Some("0".to_owned())));
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.feed_settings(),
            Err(SettingsError::InvalidFeedSettings(_))
        ));
    }

    #[rstest]
    fn release_builds_require_a_key_file() {
        let path = std::env::temp_dir().join("fitfeed-missing-session-key");
        let result = load_session_key(&path, BuildMode::Release);
        assert!(matches!(result, Err(SettingsError::KeyRead { .. })));
    }

    #[rstest]
    fn debug_builds_fall_back_to_an_ephemeral_key() {
        let path = std::env::temp_dir().join("fitfeed-missing-session-key");
        assert!(load_session_key(&path, BuildMode::Debug).is_ok());
    }

    #[rstest]
    fn short_keys_are_rejected_in_release() {
        let path = std::env::temp_dir().join("fitfeed-short-session-key");
        std::fs::write(&path, b"too short").expect("write key");
        let result = load_session_key(&path, BuildMode::Release);
        std::fs::remove_file(&path).expect("remove key");
        assert!(matches!(
            result,
            Err(SettingsError::KeyTooShort { length: 9, .. })
        ));
    }

    #[rstest]
    fn long_keys_are_accepted_in_release() {
        let path = std::env::temp_dir().join("fitfeed-long-session-key");
        std::fs::write(&path, vec![b'k'; SESSION_KEY_MIN_LEN]).expect("write key");
        let result = load_session_key(&path, BuildMode::Release);
        std::fs::remove_file(&path).expect("remove key");
        assert!(result.is_ok());
    }
}
