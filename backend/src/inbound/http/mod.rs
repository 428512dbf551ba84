//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod events;
pub mod feed;
pub mod health;
pub mod health_metrics;
pub mod reactions;
pub mod session;
pub mod sleep_series;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
