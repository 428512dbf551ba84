//! Fitfeed backend library.
//!
//! The crate follows a hexagonal layout: [`domain`] holds entities, services
//! and ports; [`outbound`] implements the driven ports over PostgreSQL;
//! [`inbound`] exposes the driving ports over HTTP.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
