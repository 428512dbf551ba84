//! Test helpers for inbound HTTP components.
//!
//! Production never issues session cookies; the authentication service does.
//! These helpers stand in for it so handler and integration tests can act
//! as a given user.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, get, test, web};

use crate::domain::ports::{
    MockEventCommand, MockFeedQuery, MockHealthMetricCommand, MockReactionCommand,
    MockSleepSeriesQuery,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::error::json_config;
use crate::inbound::http::events::{delete_event, record_event};
use crate::inbound::http::feed::get_feed;
use crate::inbound::http::health_metrics::record_metric;
use crate::inbound::http::reactions::react_to_event;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::sleep_series::get_sleep_week;
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Store the path's user id in the session, mimicking a completed login.
#[get("/test-login/{user_id}")]
pub async fn test_login(
    path: web::Path<i64>,
    session: SessionContext,
) -> Result<HttpResponse, Error> {
    let user_id = UserId::new(path.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Log in through [`test_login`] and return the issued session cookie.
///
/// The app under test must register [`test_login`] at its root.
pub async fn login_cookie<S>(app: &S, user_id: i64) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let request = test::TestRequest::get()
        .uri(&format!("/test-login/{user_id}"))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "test login failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Mocked driving ports; set expectations on the ports a test exercises.
///
/// Ports without expectations panic when called, so a handler reaching the
/// wrong use-case fails loudly.
#[derive(Default)]
pub struct TestPorts {
    pub feed: MockFeedQuery,
    pub reactions: MockReactionCommand,
    pub sleep_series: MockSleepSeriesQuery,
    pub events: MockEventCommand,
    pub health_metrics: MockHealthMetricCommand,
}

impl TestPorts {
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.feed),
            Arc::new(self.reactions),
            Arc::new(self.sleep_series),
            Arc::new(self.events),
            Arc::new(self.health_metrics),
        )
    }
}

/// App with every API handler mounted under `/api/v1` plus [`test_login`].
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .wrap(test_session_middleware())
        .service(test_login)
        .service(
            web::scope("/api/v1")
                .service(get_feed)
                .service(react_to_event)
                .service(get_sleep_week)
                .service(record_event)
                .service(delete_event)
                .service(record_metric),
        )
}
