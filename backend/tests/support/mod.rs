//! Shared fixtures for integration tests: real services over the in-memory
//! adapters, with a manually driven clock.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, get, test, web};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use mockable::Clock;

use fitfeed::Trace;
use fitfeed::domain::{
    Error, EventService, FeedService, FeedSettings, HealthMetricService, ReactionService,
    SleepSeriesService, UserId,
};
use fitfeed::inbound::http::error::json_config;
use fitfeed::inbound::http::events::{delete_event, record_event};
use fitfeed::inbound::http::feed::get_feed;
use fitfeed::inbound::http::health_metrics::record_metric;
use fitfeed::inbound::http::reactions::react_to_event;
use fitfeed::inbound::http::session::SessionContext;
use fitfeed::inbound::http::sleep_series::get_sleep_week;
use fitfeed::inbound::http::state::HttpState;
use fitfeed::test_support::{InMemoryStore, MutableClock};

/// Tuesday 10 March 2026, 18:00 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 18, 0, 0)
        .single()
        .expect("fixture timestamp")
}

pub fn utc_settings() -> FeedSettings {
    FeedSettings::new(3, 7, FixedOffset::east_opt(0).expect("utc offset")).expect("settings")
}

pub struct World {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
    pub settings: FeedSettings,
}

impl World {
    pub fn new() -> Self {
        Self::with_settings(utc_settings())
    }

    pub fn with_settings(settings: FeedSettings) -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
            clock: Arc::new(MutableClock::new(fixed_now())),
            settings,
        }
    }

    fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub fn feed(&self) -> FeedService<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore> {
        FeedService::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.clock(),
            self.settings,
        )
    }

    pub fn reactions(&self) -> ReactionService<InMemoryStore, InMemoryStore, InMemoryStore> {
        ReactionService::new(self.store.clone(), self.store.clone(), self.store.clone())
    }

    pub fn sleep_series(&self) -> SleepSeriesService<InMemoryStore, InMemoryStore, InMemoryStore> {
        SleepSeriesService::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.clock(),
            self.settings,
        )
    }

    pub fn events(&self) -> EventService<InMemoryStore> {
        EventService::new(self.store.clone(), self.clock())
    }

    pub fn metrics(&self) -> HealthMetricService<InMemoryStore> {
        HealthMetricService::new(self.store.clone(), self.clock(), self.settings)
    }

    pub fn http_state(&self) -> HttpState {
        HttpState::new(
            Arc::new(self.feed()),
            Arc::new(self.reactions()),
            Arc::new(self.sleep_series()),
            Arc::new(self.events()),
            Arc::new(self.metrics()),
        )
    }
}

#[get("/test-login/{user_id}")]
async fn test_login(path: web::Path<i64>, session: SessionContext) -> Result<HttpResponse, Error> {
    let user_id = UserId::new(path.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Production routes plus a login shim standing in for the auth service.
pub fn http_app(
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
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .wrap(session)
        .wrap(Trace)
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

pub async fn login<S>(app: &S, user_id: UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
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
