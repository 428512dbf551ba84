//! Sleep series HTTP handler.
//!
//! ```text
//! GET /api/v1/users/{handle}/sleep-week
//! ```

use actix_web::{get, web};

use crate::domain::Error;
use crate::domain::ports::{SleepWeekRequest, SleepWeekResponse};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_handle};

/// Dense daily sleep scores for the caller or one of their friends.
#[utoipa::path(
    get,
    path = "/api/v1/users/{handle}/sleep-week",
    params(("handle" = String, Path, description = "Target user's handle")),
    responses(
        (status = 200, description = "One entry per day, oldest first", body = SleepWeekResponse),
        (status = 400, description = "Invalid handle", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not a friend of the target", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["health"],
    operation_id = "getSleepWeek",
    security(("SessionCookie" = []))
)]
#[get("/users/{handle}/sleep-week")]
pub async fn get_sleep_week(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<SleepWeekResponse>> {
    let viewer_id = session.require_user_id()?;
    let target_handle = parse_handle(path.into_inner(), FieldName::new("handle"))?;

    let response = state
        .sleep_series
        .build_week(SleepWeekRequest {
            viewer_id,
            target_handle,
        })
        .await?;
    Ok(web::Json(response))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::NaiveDate;
    use serde_json::Value;

    use crate::domain::ports::{SeriesEntry, SleepWeekResponse};
    use crate::domain::{Error, FRIENDS_ONLY, MetricType, UserProfile};
    use crate::inbound::http::test_utils::{TestPorts, login_cookie, test_app};

    #[actix_web::test]
    async fn returns_scores_for_the_handle() {
        let mut ports = TestPorts::default();
        ports
            .sleep_series
            .expect_build_week()
            .withf(|request| {
                request.viewer_id.as_i64() == 1 && request.target_handle.as_ref() == "grace@example.com"
            })
            .times(1)
            .return_once(|_| {
                let user = UserProfile::try_from_parts(2, "Grace", "grace@example.com")
                    .expect("profile");
                Ok(SleepWeekResponse {
                    scores: vec![SeriesEntry {
                        date: NaiveDate::from_ymd_opt(2026, 3, 10).expect("date"),
                        value: 55.0,
                        metric_type: MetricType::Sleep,
                        user,
                    }],
                })
            });
        let app = actix_test::init_service(test_app(ports.into_state())).await;
        let cookie = login_cookie(&app, 1).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/users/grace@example.com/sleep-week")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        let entry = &body["scores"][0];
        assert_eq!(entry["date"], "2026-03-10");
        assert_eq!(entry["value"], 55.0);
        assert_eq!(entry["type"], "sleep");
        assert_eq!(entry["user"]["handle"], "grace@example.com");
    }

    #[actix_web::test]
    async fn forbidden_viewers_get_403() {
        let mut ports = TestPorts::default();
        ports
            .sleep_series
            .expect_build_week()
            .return_once(|_| Err(Error::forbidden(FRIENDS_ONLY)));
        let app = actix_test::init_service(test_app(ports.into_state())).await;
        let cookie = login_cookie(&app, 3).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/users/grace@example.com/sleep-week")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn malformed_handles_are_rejected_before_lookup() {
        let mut ports = TestPorts::default();
        ports.sleep_series.expect_build_week().times(0);
        let app = actix_test::init_service(test_app(ports.into_state())).await;
        let cookie = login_cookie(&app, 1).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/users/not-a-handle/sleep-week")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
