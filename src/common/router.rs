use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::{header::CACHE_CONTROL, HeaderValue, StatusCode},
    routing::{get, post},
    BoxError, Router,
};
use tower::{buffer::BufferLayer, limit::RateLimitLayer, ServiceBuilder};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    common::error::{ErrorResponse, ErrorTypes},
    handlers, internal_server_error_handler, swagger, AppState,
};

pub const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

fn courses_router() -> Router<AppState> {
    Router::new()
        .route("/courses", get(handlers::courseware::courses))
        .route(
            "/courses/{org}/{course}/{run}/info",
            get(handlers::courseware::course_info),
        )
}

// Pages holding per-user state must never be served from a cache
fn uncached_router() -> Router<AppState> {
    Router::new()
        .route(
            "/courses/{org}/{course}/{run}/courseware",
            get(handlers::courseware::index),
        )
        .route(
            "/courses/{org}/{course}/{run}/courseware/{chapter}",
            get(handlers::courseware::index),
        )
        .route(
            "/courses/{org}/{course}/{run}/courseware/{chapter}/{section}",
            get(handlers::courseware::index),
        )
        .route(
            "/courses/{org}/{course}/{run}/courseware/{chapter}/{section}/{position}",
            get(handlers::courseware::index),
        )
        .route("/jump_to/{*location}", get(handlers::courseware::jump_to))
        .route(
            "/courses/{org}/{course}/{run}/gradebook",
            get(handlers::profile::gradebook),
        )
        .route(
            "/courses/{org}/{course}/{run}/profile",
            get(handlers::profile::profile),
        )
        .route(
            "/courses/{org}/{course}/{run}/profile/{student_id}",
            get(handlers::profile::profile),
        )
        .route_layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(NO_CACHE),
        ))
}

fn schedules_router() -> Router<AppState> {
    Router::new().route(
        "/courses/{org}/{course}/{run}/schedule/reset",
        post(handlers::schedules::reset_schedule),
    )
}

pub fn get_router(app_state: AppState) -> Router {
    let rate_limit = app_state.config.rate_limit_per_sec;
    Router::new()
        .merge(courses_router())
        .merge(uncached_router())
        .merge(schedules_router())
        .layer(CorsLayer::permissive().allow_origin(tower_http::cors::Any))
        .layer(CatchPanicLayer::custom(internal_server_error_handler))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|err: BoxError| async move {
                    tracing::error!("{}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        axum::Json(ErrorResponse::new(
                            ErrorTypes::InternalError,
                            "Internal error occured",
                        )),
                    )
                }))
                // RateLimit is not Clone, the buffer in front of it is
                .layer(BufferLayer::new(1024))
                .layer(RateLimitLayer::new(rate_limit, Duration::from_secs(1))),
        )
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", swagger::ApiDoc::openapi()))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, Method, Request},
    };
    use sqlx::mysql::MySqlPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::common::{config::test_config, token::issue_test_token};

    // The pool never connects: these requests are all answered before any query
    fn test_state() -> AppState {
        let pool = MySqlPoolOptions::new()
            .connect_lazy(&test_config().database_url)
            .unwrap();
        AppState::for_tests(pool)
    }

    async fn send(request: Request<Body>) -> axum::response::Response {
        get_router(test_state()).oneshot(request).await.unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_gradebook_is_hidden_from_anonymous_users() {
        let resp = send(get_request("/courses/MITx/6.002x/2012_Fall/gradebook")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()[CACHE_CONTROL], NO_CACHE);
    }

    #[tokio::test]
    async fn test_profile_requires_login() {
        let resp = send(get_request("/courses/MITx/6.002x/2012_Fall/profile")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers()[CACHE_CONTROL], NO_CACHE);

        let request = Request::builder()
            .uri("/courses/MITx/6.002x/2012_Fall/profile/3")
            .header(AUTHORIZATION, "Bearer not-a-token")
            .body(Body::empty())
            .unwrap();
        let resp = send(request).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_rejects_malformed_course_id() {
        let token = issue_test_token(1, &test_config().jwt_secret);
        let request = Request::builder()
            .uri("/courses/MITx/6.002x/bad%20run/profile")
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let resp = send(request).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_courseware_with_malformed_course_id() {
        let resp = send(get_request("/courses/MITx/6.002x/bad%20run/courseware/Week_1")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()[CACHE_CONTROL], NO_CACHE);
    }

    #[tokio::test]
    async fn test_jump_to_invalid_location() {
        let resp = send(get_request("/jump_to/not-a-location")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_course_info_is_cacheable() {
        let resp = send(get_request("/courses/MITx/6.002x/bad%20run/info")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.headers().get(CACHE_CONTROL).is_none());
    }

    #[tokio::test]
    async fn test_schedule_reset_requires_login() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/courses/MITx/6.002x/2012_Fall/schedule/reset")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"use_availability_date": true}"#))
            .unwrap();
        let resp = send(request).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    mod seeded {
        use axum::http::header::CONTENT_LOCATION;
        use sqlx::MySqlPool;

        use super::*;
        use crate::{
            controllers::{content::fixtures::{loc, COURSE_ID}, groups::COURSE_ADMIN_GROUP},
            db::fixtures::*,
        };

        const ADMIN: u32 = 1;
        const STUDENT: u32 = 2;

        async fn seed(pool: &MySqlPool) {
            insert_sample_course(pool, COURSE_ID).await;
            insert_user(pool, ADMIN, "staff").await;
            add_to_group(pool, ADMIN, COURSE_ADMIN_GROUP).await;
            insert_user(pool, STUDENT, "learner").await;
            insert_profile(pool, STUDENT, "Ada Lovelace").await;
            insert_score(pool, STUDENT, COURSE_ID, &loc("problem", "p1"), 2.0).await;
        }

        async fn send_as(pool: MySqlPool, uri: &str, user_id: Option<u32>) -> (StatusCode, axum::http::HeaderMap, String) {
            let mut request = Request::builder().uri(uri);
            if let Some(user_id) = user_id {
                let token = issue_test_token(user_id, &test_config().jwt_secret);
                request = request.header(AUTHORIZATION, format!("Bearer {}", token));
            }
            let resp = get_router(AppState::for_tests(pool))
                .oneshot(request.body(Body::empty()).unwrap())
                .await
                .unwrap();
            let status = resp.status();
            let headers = resp.headers().clone();
            let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            (status, headers, String::from_utf8(body.to_vec()).unwrap())
        }

        #[sqlx::test(migrations = "./migrations")]
        #[ignore = "needs a MySQL server at DATABASE_URL"]
        async fn test_gradebook_for_course_admin(pool: MySqlPool) {
            seed(&pool).await;
            let (status, headers, body) =
                send_as(pool.clone(), "/courses/MITx/6.002x/2012_Fall/gradebook", Some(ADMIN)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(headers[CACHE_CONTROL], NO_CACHE);
            assert!(body.contains("Homework 1"));
            assert!(body.contains("learner"));
            assert!(body.contains("Ada Lovelace"));

            let (status, _, _) =
                send_as(pool, "/courses/MITx/6.002x/2012_Fall/gradebook", Some(STUDENT)).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }

        #[sqlx::test(migrations = "./migrations")]
        #[ignore = "needs a MySQL server at DATABASE_URL"]
        async fn test_jump_to_renders_containing_section(pool: MySqlPool) {
            seed(&pool).await;
            let (status, headers, body) =
                send_as(pool.clone(), "/jump_to/i4x://MITx/6.002x/problem/p2", None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(
                headers[CONTENT_LOCATION],
                "/courses/MITx/6.002x/2012_Fall/courseware/Week_1/Homework_1/2"
            );
            assert!(body.contains("Unit 2"));

            let (status, _, body) =
                send_as(pool.clone(), "/jump_to/i4x://MITx/6.002x/problem/nope", None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert!(body.contains("No data at this location"));

            let (status, _, body) =
                send_as(pool, "/jump_to/i4x://MITx/6.002x/html/orphan", None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert!(body.contains("This location is not in any class"));
        }

        #[sqlx::test(migrations = "./migrations")]
        #[ignore = "needs a MySQL server at DATABASE_URL"]
        async fn test_courseware_renders_for_anonymous_users(pool: MySqlPool) {
            seed(&pool).await;
            let (status, headers, body) = send_as(
                pool.clone(),
                "/courses/MITx/6.002x/2012_Fall/courseware/Week_1/Homework_1/1",
                None,
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(headers[CACHE_CONTROL], NO_CACHE);
            assert!(body.contains("Circuits and Electronics"));

            let (status, _, _) = send_as(
                pool,
                "/courses/MITx/6.002x/2012_Fall/courseware/Week_1/Missing",
                None,
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }

        #[sqlx::test(migrations = "./migrations")]
        #[ignore = "needs a MySQL server at DATABASE_URL"]
        async fn test_profile_of_another_student(pool: MySqlPool) {
            seed(&pool).await;
            let uri = format!("/courses/MITx/6.002x/2012_Fall/profile/{}", STUDENT);

            let (status, _, body) = send_as(pool.clone(), &uri, Some(ADMIN)).await;
            assert_eq!(status, StatusCode::OK);
            assert!(body.contains("learner"));
            assert!(body.contains("Ada Lovelace"));

            // Only course admins may look at someone else
            let (status, _, _) =
                send_as(pool.clone(), "/courses/MITx/6.002x/2012_Fall/profile/1", Some(STUDENT)).await;
            assert_eq!(status, StatusCode::NOT_FOUND);

            let (status, _, body) =
                send_as(pool, "/courses/MITx/6.002x/2012_Fall/profile", Some(STUDENT)).await;
            assert_eq!(status, StatusCode::OK);
            assert!(body.contains("learner"));
        }

        #[sqlx::test(migrations = "./migrations")]
        #[ignore = "needs a MySQL server at DATABASE_URL"]
        async fn test_course_info(pool: MySqlPool) {
            seed(&pool).await;
            let (status, headers, body) =
                send_as(pool.clone(), "/courses/MITx/6.002x/2012_Fall/info", None).await;
            assert_eq!(status, StatusCode::OK);
            assert!(headers.get(CACHE_CONTROL).is_none());
            assert!(body.contains("<p>Welcome to 6.002x</p>"));

            let (status, _, _) = send_as(pool, "/courses/MITx/6.002x/2099_Fall/info", None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }

        #[sqlx::test(migrations = "./migrations")]
        #[ignore = "needs a MySQL server at DATABASE_URL"]
        async fn test_schedule_reset(pool: MySqlPool) {
            insert_user(&pool, STUDENT, "learner").await;
            insert_course(&pool, "MITx/6.002x/2013_Spring", true, Some(at(2013, 2, 1))).await;
            let enrollment_id = enroll(&pool, STUDENT, "MITx/6.002x/2013_Spring", at(2013, 1, 15)).await;
            insert_schedule(&pool, enrollment_id, at(2013, 1, 1)).await;

            let token = issue_test_token(STUDENT, &test_config().jwt_secret);
            let request = Request::builder()
                .method(Method::POST)
                .uri("/courses/MITx/6.002x/2013_Spring/schedule/reset")
                .header(AUTHORIZATION, format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"use_availability_date": true}"#))
                .unwrap();
            let resp = get_router(AppState::for_tests(pool.clone()))
                .oneshot(request)
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body["data"]["updated"], 1);
            assert_eq!(schedule_start(&pool, enrollment_id).await, Some(at(2013, 2, 1)));
        }
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let resp = send(get_request("/api-doc/openapi.json")).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
