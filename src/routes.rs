// src/routes.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    // Reachable without a token
    let public_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/login", post(handlers::auth::login))
        .route("/forgot-password", post(handlers::auth::forgot_password))
        .route("/reset-password", post(handlers::auth::reset_password))
        .route("/verify-reset-token", post(handlers::auth::verify_reset_token))
        .route("/users", post(handlers::users::create))
        .route("/departments", get(handlers::departments::list))
        .route("/roles", get(handlers::roles::list))
        .route("/company-profile", get(handlers::company_profile::get));

    let user_routes = Router::new()
        .route("/profile", get(handlers::users::profile))
        .route("/users", get(handlers::users::list))
        .route(
            "/users/{id}",
            get(handlers::users::get)
                .put(handlers::users::update)
                .delete(handlers::users::delete),
        )
        .route("/users/{id}/status", patch(handlers::users::set_status))
        .route("/users/{id}/password", patch(handlers::users::change_password))
        .route(
            "/users/department/{department_id}",
            get(handlers::users::list_by_department),
        );

    let department_routes = Router::new()
        .route("/departments", post(handlers::departments::create))
        .route(
            "/departments/{id}",
            get(handlers::departments::get)
                .put(handlers::departments::update)
                .delete(handlers::departments::delete),
        )
        .route("/departments/{id}/status", patch(handlers::departments::set_status));

    let employee_routes = Router::new()
        .route(
            "/employees",
            get(handlers::employees::list).post(handlers::employees::create),
        )
        .route("/employees/search", get(handlers::employees::search))
        .route("/employees/available-users", get(handlers::employees::available_users))
        .route("/employees/dashboard-stats", get(handlers::employees::dashboard))
        .route(
            "/employees/department/{department_id}",
            get(handlers::employees::list_by_department),
        )
        .route(
            "/employees/{id}",
            get(handlers::employees::get)
                .put(handlers::employees::update)
                .delete(handlers::employees::delete),
        );

    let document_routes = Router::new()
        .route(
            "/documents/employee",
            post(handlers::documents::upload_employee_document)
                .get(handlers::documents::list_employee_documents),
        )
        .route(
            "/documents/applicant",
            post(handlers::documents::upload_applicant_document)
                .get(handlers::documents::list_applicant_documents),
        )
        .route("/documents/users/available", get(handlers::documents::available_users))
        .route(
            "/documents/{id}",
            get(handlers::documents::get_document).delete(handlers::documents::delete_document),
        );

    let leave_routes = Router::new()
        .route("/leaves", post(handlers::leaves::apply).get(handlers::leaves::list))
        .route("/leaves/statistics", get(handlers::leaves::statistics))
        .route(
            "/leaves/{id}",
            get(handlers::leaves::get)
                .put(handlers::leaves::update)
                .delete(handlers::leaves::delete),
        )
        .route("/leaves/{id}/approve", patch(handlers::leaves::approve))
        .route("/leaves/{id}/reject", patch(handlers::leaves::reject));

    let attendance_routes = Router::new()
        .route("/attendance/clock-in", post(handlers::attendance::clock_in))
        .route("/attendance/clock-out", post(handlers::attendance::clock_out))
        .route("/attendance/status", get(handlers::attendance::current_status))
        .route("/attendance/history", get(handlers::attendance::history))
        .route("/attendance/statistics", get(handlers::attendance::statistics));

    let company_routes = Router::new()
        .route("/company-profile", post(handlers::company_profile::save));

    // Session token required
    let protected_routes = Router::new()
        .merge(user_routes)
        .merge(department_routes)
        .merge(employee_routes)
        .merge(document_routes)
        .merge(leave_routes)
        .merge(attendance_routes)
        .merge(company_routes)
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(app_state.max_body_bytes))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        models::{auth::Claims, user::UserRole},
        services::token::TokenService,
        test_support::{insert_user, PASSWORD},
    };
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::Value;
    use sqlx::{postgres::PgPoolOptions, PgPool};
    use tower::ServiceExt;

    const SECRET: &str = "router-test-secret";

    // Requests sent through `app()` are all answered before any query runs
    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://hr:hr@127.0.0.1:1/hr_test")
            .unwrap();
        app_with(pool)
    }

    fn app_with(pool: PgPool) -> Router {
        let config = Config {
            database_url: String::new(),
            jwt_secret: SECRET.into(),
            bind_addr: "127.0.0.1:0".into(),
            max_connections: 1,
            max_body_bytes: 1024 * 1024,
        };
        build_router(AppState::from_parts(pool, &config))
    }

    fn session_token(id: i32, role: UserRole) -> String {
        let now = Utc::now();
        let claims = Claims {
            id,
            role,
            email: format!("user{}@example.com", id),
            department: None,
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(8)).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(req: Request<Body>) -> (StatusCode, Value) {
        send_to(app(), req).await
    }

    async fn send_to(router: Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = app()
            .oneshot(request(Method::GET, "/api/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_route_without_token_is_unauthorized() {
        let (status, body) = send(request(Method::GET, "/api/attendance/status", None, None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "UNAUTHORIZED");
        assert_eq!(body["message"], "No token provided");
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let (status, body) =
            send(request(Method::POST, "/api/attendance/clock-in", Some("not-a-jwt"), None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn reset_token_is_not_a_session() {
        let reset = TokenService::new(SECRET)
            .issue_reset(5, "user5@example.com", Utc::now())
            .unwrap();

        let (status, _) = send(request(Method::GET, "/api/leaves", Some(&reset), None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            id: 1,
            role: UserRole::SystemAdmin,
            email: "a@example.com".into(),
            department: None,
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(8)).timestamp() as usize,
        };
        let forged =
            encode(&Header::default(), &claims, &EncodingKey::from_secret(b"someone-else")).unwrap();

        let (status, _) = send(request(Method::GET, "/api/profile", Some(&forged), None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn employee_cannot_approve_leaves() {
        let token = session_token(3, UserRole::Employee);

        let (status, body) =
            send(request(Method::PATCH, "/api/leaves/7/approve", Some(&token), None)).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "FORBIDDEN");
        assert_eq!(body["message"], "Only System Admin can approve/reject leaves");
    }

    #[tokio::test]
    async fn reject_without_reason_fails_before_touching_the_leave() {
        let token = session_token(1, UserRole::SystemAdmin);

        let (status, body) = send(request(
            Method::PATCH,
            "/api/leaves/7/reject",
            Some(&token),
            Some(serde_json::json!({ "rejectionReason": "   " })),
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Rejection reason is required");
    }

    #[tokio::test]
    async fn inverted_leave_window_is_rejected() {
        let token = session_token(3, UserRole::Employee);

        let (status, body) = send(request(
            Method::GET,
            "/api/leaves?startDate=2025-02-10&endDate=2025-02-01",
            Some(&token),
            None,
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_DATE_RANGE");
    }

    #[tokio::test]
    async fn malformed_json_uses_the_error_envelope() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"email\": "))
            .unwrap();

        let (status, body) = send(req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn login_validates_fields_before_lookup() {
        let (status, body) = send(request(
            Method::POST,
            "/api/login",
            None,
            Some(serde_json::json!({ "email": "not-an-email", "password": "" })),
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"].is_object());
    }

    // Unknown paths are 404; matched protected paths fail at the auth guard
    #[tokio::test]
    async fn picker_and_dashboard_paths_are_routed() {
        for uri in ["/api/employees/dashboard-stats", "/api/documents/users/available"] {
            let (status, _) = send(request(Method::GET, uri, None, None)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        }

        let (status, _) = send(request(Method::GET, "/api/documents/users/nobody", None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_numeric_id_uses_the_error_envelope() {
        let token = session_token(3, UserRole::Employee);

        let (status, body) = send(request(Method::GET, "/api/leaves/abc", Some(&token), None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_status_filter_uses_the_error_envelope() {
        let token = session_token(3, UserRole::Employee);

        let (status, body) =
            send(request(Method::GET, "/api/leaves?status=Bogus", Some(&token), None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn reject_without_a_body_asks_for_a_reason() {
        let token = session_token(1, UserRole::SystemAdmin);

        let (status, body) =
            send(request(Method::PATCH, "/api/leaves/7/reject", Some(&token), None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Rejection reason is required");
    }

    #[sqlx::test]
    async fn login_returns_the_token_at_the_top_level(pool: PgPool) {
        insert_user(&pool, "signin", UserRole::Employee).await;

        let (status, body) = send_to(
            app_with(pool),
            request(
                Method::POST,
                "/api/login",
                None,
                Some(serde_json::json!({ "email": "signin@example.com", "password": PASSWORD })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(body.get("data").is_none());
    }

    #[sqlx::test]
    async fn wrong_password_is_unauthorized(pool: PgPool) {
        insert_user(&pool, "careful", UserRole::Employee).await;

        let (status, body) = send_to(
            app_with(pool),
            request(
                Method::POST,
                "/api/login",
                None,
                Some(serde_json::json!({ "email": "careful@example.com", "password": "wrong-one" })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid email or password");
    }

    #[sqlx::test]
    async fn forgot_password_returns_the_reset_token_at_the_top_level(pool: PgPool) {
        insert_user(&pool, "forgetful", UserRole::Employee).await;

        let (status, body) = send_to(
            app_with(pool),
            request(
                Method::POST,
                "/api/forgot-password",
                None,
                Some(serde_json::json!({ "email": "forgetful@example.com" })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["resetToken"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(body.get("data").is_none());
    }
}
