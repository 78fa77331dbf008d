//! API router with Swagger UI
//!
//! Protected routes are grouped by gate. Each group runs `auth_middleware`
//! first and then its role gate; groups are merged so one path can carry
//! methods with different gates (e.g. `GET /api/news` vs `POST /api/news`).

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AnalyticsService, ClassService, NewsService, ScheduleService, UserService};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ErrorResponse, MessageResponse};
use crate::interfaces::http::middleware::{
    admin_middleware, approved_middleware, auth_middleware, teacher_middleware, AuthState,
};

use super::modules::{
    analytics, auth, classes, health, metrics, news, request_id::request_id_middleware, schedule,
    users,
};

/// Services shared by every API route.
/// Handlers extract their own state type via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub classes: Arc<ClassService>,
    pub news: Arc<NewsService>,
    pub schedule: Arc<ScheduleService>,
    pub analytics: Arc<AnalyticsService>,
}

impl AppState {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            users: Arc::new(UserService::new(repos.clone(), jwt_config, bcrypt_cost)),
            classes: Arc::new(ClassService::new(repos.clone())),
            news: Arc::new(NewsService::new(repos.clone())),
            schedule: Arc::new(ScheduleService::new(repos.clone())),
            analytics: Arc::new(AnalyticsService::new(repos)),
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        AuthState {
            users: Arc::clone(&s.users),
        }
    }
}

impl FromRef<AppState> for users::UserHandlerState {
    fn from_ref(s: &AppState) -> Self {
        users::UserHandlerState {
            users: Arc::clone(&s.users),
        }
    }
}

impl FromRef<AppState> for classes::ClassHandlerState {
    fn from_ref(s: &AppState) -> Self {
        classes::ClassHandlerState {
            classes: Arc::clone(&s.classes),
        }
    }
}

impl FromRef<AppState> for news::NewsHandlerState {
    fn from_ref(s: &AppState) -> Self {
        news::NewsHandlerState {
            news: Arc::clone(&s.news),
        }
    }
}

impl FromRef<AppState> for schedule::ScheduleHandlerState {
    fn from_ref(s: &AppState) -> Self {
        schedule::ScheduleHandlerState {
            schedule: Arc::clone(&s.schedule),
        }
    }
}

impl FromRef<AppState> for analytics::AnalyticsHandlerState {
    fn from_ref(s: &AppState) -> Self {
        analytics::AnalyticsHandlerState {
            analytics: Arc::clone(&s.analytics),
        }
    }
}

/// Non-API pieces the router needs.
pub struct RouterOptions {
    pub db: DatabaseConnection,
    /// `/metrics` is only mounted when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
    pub allowed_origins: Vec<String>,
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /api/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        // Auth
        auth::root,
        auth::register,
        auth::login,
        auth::get_current_user,
        auth::change_password,
        // Users
        users::list_pending_users,
        users::approve_user,
        users::reject_user,
        users::list_users,
        // Classes
        classes::list_classes,
        classes::create_class,
        classes::get_class,
        classes::update_class,
        classes::delete_class,
        classes::list_students,
        // News
        news::list_news,
        news::create_news,
        news::get_news,
        news::update_news,
        news::delete_news,
        news::list_pending_news,
        news::approve_news,
        news::reject_news,
        // Schedule
        schedule::list_schedule,
        schedule::create_schedule,
        schedule::get_schedule,
        schedule::update_schedule,
        schedule::delete_schedule,
        schedule::create_change_request,
        schedule::list_change_requests,
        schedule::review_queue,
        schedule::approve_change_request,
        schedule::reject_change_request,
        // Analytics
        analytics::get_analytics,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            health::HealthResponse,
            health::DatabaseHealth,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::ChangePasswordRequest,
            auth::LoginResponse,
            auth::UserDto,
            classes::ClassRequest,
            classes::ClassDto,
            news::NewsRequest,
            news::NewsDto,
            schedule::ScheduleRequest,
            schedule::ScheduleDto,
            schedule::ChangeRequestCreate,
            schedule::ChangeRequestDto,
            analytics::AnalyticsDto,
            analytics::ActivityDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Authentication", description = "Registration, login and the current account"),
        (name = "Users", description = "Admin account approval and listing"),
        (name = "Classes", description = "Classes and their student rosters"),
        (name = "News", description = "School news with teacher posts moderated by admins"),
        (name = "Schedule", description = "Timetable entries and teacher change requests"),
        (name = "Analytics", description = "Usage counts for the admin dashboard"),
    ),
    info(
        title = "School29 Management System API",
        version = "1.0.0",
        description = "REST API for school administration: accounts, classes, news and schedules"
    )
)]
pub struct ApiDoc;

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(origins))
}

/// Create the HTTP router with all routes
pub fn create_api_router(state: AppState, options: RouterOptions) -> Router {
    let auth_state = AuthState::from_ref(&state);

    // ── Public ─────────────────────────────────────────────────
    let public_routes = Router::new()
        .route("/api/", get(auth::root))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .with_state(state.clone());

    // ── Any approved account ───────────────────────────────────
    let approved_routes = Router::new()
        .route("/api/me", get(auth::get_current_user))
        .route("/api/change-password", post(auth::change_password))
        .route("/api/classes", get(classes::list_classes))
        .route("/api/classes/{id}", get(classes::get_class))
        .route("/api/news", get(news::list_news))
        .route("/api/news/{id}", get(news::get_news))
        .route("/api/schedule", get(schedule::list_schedule))
        .route("/api/schedule/{id}", get(schedule::get_schedule))
        .route_layer(middleware::from_fn(approved_middleware))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    // ── Teachers (and admins) ──────────────────────────────────
    let teacher_routes = Router::new()
        .route("/api/classes/{id}/students", get(classes::list_students))
        .route("/api/news", post(news::create_news))
        .route(
            "/api/news/{id}",
            put(news::update_news).delete(news::delete_news),
        )
        .route(
            "/api/schedule/change-requests",
            post(schedule::create_change_request).get(schedule::list_change_requests),
        )
        .route_layer(middleware::from_fn(teacher_middleware))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    // ── Admins ─────────────────────────────────────────────────
    let admin_routes = Router::new()
        .route("/api/classes", post(classes::create_class))
        .route(
            "/api/classes/{id}",
            put(classes::update_class).delete(classes::delete_class),
        )
        .route("/api/schedule", post(schedule::create_schedule))
        .route(
            "/api/schedule/{id}",
            put(schedule::update_schedule).delete(schedule::delete_schedule),
        )
        .route("/api/admin/pending-users", get(users::list_pending_users))
        .route("/api/admin/approve-user/{id}", post(users::approve_user))
        .route("/api/admin/reject-user/{id}", post(users::reject_user))
        .route("/api/admin/users", get(users::list_users))
        .route("/api/admin/pending-news", get(news::list_pending_news))
        .route("/api/admin/approve-news/{id}", post(news::approve_news))
        .route("/api/admin/reject-news/{id}", post(news::reject_news))
        .route(
            "/api/admin/schedule-change-requests",
            get(schedule::review_queue),
        )
        .route(
            "/api/admin/approve-schedule-change/{id}",
            post(schedule::approve_change_request),
        )
        .route(
            "/api/admin/reject-schedule-change/{id}",
            post(schedule::reject_change_request),
        )
        .route("/api/admin/analytics", get(analytics::get_analytics))
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(state);

    // ── Operational ────────────────────────────────────────────
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db: options.db,
            started_at: Arc::new(Instant::now()),
        });

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .merge(public_routes)
        .merge(approved_routes)
        .merge(teacher_routes)
        .merge(admin_routes);

    if let Some(handle) = options.metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors_layer(&options.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::{UserRole, UserStatus};
    use crate::infrastructure::crypto::jwt::create_token;
    use crate::infrastructure::database::test_connection;
    use crate::infrastructure::SeaOrmRepositoryProvider;
    use crate::test_support::{jwt_config, seed_user, BCRYPT_COST, PASSWORD};

    struct TestApp {
        router: Router,
        repos: Arc<dyn RepositoryProvider>,
    }

    impl TestApp {
        async fn new() -> Self {
            let db = test_connection().await;
            let repos: Arc<dyn RepositoryProvider> =
                Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
            let state = AppState::new(repos.clone(), jwt_config(), BCRYPT_COST);
            let router = create_api_router(
                state,
                RouterOptions {
                    db,
                    metrics: None,
                    allowed_origins: vec!["*".into()],
                },
            );
            Self { router, repos }
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, json)
        }

        async fn login(&self, username: &str) -> String {
            let (status, body) = self
                .send(
                    Method::POST,
                    "/api/login",
                    None,
                    Some(json!({"username": username, "password": PASSWORD})),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "login failed: {}", body);
            body["access_token"].as_str().unwrap().to_string()
        }

        async fn seeded_token(&self, username: &str, role: UserRole) -> String {
            seed_user(&self.repos, username, role, UserStatus::Approved).await;
            self.login(username).await
        }
    }

    fn registration(email: &str, username: &str, role: &str) -> Value {
        json!({
            "email": email,
            "username": username,
            "full_name": "Alice Example",
            "password": PASSWORD,
            "role": role
        })
    }

    #[tokio::test]
    async fn banner_is_public() {
        let app = TestApp::new().await;
        let (status, body) = app.send(Method::GET, "/api/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "School29 Management System API");
    }

    #[tokio::test]
    async fn admin_registration_login_and_me() {
        let app = TestApp::new().await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/register",
                None,
                Some(registration("alice@school.test", "alice", "admin")),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            "Registration successful. Please wait for admin approval."
        );

        let creds = json!({"username": "alice", "password": PASSWORD});
        let (status, body) = app
            .send(Method::POST, "/api/login", None, Some(creds.clone()))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Account not approved yet");

        let alice = app
            .repos
            .users()
            .get_user_by_username("alice")
            .await
            .unwrap()
            .unwrap();
        assert!(app
            .repos
            .users()
            .transition_status(&alice.id, UserStatus::Pending, UserStatus::Approved)
            .await
            .unwrap());

        let (status, body) = app.send(Method::POST, "/api/login", None, Some(creds)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "bearer");
        assert!(body["user"].get("password_hash").is_none());
        let token = body["access_token"].as_str().unwrap().to_string();

        let (status, body) = app.send(Method::GET, "/api/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");
        assert_eq!(body["role"], "admin");
        assert_eq!(body["status"], "approved");
    }

    #[tokio::test]
    async fn change_password_replaces_bootstrap_credentials() {
        let app = TestApp::new().await;
        let token = app.seeded_token("root", UserRole::Admin).await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/change-password",
                Some(&token),
                Some(json!({"current_password": "wrong", "new_password": "n3w-passphrase"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Invalid current password");

        let (status, _) = app
            .send(
                Method::POST,
                "/api/change-password",
                Some(&token),
                Some(json!({"current_password": PASSWORD, "new_password": "short"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = app
            .send(
                Method::POST,
                "/api/change-password",
                Some(&token),
                Some(json!({"current_password": PASSWORD, "new_password": "n3w-passphrase"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Password changed successfully");

        let (status, _) = app
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(json!({"username": "root", "password": PASSWORD})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = app
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(json!({"username": "root", "password": "n3w-passphrase"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app
            .send(
                Method::POST,
                "/api/change-password",
                None,
                Some(json!({"current_password": PASSWORD, "new_password": "n3w-passphrase"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_query_filters_get_detail_body() {
        let app = TestApp::new().await;
        let token = app.seeded_token("root", UserRole::Admin).await;

        for uri in [
            "/api/admin/users?role=janitor",
            "/api/admin/users?status=archived",
            "/api/admin/schedule-change-requests?status=maybe",
        ] {
            let (status, body) = app.send(Method::GET, uri, Some(&token), None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert!(body["detail"].is_string(), "{}: {}", uri, body);
        }

        let (status, _) = app
            .send(Method::GET, "/api/admin/users?role=teacher", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let app = TestApp::new().await;
        let (first, _) = app
            .send(
                Method::POST,
                "/api/register",
                None,
                Some(registration("same@school.test", "alice", "student")),
            )
            .await;
        assert_eq!(first, StatusCode::OK);

        let (second, body) = app
            .send(
                Method::POST,
                "/api/register",
                None,
                Some(registration("same@school.test", "bob", "student")),
            )
            .await;
        assert_eq!(second, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Username or email already registered");
    }

    #[tokio::test]
    async fn malformed_registration_is_unprocessable() {
        let app = TestApp::new().await;

        let (status, _) = app
            .send(
                Method::POST,
                "/api/register",
                None,
                Some(registration("not-an-email", "alice", "student")),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = app
            .send(
                Method::POST,
                "/api/register",
                None,
                Some(registration("a@school.test", "alice", "janitor")),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn bad_credentials_are_indistinguishable() {
        let app = TestApp::new().await;
        seed_user(&app.repos, "ann", UserRole::Teacher, UserStatus::Approved).await;

        let (wrong_pw, wrong_body) = app
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(json!({"username": "ann", "password": "nope"})),
            )
            .await;
        let (unknown, unknown_body) = app
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(json!({"username": "ghost", "password": PASSWORD})),
            )
            .await;

        assert_eq!(wrong_pw, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_body, unknown_body);
        assert_eq!(wrong_body["detail"], "Incorrect username or password");
    }

    #[tokio::test]
    async fn protected_routes_require_a_valid_token() {
        let app = TestApp::new().await;

        let (status, body) = app.send(Method::GET, "/api/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Not authenticated");

        let (status, body) = app
            .send(Method::GET, "/api/news", Some("garbage.token.here"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Could not validate credentials");

        let request = Request::builder()
            .uri("/api/me")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn pending_account_token_is_refused() {
        let app = TestApp::new().await;
        seed_user(&app.repos, "kid", UserRole::Student, UserStatus::Pending).await;
        let token = create_token("kid", &jwt_config()).unwrap();

        let (status, body) = app.send(Method::GET, "/api/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "User account not approved");
    }

    #[tokio::test]
    async fn student_is_forbidden_from_admin_routes() {
        let app = TestApp::new().await;
        let token = app.seeded_token("kid", UserRole::Student).await;

        for (method, uri) in [
            (Method::GET, "/api/admin/pending-users"),
            (Method::POST, "/api/admin/approve-user/any-id"),
            (Method::GET, "/api/admin/users"),
            (Method::GET, "/api/admin/pending-news"),
            (Method::GET, "/api/admin/schedule-change-requests"),
            (Method::GET, "/api/admin/analytics"),
        ] {
            let (status, body) = app.send(method, uri, Some(&token), None).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
            assert_eq!(body["detail"], "Not enough permissions");
        }

        let (status, _) = app
            .send(
                Method::POST,
                "/api/news",
                Some(&token),
                Some(json!({"title": "Hi", "content": "..."})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Reads stay open to approved students
        let (status, _) = app.send(Method::GET, "/api/news", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn teacher_news_is_hidden_until_approved() {
        let app = TestApp::new().await;
        let admin = app.seeded_token("root", UserRole::Admin).await;
        let teacher = app.seeded_token("ann", UserRole::Teacher).await;

        let (status, created) = app
            .send(
                Method::POST,
                "/api/news",
                Some(&teacher),
                Some(json!({"title": "Trip", "content": "Museum on Friday"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["status"], "pending");
        let id = created["id"].as_str().unwrap().to_string();

        let (_, listed) = app.send(Method::GET, "/api/news", Some(&teacher), None).await;
        assert_eq!(listed.as_array().unwrap().len(), 0);

        let (_, queue) = app
            .send(Method::GET, "/api/admin/pending-news", Some(&admin), None)
            .await;
        assert_eq!(queue.as_array().unwrap().len(), 1);

        let (status, approved) = app
            .send(
                Method::POST,
                &format!("/api/admin/approve-news/{}", id),
                Some(&admin),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(approved["status"], "published");

        let (_, listed) = app.send(Method::GET, "/api/news", Some(&teacher), None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, _) = app
            .send(
                Method::POST,
                &format!("/api/admin/approve-news/{}", id),
                Some(&admin),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn approved_change_request_is_applied_to_schedule() {
        let app = TestApp::new().await;
        let admin = app.seeded_token("root", UserRole::Admin).await;
        let teacher = app.seeded_token("ann", UserRole::Teacher).await;
        let teacher_id = app
            .repos
            .users()
            .get_user_by_username("ann")
            .await
            .unwrap()
            .unwrap()
            .id;

        let (status, class) = app
            .send(
                Method::POST,
                "/api/classes",
                Some(&admin),
                Some(json!({"name": "5A", "grade": 5})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, entry) = app
            .send(
                Method::POST,
                "/api/schedule",
                Some(&admin),
                Some(json!({
                    "class_id": class["id"],
                    "day_of_week": 0,
                    "time_slot": "9:00-10:00",
                    "subject": "Math",
                    "teacher_id": teacher_id
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(entry["teacher_name"], "ann Example");
        let schedule_id = entry["id"].as_str().unwrap().to_string();

        let (status, request) = app
            .send(
                Method::POST,
                "/api/schedule/change-requests",
                Some(&teacher),
                Some(json!({
                    "schedule_id": schedule_id,
                    "requested_changes": {"subject": "Physics", "room": "204"},
                    "reason": "Lab is free"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(request["status"], "pending");
        let request_id = request["id"].as_str().unwrap().to_string();

        let (status, mine) = app
            .send(Method::GET, "/api/schedule/change-requests", Some(&teacher), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mine.as_array().unwrap().len(), 1);

        let (status, reviewed) = app
            .send(
                Method::POST,
                &format!("/api/admin/approve-schedule-change/{}", request_id),
                Some(&admin),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reviewed["status"], "approved");
        assert!(reviewed["reviewed_by"].is_string());

        let (_, updated) = app
            .send(
                Method::GET,
                &format!("/api/schedule/{}", schedule_id),
                Some(&teacher),
                None,
            )
            .await;
        assert_eq!(updated["subject"], "Physics");
        assert_eq!(updated["extra"]["room"], "204");
    }

    #[tokio::test]
    async fn analytics_counts_logins() {
        let app = TestApp::new().await;
        let admin = app.seeded_token("root", UserRole::Admin).await;

        let (status, body) = app
            .send(Method::GET, "/api/admin/analytics", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_users"], 1);
        assert_eq!(body["logins_last_7_days"], 1);
        assert_eq!(body["activity_by_action"]["login"], 1);
    }

    #[tokio::test]
    async fn health_echoes_request_id() {
        let app = TestApp::new().await;
        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "req-42")
            .body(Body::empty())
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-request-id").unwrap(), "req-42");
    }
}
