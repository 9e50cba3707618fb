#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use fieldops_api::auth::jwt::{generate_access_token, JwtConfig};
use fieldops_api::config::ServerConfig;
use fieldops_api::router::build_app_router;
use fieldops_api::state::AppState;
use fieldops_core::ownership::OwnershipConfig;
use fieldops_core::roles::{ROLE_SUPERVISOR, ROLE_TECHNICIAN};
use fieldops_core::types::DbId;
use fieldops_db::models::client::CreateClient;
use fieldops_db::models::user::CreateUser;
use fieldops_db::repositories::{ClientRepo, UserRepo};
use fieldops_notify::{OutgoingReport, ReportSender, SendError};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults and no ownership fallback.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        notify_timeout_secs: 2,
        ownership: OwnershipConfig::default(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Records every report it is asked to send and accepts them all.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<OutgoingReport>>,
}

impl RecordingSender {
    pub fn sent(&self) -> Vec<OutgoingReport> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportSender for RecordingSender {
    async fn send(&self, report: &OutgoingReport) -> Result<(), SendError> {
        self.sent.lock().unwrap().push(report.clone());
        Ok(())
    }
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config(), Arc::new(RecordingSender::default()))
}

/// Same as [`build_test_app`] with an explicit config and report sender.
pub fn build_test_app_with(
    pool: PgPool,
    config: ServerConfig,
    sender: Arc<dyn ReportSender>,
) -> Router {
    let state = AppState::new(pool, config.clone(), sender);
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Tokens and fixtures
// ---------------------------------------------------------------------------

pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

/// Create a supervisor user and return its id with a matching token.
pub async fn supervisor(pool: &PgPool) -> (DbId, String) {
    let id = create_user(pool, "Sofia", ROLE_SUPERVISOR).await;
    (id, token_for(id, ROLE_SUPERVISOR))
}

/// Create a technician user and return its id with a matching token.
pub async fn technician(pool: &PgPool, name: &str) -> (DbId, String) {
    let id = create_user(pool, name, ROLE_TECHNICIAN).await;
    (id, token_for(id, ROLE_TECHNICIAN))
}

pub async fn create_user(pool: &PgPool, name: &str, role: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            display_name: name.to_string(),
            email: Some(format!("{}@fieldops.test", name.to_lowercase())),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn create_client(
    pool: &PgPool,
    name: &str,
    department: Option<&str>,
    contact_email: Option<&str>,
) -> DbId {
    ClientRepo::create(
        pool,
        &CreateClient {
            name: name.to_string(),
            department: department.map(str::to_string),
            contact_email: contact_email.map(str::to_string),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}
