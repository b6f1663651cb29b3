//! Test utilities and common setup.
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, header};
use axum::{Router, body::to_bytes};
use serde_json::Value;

use mentora::api::{AppState, create_router};
use mentora::auth::{AuthConfig, AuthState};
use mentora::db::Database;
use mentora::tutor::{TutorBackend, TutorTurn};
use mentora::user::{NewUser, User};

pub const TEST_JWT_SECRET: &str = "test-secret-for-integration-tests-minimum-32-chars";

/// Tutor backend that replies with a canned line instead of calling a provider.
pub struct ScriptedTutorBackend {
    pub reply: String,
}

#[async_trait]
impl TutorBackend for ScriptedTutorBackend {
    async fn reply(&self, _history: &[TutorTurn]) -> Result<String> {
        Ok(self.reply.clone())
    }
}

/// Tutor backend that always fails, for provider-outage tests.
pub struct FailingTutorBackend;

#[async_trait]
impl TutorBackend for FailingTutorBackend {
    async fn reply(&self, _history: &[TutorTurn]) -> Result<String> {
        anyhow::bail!("provider unreachable")
    }
}

fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: Some(TEST_JWT_SECRET.to_string()),
        ..AuthConfig::default()
    }
}

/// Router plus the state behind it, so tests can seed data directly.
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.app.clone()
    }
}

/// Create a test application with an in-memory database and a scripted tutor.
pub async fn test_app() -> TestApp {
    test_app_with_backend(Arc::new(ScriptedTutorBackend {
        reply: "Let's work through that together.".to_string(),
    }))
    .await
}

pub async fn test_app_with_backend(backend: Arc<dyn TutorBackend>) -> TestApp {
    let db = Database::in_memory().await.expect("create test database");
    let auth = AuthState::new(test_auth_config()).expect("build auth state");
    let state = AppState::new(db, auth, backend, vec!["http://localhost:3000".to_string()]);
    let app = create_router(state.clone());

    TestApp { app, state }
}

/// Insert a user directly and issue a token for them.
pub async fn seed_user(state: &AppState, username: &str, role: &str) -> (User, String) {
    // Low bcrypt cost keeps the test suite fast
    let password_hash = bcrypt::hash("password123", 4).expect("hash password");

    let user = state
        .users
        .create(NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash,
            display_name: username.to_string(),
            role: role.to_string(),
        })
        .await
        .expect("create user")
        .expect("test user is unique");

    let token = state
        .auth
        .issue_token(&user.id, &user.role)
        .expect("issue token");

    (user, token)
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request(Method::GET, uri, token, None)
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    request(Method::DELETE, uri, token, None)
}

pub fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    request(Method::POST, uri, token, Some(body))
}

pub fn put_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    request(Method::PUT, uri, token, Some(body))
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method(method);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_string(&json).unwrap())
        }
        None => Body::empty(),
    };

    builder.body(body).unwrap()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("parse response body as JSON")
}
