//! Common test utilities for integration tests
//!
//! Each [`TestContext`] owns a fresh in-memory store and a router built over
//! it, so tests run in parallel without a database.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use orgauth_api::{
    app::{build_router, AppState},
    config::Config,
};
use orgauth_shared::store::{MemoryStore, Store};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Value of the `user` cookie set by this response, if any
    pub fn session_cookie(&self) -> Option<String> {
        self.set_cookie()?
            .split(';')
            .next()?
            .strip_prefix("user=")
            .map(str::to_string)
    }

    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
    }
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_env(&[])
    }

    /// Context whose configuration overrides the defaults with `overrides`
    pub fn with_env(overrides: &[(&str, &str)]) -> Self {
        let config = Config::from_lookup(|key| {
            if let Some((_, v)) = overrides.iter().find(|(k, _)| *k == key) {
                return Some(v.to_string());
            }
            match key {
                "DATABASE_URL" => Some("postgresql://unused/orgauth".to_string()),
                "JWT_SECRET" => Some(TEST_SECRET.to_string()),
                "API_PORT" => Some("0".to_string()),
                "CORS_ORIGINS" => Some("http://localhost:3000".to_string()),
                _ => None,
            }
        })
        .unwrap();

        let store = Arc::new(MemoryStore::new());
        let shared: Arc<dyn Store> = store.clone();
        let app = build_router(AppState::new(shared, config.clone()));

        Self { store, app, config }
    }

    /// Sends a request; `token` goes in the session cookie
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("user={}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.call(request).await
    }

    pub async fn call(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, None, token).await
    }

    pub async fn post(&self, uri: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.send(Method::POST, uri, Some(body), token).await
    }

    /// Registers `{first}@x.com` with password `password123`
    pub async fn register(&self, first_name: &str) -> TestResponse {
        self.post(
            "/auth/register",
            registration(first_name, &format!("{}@x.com", first_name.to_lowercase())),
            None,
        )
        .await
    }

    /// Registers a user and returns `(user_id, token)`
    pub async fn register_session(&self, first_name: &str) -> (String, String) {
        let response = self.register(first_name).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        let data = &response.body["data"];
        (
            data["user"]["userId"].as_str().unwrap().to_string(),
            data["accessToken"].as_str().unwrap().to_string(),
        )
    }
}

pub fn registration(first_name: &str, email: &str) -> Value {
    json!({
        "firstName": first_name,
        "lastName": "Doe",
        "email": email,
        "password": "password123",
        "phone": "0123456789"
    })
}
