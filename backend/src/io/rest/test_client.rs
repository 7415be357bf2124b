//! Router-level test helper: a full app over a fresh in-memory database.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use crate::{create_router, AppState};

pub(crate) struct TestClient {
    app: Router,
}

impl TestClient {
    pub async fn new() -> Self {
        let state = AppState::for_tests().await;
        Self { app: create_router(state, "http://localhost:8080") }
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
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

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, value)
    }

    /// Register a user and return `(token, user_id)`
    pub async fn register(&self, name: &str, role: &str) -> (String, String) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "username": name,
                    "email": format!("{}@x.com", name),
                    "password": "secret123",
                    "role": role,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    /// Create an active 30-day contract and return its id
    pub async fn create_contract(&self, parent_token: &str, child_id: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/contracts",
                Some(parent_token),
                Some(json!({
                    "title": "Summer chores",
                    "child_id": child_id,
                    "start_date": "2025-06-01T00:00:00Z",
                    "end_date": "2025-07-01T00:00:00Z",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create contract failed: {}", body);
        body["contract"]["id"].as_str().unwrap().to_string()
    }
}
