//! # REST API for Registration and Login

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use shared::{LoginRequest, RegisterRequest};
use tracing::{info, warn};

use crate::io::rest::error::ApiError;
use crate::io::rest::extract::ApiJson;
use crate::io::rest::mappers::UserMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn register(State(state): State<AppState>, ApiJson(request): ApiJson<RegisterRequest>) -> impl IntoResponse {
    info!("POST /api/auth/register - username: {}, role: {}", request.username, request.role);

    let command = UserMapper::to_register_command(request);
    match state.auth_service.register(command).await {
        Ok(result) => (StatusCode::CREATED, Json(UserMapper::to_auth_response(result))).into_response(),
        Err(e) => {
            warn!("Registration failed: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn login(State(state): State<AppState>, ApiJson(request): ApiJson<LoginRequest>) -> impl IntoResponse {
    info!("POST /api/auth/login - email: {}", request.email);

    let command = UserMapper::to_login_command(request);
    match state.auth_service.login(command).await {
        Ok(result) => (StatusCode::OK, Json(UserMapper::to_auth_response(result))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::io::rest::test_client::TestClient;
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use shared::AuthResponse;

    #[tokio::test]
    async fn test_register_and_login() {
        let client = TestClient::new().await;

        let (status, body) = client
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({"username": "alice", "email": "a@x.com", "password": "secret123", "role": "parent"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let registered: AuthResponse = serde_json::from_value(body).unwrap();
        assert_eq!(registered.user.email, "a@x.com");
        assert!(!registered.token.is_empty());

        let (status, body) = client
            .send(Method::POST, "/api/auth/login", None, Some(json!({"email": "a@x.com", "password": "secret123"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["role"], "parent");
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_register_errors() {
        let client = TestClient::new().await;
        let alice = json!({"username": "alice", "email": "a@x.com", "password": "secret123", "role": "parent"});

        client.send(Method::POST, "/api/auth/register", None, Some(alice.clone())).await;
        let (status, body) = client.send(Method::POST, "/api/auth/register", None, Some(alice)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].is_string());

        let (status, _) = client
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({"username": "bob", "email": "b@x.com", "password": "123", "role": "child"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = client
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({"username": "bob", "email": "b@x.com", "password": "secret123", "role": "admin"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_bad_login_is_unauthorized() {
        let client = TestClient::new().await;
        let (status, body) = client
            .send(Method::POST, "/api/auth/login", None, Some(json!({"email": "x@x.com", "password": "whatever"})))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid email or password");
    }
}
