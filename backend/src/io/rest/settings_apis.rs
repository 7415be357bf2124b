//! # REST API for Account Settings
//!
//! Profile reads and edits, password changes and account closure for the
//! authenticated user.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, put},
    Router,
};
use shared::{MessageResponse, UpdatePasswordRequest, UpdateProfileRequest};
use tracing::info;

use crate::domain::identity::Identity;
use crate::io::rest::error::ApiError;
use crate::io::rest::extract::ApiJson;
use crate::io::rest::mappers::UserMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/password", put(change_password))
        .route("/account", delete(delete_account))
}

pub async fn get_profile(State(state): State<AppState>, identity: Identity) -> impl IntoResponse {
    info!("GET /api/settings/profile");

    match state.account_service.profile(&identity).await {
        Ok(user) => (StatusCode::OK, Json(UserMapper::to_user_response(user))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn update_profile(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> impl IntoResponse {
    info!("PUT /api/settings/profile");

    let command = UserMapper::to_update_profile_command(request);
    match state.account_service.update_profile(&identity, command).await {
        Ok(user) => (StatusCode::OK, Json(UserMapper::to_user_response(user))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn change_password(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(request): ApiJson<UpdatePasswordRequest>,
) -> impl IntoResponse {
    info!("PUT /api/settings/password");

    let command = UserMapper::to_change_password_command(request);
    match state.account_service.change_password(&identity, command).await {
        Ok(()) => (StatusCode::OK, Json(MessageResponse { message: "password updated".to_string() })).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn delete_account(State(state): State<AppState>, identity: Identity) -> impl IntoResponse {
    info!("DELETE /api/settings/account");

    match state.account_service.delete_account(&identity).await {
        Ok(()) => (StatusCode::OK, Json(MessageResponse { message: "account deleted".to_string() })).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
