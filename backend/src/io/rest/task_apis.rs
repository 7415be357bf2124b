//! # REST API for Tasks
//!
//! Listing is scoped to the caller's contracts and can be narrowed with
//! `?status=pending|completed|failed`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{CreateTaskRequest, MessageResponse, StatusFilter, UpdateTaskRequest};
use tracing::info;

use crate::domain::identity::Identity;
use crate::io::rest::error::ApiError;
use crate::io::rest::extract::ApiJson;
use crate::io::rest::mappers::TaskMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/:id", get(get_task).put(update_task).delete(delete_task))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    identity: Identity,
    Query(filter): Query<StatusFilter>,
) -> impl IntoResponse {
    info!("GET /api/tasks - status: {:?}", filter.status);

    let query = match TaskMapper::to_list_query(filter) {
        Ok(query) => query,
        Err(e) => return ApiError::from(e).into_response(),
    };

    match state.task_service.list(&identity, query).await {
        Ok(result) => (StatusCode::OK, Json(TaskMapper::to_list_response(result))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn create_task(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(request): ApiJson<CreateTaskRequest>,
) -> impl IntoResponse {
    info!("POST /api/tasks - contract_id: {}", request.contract_id);

    let command = TaskMapper::to_create_command(request);
    match state.task_service.create(&identity, command).await {
        Ok(record) => (StatusCode::CREATED, Json(TaskMapper::to_task_response(record))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn get_task(State(state): State<AppState>, identity: Identity, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/tasks/{}", id);

    match state.task_service.get(&identity, &id).await {
        Ok(record) => (StatusCode::OK, Json(TaskMapper::to_task_response(record))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn update_task(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateTaskRequest>,
) -> impl IntoResponse {
    info!("PUT /api/tasks/{} - status: {:?}", id, request.status);

    let command = TaskMapper::to_update_command(request);
    match state.task_service.update(&identity, &id, command).await {
        Ok(record) => (StatusCode::OK, Json(TaskMapper::to_task_response(record))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn delete_task(State(state): State<AppState>, identity: Identity, Path(id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/tasks/{}", id);

    match state.task_service.delete(&identity, &id).await {
        Ok(()) => (StatusCode::OK, Json(MessageResponse { message: "task deleted".to_string() })).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
