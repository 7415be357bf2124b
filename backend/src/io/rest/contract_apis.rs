//! # REST API for Contracts

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{CreateContractRequest, MessageResponse, UpdateContractRequest};
use tracing::info;

use crate::domain::identity::Identity;
use crate::io::rest::error::ApiError;
use crate::io::rest::extract::ApiJson;
use crate::io::rest::mappers::ContractMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contracts).post(create_contract))
        .route("/:id", get(get_contract).put(update_contract).delete(delete_contract))
}

pub async fn list_contracts(State(state): State<AppState>, identity: Identity) -> impl IntoResponse {
    info!("GET /api/contracts");

    match state.contract_service.list(&identity).await {
        Ok(result) => (StatusCode::OK, Json(ContractMapper::to_list_response(result))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn create_contract(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(request): ApiJson<CreateContractRequest>,
) -> impl IntoResponse {
    info!("POST /api/contracts - child_id: {}", request.child_id);

    let command = ContractMapper::to_create_command(request);
    match state.contract_service.create(&identity, command).await {
        Ok(details) => (StatusCode::CREATED, Json(ContractMapper::to_contract_response(details))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn get_contract(State(state): State<AppState>, identity: Identity, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/contracts/{}", id);

    match state.contract_service.get(&identity, &id).await {
        Ok(details) => (StatusCode::OK, Json(ContractMapper::to_contract_response(details))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn update_contract(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateContractRequest>,
) -> impl IntoResponse {
    info!("PUT /api/contracts/{}", id);

    let command = ContractMapper::to_update_command(request);
    match state.contract_service.update(&identity, &id, command).await {
        Ok(details) => (StatusCode::OK, Json(ContractMapper::to_contract_response(details))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn delete_contract(State(state): State<AppState>, identity: Identity, Path(id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/contracts/{}", id);

    match state.contract_service.delete(&identity, &id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse { message: "contract deleted".to_string() }),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
