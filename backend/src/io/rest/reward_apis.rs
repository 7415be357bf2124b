//! # REST API for Rewards

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{CreateRewardRequest, MessageResponse, StatusFilter, UpdateRewardRequest};
use tracing::info;

use crate::domain::identity::Identity;
use crate::io::rest::error::ApiError;
use crate::io::rest::extract::ApiJson;
use crate::io::rest::mappers::RewardMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rewards).post(create_reward))
        .route("/:id", get(get_reward).put(update_reward).delete(delete_reward))
}

pub async fn list_rewards(
    State(state): State<AppState>,
    identity: Identity,
    Query(filter): Query<StatusFilter>,
) -> impl IntoResponse {
    info!("GET /api/rewards - status: {:?}", filter.status);

    let query = match RewardMapper::to_list_query(filter) {
        Ok(query) => query,
        Err(e) => return ApiError::from(e).into_response(),
    };

    match state.reward_service.list(&identity, query).await {
        Ok(result) => (StatusCode::OK, Json(RewardMapper::to_list_response(result))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn create_reward(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(request): ApiJson<CreateRewardRequest>,
) -> impl IntoResponse {
    info!("POST /api/rewards - contract_id: {}", request.contract_id);

    let command = RewardMapper::to_create_command(request);
    match state.reward_service.create(&identity, command).await {
        Ok(record) => (StatusCode::CREATED, Json(RewardMapper::to_reward_response(record))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn get_reward(State(state): State<AppState>, identity: Identity, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/rewards/{}", id);

    match state.reward_service.get(&identity, &id).await {
        Ok(record) => (StatusCode::OK, Json(RewardMapper::to_reward_response(record))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn update_reward(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateRewardRequest>,
) -> impl IntoResponse {
    info!("PUT /api/rewards/{} - status: {:?}", id, request.status);

    let command = RewardMapper::to_update_command(request);
    match state.reward_service.update(&identity, &id, command).await {
        Ok(record) => (StatusCode::OK, Json(RewardMapper::to_reward_response(record))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn delete_reward(State(state): State<AppState>, identity: Identity, Path(id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/rewards/{}", id);

    match state.reward_service.delete(&identity, &id).await {
        Ok(()) => (StatusCode::OK, Json(MessageResponse { message: "reward deleted".to_string() })).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::io::rest::test_client::TestClient;
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use shared::{RewardResponse, RewardStatus};

    async fn create_reward(client: &TestClient, token: &str, contract_id: &str) -> String {
        let (status, body) = client
            .send(
                Method::POST,
                "/api/rewards",
                Some(token),
                Some(json!({"contract_id": contract_id, "title": "Movie night", "points_cost": 50})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create reward failed: {}", body);
        assert!(body["reward"]["expiry_date"].is_null());
        body["reward"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_claim_then_fulfil() {
        let client = TestClient::new().await;
        let (parent, _) = client.register("alice", "parent").await;
        let (child, child_id) = client.register("bob", "child").await;
        let contract_id = client.create_contract(&parent, &child_id).await;
        let reward_id = create_reward(&client, &parent, &contract_id).await;
        let uri = format!("/api/rewards/{}", reward_id);

        let (status, _) = client.send(Method::PUT, &uri, Some(&child), Some(json!({"status": "claimed"}))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = client.send(Method::PUT, &uri, Some(&child), Some(json!({"status": "completed"}))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = client.send(Method::PUT, &uri, Some(&parent), Some(json!({"status": "completed"}))).await;
        assert_eq!(status, StatusCode::OK);
        let fulfilled: RewardResponse = serde_json::from_value(body).unwrap();
        assert_eq!(fulfilled.reward.status, RewardStatus::Completed);

        let (status, _) = client.send(Method::PUT, &uri, Some(&child), Some(json!({"status": "claimed"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_null_expiry_clears_it() {
        let client = TestClient::new().await;
        let (parent, _) = client.register("alice", "parent").await;
        let (_, child_id) = client.register("bob", "child").await;
        let contract_id = client.create_contract(&parent, &child_id).await;
        let reward_id = create_reward(&client, &parent, &contract_id).await;
        let uri = format!("/api/rewards/{}", reward_id);

        let (status, body) = client
            .send(Method::PUT, &uri, Some(&parent), Some(json!({"expiry_date": "2025-07-01T00:00:00Z"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["reward"]["expiry_date"].is_string());

        let (_, body) = client.send(Method::PUT, &uri, Some(&parent), Some(json!({"points_cost": 40}))).await;
        assert!(body["reward"]["expiry_date"].is_string());

        let (status, body) = client.send(Method::PUT, &uri, Some(&parent), Some(json!({"expiry_date": null}))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["reward"]["expiry_date"].is_null());
    }

    #[tokio::test]
    async fn test_listing_and_visibility() {
        let client = TestClient::new().await;
        let (parent, _) = client.register("alice", "parent").await;
        let (child, child_id) = client.register("bob", "child").await;
        let (stranger, _) = client.register("dave", "child").await;
        let contract_id = client.create_contract(&parent, &child_id).await;
        let reward_id = create_reward(&client, &parent, &contract_id).await;

        let (status, body) = client.send(Method::GET, "/api/rewards?status=available", Some(&child), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["rewards"][0]["contract"]["id"], contract_id.as_str());

        let (_, body) = client.send(Method::GET, "/api/rewards?status=claimed", Some(&child), None).await;
        assert_eq!(body["total"], 0);

        let (status, _) = client.send(Method::GET, &format!("/api/rewards/{}", reward_id), Some(&stranger), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = client
            .send(Method::DELETE, &format!("/api/rewards/{}", reward_id), Some(&parent), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = client.send(Method::GET, "/api/rewards", Some(&child), None).await;
        assert_eq!(body["total"], 0);
    }
}
