//! # Contracts Backend
//!
//! HTTP service for parent/child contracts: a parent sets up a contract with
//! one child, attaches tasks (worth points) and rewards (costing points), and
//! both sides drive those items through their lifecycles.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST handlers, extractors, mappers)
//!     ↓
//! Domain Layer (services, policy, lifecycle)
//!     ↓
//! Storage Layer (SQLite repositories, unit of work)
//! ```
//!
//! Authorization and status-transition rules are pure functions in
//! [`domain::policy`] and [`domain::lifecycle`]; services combine them with
//! storage lookups.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use chrono::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{AccountService, AuthService, ContractService, RewardService, TaskService};
use crate::io::rest::{auth_apis, contract_apis, health, reward_apis, settings_apis, task_apis};
use crate::storage::repositories::{
    ContractRepository, RewardRepository, SessionRepository, TaskRepository, UserRepository,
};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub account_service: AccountService,
    pub contract_service: ContractService,
    pub task_service: TaskService,
    pub reward_service: RewardService,
}

impl AppState {
    /// Wire every service over one database connection
    pub fn new(db: DbConnection, session_ttl: Duration) -> Self {
        let users = Arc::new(UserRepository::new(db.clone()));
        let sessions = Arc::new(SessionRepository::new(db.clone()));
        let contracts = Arc::new(ContractRepository::new(db.clone()));
        let tasks = Arc::new(TaskRepository::new(db.clone()));
        let rewards = Arc::new(RewardRepository::new(db.clone()));

        Self {
            auth_service: AuthService::new(users.clone(), sessions, session_ttl),
            account_service: AccountService::new(db, users.clone()),
            contract_service: ContractService::new(users, contracts.clone(), tasks.clone(), rewards.clone()),
            task_service: TaskService::new(contracts.clone(), tasks),
            reward_service: RewardService::new(contracts, rewards),
        }
    }

    #[cfg(test)]
    pub(crate) async fn for_tests() -> Self {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        Self::new(db, Duration::hours(1))
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    info!("Setting up application state");
    Ok(AppState::new(db, config.session_ttl()))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Router {
    let allow_origin = match cors_origin.parse::<HeaderValue>() {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            warn!("Ignoring invalid CORS origin '{}'", cors_origin);
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .nest("/auth", auth_apis::router())
        .nest("/contracts", contract_apis::router())
        .nest("/tasks", task_apis::router())
        .nest("/rewards", reward_apis::router())
        .nest("/settings", settings_apis::router());

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
