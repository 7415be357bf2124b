//! # REST API Interface Layer
//!
//! HTTP endpoints for accounts, contracts, tasks and rewards. Handlers are a
//! thin translation layer: they extract the caller's [`Identity`] from the
//! bearer token, map request DTOs into domain commands, call one service and
//! map the result (or [`ApiError`]) back into JSON.
//!
//! Every route except `/health` and `/api/auth/*` requires
//! `Authorization: Bearer <token>`.
//!
//! [`Identity`]: crate::domain::identity::Identity
//! [`ApiError`]: error::ApiError

pub mod auth_apis;
pub mod contract_apis;
pub mod error;
pub mod extract;
pub mod health;
pub mod mappers;
pub mod reward_apis;
pub mod settings_apis;
pub mod task_apis;

#[cfg(test)]
pub(crate) mod test_client;
