//! # Domain Module
//!
//! Business rules for parent/child contracts, independent of HTTP and of
//! the storage engine.
//!
//! ## Module Organization
//!
//! - **policy**: who may create, read, update or delete each entity
//! - **lifecycle**: legal status transitions per role, plus the
//!   "owning contract must be active" gate
//! - **contract_service / task_service / reward_service**: orchestration of
//!   policy, lifecycle and storage per entity
//! - **auth_service / account_service**: registration, login, token
//!   resolution, profile settings and account closure
//!
//! ## Business Rules
//!
//! - A contract links exactly one parent and one child
//! - Tasks and rewards can only change while their contract is active
//! - Resources outside the caller's family are reported as not found

pub mod account_service;
pub mod auth_service;
pub mod commands;
pub mod contract_service;
pub mod credentials;
pub mod errors;
pub mod identity;
pub mod lifecycle;
pub mod models;
pub mod policy;
pub mod reward_service;
pub mod task_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use account_service::AccountService;
pub use auth_service::AuthService;
pub use contract_service::ContractService;
pub use errors::{DomainError, DomainResult};
pub use identity::Identity;
pub use reward_service::RewardService;
pub use task_service::TaskService;
