//! # Storage Traits
//!
//! Repository abstractions the domain services depend on. Every read
//! excludes soft-deleted rows, and every task/reward read also excludes rows
//! whose owning contract is soft-deleted.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{RewardStatus, TaskStatus};

use crate::domain::models::contract::Contract;
use crate::domain::models::reward::{Reward, RewardRecord};
use crate::domain::models::task::{Task, TaskRecord};
use crate::domain::models::user::{PasswordCredentials, User};
use crate::domain::policy::Visibility;

#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Store a new user with its password credentials
    async fn store_user(&self, user: &User, credentials: &PasswordCredentials) -> Result<()>;

    /// Retrieve a live user by ID
    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Retrieve a live user and its credentials by email, for login
    async fn find_user_by_email(&self, email: &str) -> Result<Option<(User, PasswordCredentials)>>;

    /// Retrieve the credentials of a live user
    async fn get_credentials(&self, user_id: &str) -> Result<Option<PasswordCredentials>>;

    /// Whether any user, deleted or not, other than `except_id` holds this username
    async fn username_taken(&self, username: &str, except_id: Option<&str>) -> Result<bool>;

    /// Whether any user, deleted or not, other than `except_id` holds this email
    async fn email_taken(&self, email: &str, except_id: Option<&str>) -> Result<bool>;

    /// Persist username, email and `updated_at`
    async fn update_profile(&self, user: &User) -> Result<()>;

    async fn update_credentials(
        &self,
        user_id: &str,
        credentials: &PasswordCredentials,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;
}

#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn store_session(
        &self,
        token_hash: &str,
        user_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Resolve an unexpired session to its live user
    async fn find_session_user(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<User>>;
}

#[async_trait]
pub trait ContractStorage: Send + Sync {
    async fn store_contract(&self, contract: &Contract) -> Result<()>;

    /// Retrieve a live contract by ID regardless of who asks
    async fn get_contract(&self, contract_id: &str) -> Result<Option<Contract>>;

    /// Live contracts within the visibility scope, newest first
    async fn list_contracts(&self, scope: &Visibility) -> Result<Vec<Contract>>;

    async fn count_contracts(&self, scope: &Visibility) -> Result<i64>;

    async fn update_contract(&self, contract: &Contract) -> Result<()>;

    /// Returns false when no live contract had that ID
    async fn soft_delete_contract(&self, contract_id: &str, at: DateTime<Utc>) -> Result<bool>;
}

#[async_trait]
pub trait TaskStorage: Send + Sync {
    async fn store_task(&self, task: &Task) -> Result<()>;

    /// Retrieve a live task joined with its live contract
    async fn get_task(&self, task_id: &str) -> Result<Option<TaskRecord>>;

    /// Live tasks within the visibility scope, earliest due date first
    async fn list_tasks(&self, scope: &Visibility, status: Option<TaskStatus>) -> Result<Vec<TaskRecord>>;

    async fn count_tasks(&self, scope: &Visibility, status: Option<TaskStatus>) -> Result<i64>;

    /// Live tasks of one contract, earliest due date first
    async fn list_contract_tasks(&self, contract_id: &str) -> Result<Vec<Task>>;

    async fn update_task(&self, task: &Task) -> Result<()>;

    async fn soft_delete_task(&self, task_id: &str, at: DateTime<Utc>) -> Result<bool>;
}

#[async_trait]
pub trait RewardStorage: Send + Sync {
    async fn store_reward(&self, reward: &Reward) -> Result<()>;

    /// Retrieve a live reward joined with its live contract
    async fn get_reward(&self, reward_id: &str) -> Result<Option<RewardRecord>>;

    /// Live rewards within the visibility scope, newest first
    async fn list_rewards(&self, scope: &Visibility, status: Option<RewardStatus>) -> Result<Vec<RewardRecord>>;

    async fn count_rewards(&self, scope: &Visibility, status: Option<RewardStatus>) -> Result<i64>;

    /// Live rewards of one contract, newest first
    async fn list_contract_rewards(&self, contract_id: &str) -> Result<Vec<Reward>>;

    async fn update_reward(&self, reward: &Reward) -> Result<()>;

    async fn soft_delete_reward(&self, reward_id: &str, at: DateTime<Utc>) -> Result<bool>;
}
