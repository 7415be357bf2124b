//! Domain model for a contract, the aggregate root owning tasks and rewards.
use chrono::{DateTime, Utc};
use shared::ContractStatus;

use super::reward::Reward;
use super::task::Task;
use super::user::User;

#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    pub id: String,
    pub title: String,
    pub description: String,
    pub parent_id: String,
    pub child_id: String,
    pub status: ContractStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contract {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// A contract joined with both parties and its live children
#[derive(Debug, Clone, PartialEq)]
pub struct ContractDetails {
    pub contract: Contract,
    pub parent: User,
    pub child: User,
    pub tasks: Vec<Task>,
    pub rewards: Vec<Reward>,
}
