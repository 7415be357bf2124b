//! Domain model for a task attached to a contract.
use chrono::{DateTime, Utc};
use shared::TaskStatus;

use super::contract::Contract;

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub contract_id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub points: i64,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// A task together with the current state of its owning contract
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub task: Task,
    pub contract: Contract,
}
