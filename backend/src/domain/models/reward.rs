//! Domain model for a reward attached to a contract.
use chrono::{DateTime, Utc};
use shared::RewardStatus;

use super::contract::Contract;

#[derive(Debug, Clone, PartialEq)]
pub struct Reward {
    pub id: String,
    pub contract_id: String,
    pub title: String,
    pub description: String,
    pub status: RewardStatus,
    pub points_cost: i64,
    pub expiry_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reward {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// A reward together with the current state of its owning contract
#[derive(Debug, Clone, PartialEq)]
pub struct RewardRecord {
    pub reward: Reward,
    pub contract: Contract,
}
