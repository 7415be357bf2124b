//! Domain-level command and query types.
//!
//! Services accept these instead of the public DTOs in the `shared` crate;
//! the REST layer maps one to the other. Update commands use `Option` per
//! field: `None` leaves the stored value untouched.

pub mod contracts {
    use chrono::{DateTime, Utc};
    use shared::ContractStatus;

    use crate::domain::models::contract::ContractDetails;

    #[derive(Debug, Clone)]
    pub struct CreateContractCommand {
        pub title: String,
        pub description: String,
        pub child_id: String,
        pub start_date: DateTime<Utc>,
        pub end_date: DateTime<Utc>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateContractCommand {
        pub title: Option<String>,
        pub description: Option<String>,
        pub status: Option<ContractStatus>,
        pub start_date: Option<DateTime<Utc>>,
        pub end_date: Option<DateTime<Utc>>,
    }

    impl UpdateContractCommand {
        /// Whether any field other than `status` is present
        pub fn touches_details(&self) -> bool {
            self.title.is_some()
                || self.description.is_some()
                || self.start_date.is_some()
                || self.end_date.is_some()
        }
    }

    #[derive(Debug, Clone)]
    pub struct ContractListResult {
        pub contracts: Vec<ContractDetails>,
        pub total: i64,
    }
}

pub mod tasks {
    use chrono::{DateTime, Utc};
    use shared::TaskStatus;

    use crate::domain::models::task::TaskRecord;

    #[derive(Debug, Clone)]
    pub struct CreateTaskCommand {
        pub contract_id: String,
        pub title: String,
        pub description: String,
        pub points: i64,
        pub due_date: DateTime<Utc>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateTaskCommand {
        pub title: Option<String>,
        pub description: Option<String>,
        pub status: Option<TaskStatus>,
        pub points: Option<i64>,
        pub due_date: Option<DateTime<Utc>>,
    }

    impl UpdateTaskCommand {
        pub fn touches_details(&self) -> bool {
            self.title.is_some() || self.description.is_some() || self.points.is_some() || self.due_date.is_some()
        }
    }

    #[derive(Debug, Clone, Default)]
    pub struct TaskListQuery {
        pub status: Option<TaskStatus>,
    }

    #[derive(Debug, Clone)]
    pub struct TaskListResult {
        pub tasks: Vec<TaskRecord>,
        pub total: i64,
    }
}

pub mod rewards {
    use chrono::{DateTime, Utc};
    use shared::RewardStatus;

    use crate::domain::models::reward::RewardRecord;

    #[derive(Debug, Clone)]
    pub struct CreateRewardCommand {
        pub contract_id: String,
        pub title: String,
        pub description: String,
        pub points_cost: i64,
        pub expiry_date: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateRewardCommand {
        pub title: Option<String>,
        pub description: Option<String>,
        pub status: Option<RewardStatus>,
        pub points_cost: Option<i64>,
        /// `Some(None)` clears the expiry
        pub expiry_date: Option<Option<DateTime<Utc>>>,
    }

    impl UpdateRewardCommand {
        pub fn touches_details(&self) -> bool {
            self.title.is_some()
                || self.description.is_some()
                || self.points_cost.is_some()
                || self.expiry_date.is_some()
        }
    }

    #[derive(Debug, Clone, Default)]
    pub struct RewardListQuery {
        pub status: Option<RewardStatus>,
    }

    #[derive(Debug, Clone)]
    pub struct RewardListResult {
        pub rewards: Vec<RewardRecord>,
        pub total: i64,
    }
}

pub mod accounts {
    use shared::Role;

    use crate::domain::models::user::User;

    #[derive(Debug, Clone)]
    pub struct RegisterCommand {
        pub username: String,
        pub email: String,
        pub password: String,
        pub role: Role,
    }

    #[derive(Debug, Clone)]
    pub struct LoginCommand {
        pub email: String,
        pub password: String,
    }

    /// Issued bearer token and the user it belongs to
    #[derive(Debug, Clone)]
    pub struct AuthResult {
        pub token: String,
        pub user: User,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateProfileCommand {
        pub username: Option<String>,
        pub email: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct ChangePasswordCommand {
        pub current_password: String,
        pub new_password: String,
    }
}
