//! Service wiring over a fresh in-memory database, shared by service tests.

use chrono::{Duration, Utc};
use shared::Role;

use crate::domain::account_service::AccountService;
use crate::domain::auth_service::AuthService;
use crate::domain::commands::accounts::RegisterCommand;
use crate::domain::commands::contracts::CreateContractCommand;
use crate::domain::contract_service::ContractService;
use crate::domain::identity::Identity;
use crate::domain::reward_service::RewardService;
use crate::domain::task_service::TaskService;
use crate::AppState;

pub(crate) struct TestWorld {
    pub auth: AuthService,
    pub accounts: AccountService,
    pub contracts: ContractService,
    pub tasks: TaskService,
    pub rewards: RewardService,
}

impl TestWorld {
    pub async fn new() -> Self {
        let state = AppState::for_tests().await;

        Self {
            auth: state.auth_service,
            accounts: state.account_service,
            contracts: state.contract_service,
            tasks: state.task_service,
            rewards: state.reward_service,
        }
    }

    /// Register a user and return its identity
    pub async fn user(&self, name: &str, role: Role) -> Identity {
        let result = self
            .auth
            .register(RegisterCommand {
                username: name.to_string(),
                email: format!("{}@x.com", name),
                password: "secret123".to_string(),
                role,
            })
            .await
            .expect("Failed to register user");
        Identity::new(result.user.id, role)
    }

    /// Active contract owned by `parent` for `child`, returning its id
    pub async fn contract(&self, parent: &Identity, child: &Identity) -> String {
        let now = Utc::now();
        self.contracts
            .create(
                parent,
                CreateContractCommand {
                    title: "Summer chores".to_string(),
                    description: String::new(),
                    child_id: child.subject_id.clone(),
                    start_date: now,
                    end_date: now + Duration::days(30),
                },
            )
            .await
            .expect("Failed to create contract")
            .contract
            .id
    }
}
