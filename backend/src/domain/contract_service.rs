//! # Contract Service
//!
//! Orchestrates the authorization policy, the lifecycle rules and storage
//! for the contract aggregate. Every contract returned is hydrated with both
//! parties and its live tasks and rewards.

use anyhow::anyhow;
use chrono::Utc;
use shared::{ContractStatus, Role};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::contracts::{ContractListResult, CreateContractCommand, UpdateContractCommand};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::identity::Identity;
use crate::domain::lifecycle::{check_transition, ensure_details_editable};
use crate::domain::models::contract::{Contract, ContractDetails};
use crate::domain::models::user::User;
use crate::domain::policy::{authorize, Action, ContractLink, Resource, Visibility};
use crate::storage::traits::{ContractStorage, RewardStorage, TaskStorage, UserStorage};

#[derive(Clone)]
pub struct ContractService {
    users: Arc<dyn UserStorage>,
    contracts: Arc<dyn ContractStorage>,
    tasks: Arc<dyn TaskStorage>,
    rewards: Arc<dyn RewardStorage>,
}

impl ContractService {
    pub fn new(
        users: Arc<dyn UserStorage>,
        contracts: Arc<dyn ContractStorage>,
        tasks: Arc<dyn TaskStorage>,
        rewards: Arc<dyn RewardStorage>,
    ) -> Self {
        Self { users, contracts, tasks, rewards }
    }

    pub async fn create(&self, identity: &Identity, command: CreateContractCommand) -> DomainResult<ContractDetails> {
        info!("Creating contract for child {} by {}", command.child_id, identity.subject_id);

        authorize(identity.role, Action::Create, Resource::Contract, ContractLink::Missing)
            .enforce(Action::Create, Resource::Contract)?;

        let title = command.title.trim().to_string();
        validate_title(&title)?;
        if command.end_date < command.start_date {
            return Err(DomainError::validation("end date cannot be before start date"));
        }

        let child = match self.users.get_user(&command.child_id).await? {
            Some(user) if user.role == Role::Child => user,
            _ => {
                warn!("Contract child not found or not a child: {}", command.child_id);
                return Err(DomainError::NotFound("child"));
            }
        };
        let parent = self.require_user(&identity.subject_id).await?;

        let now = Utc::now();
        let contract = Contract {
            id: Contract::generate_id(),
            title,
            description: command.description,
            parent_id: parent.id.clone(),
            child_id: child.id.clone(),
            status: ContractStatus::Active,
            start_date: command.start_date,
            end_date: command.end_date,
            created_at: now,
            updated_at: now,
        };
        self.contracts.store_contract(&contract).await?;

        info!("Created contract {} ({})", contract.id, contract.title);

        Ok(ContractDetails {
            contract,
            parent,
            child,
            tasks: Vec::new(),
            rewards: Vec::new(),
        })
    }

    pub async fn list(&self, identity: &Identity) -> DomainResult<ContractListResult> {
        info!("Listing contracts for {} {}", identity.role, identity.subject_id);

        let scope = Visibility::of(identity);
        let contracts = self.contracts.list_contracts(&scope).await?;
        let total = self.contracts.count_contracts(&scope).await?;

        let mut hydrated = Vec::with_capacity(contracts.len());
        for contract in contracts {
            hydrated.push(self.hydrate(contract).await?);
        }

        info!("Found {} contracts", hydrated.len());
        Ok(ContractListResult { contracts: hydrated, total })
    }

    pub async fn get(&self, identity: &Identity, contract_id: &str) -> DomainResult<ContractDetails> {
        info!("Getting contract: {}", contract_id);
        let contract = self.load(identity, Action::Read, contract_id).await?;
        self.hydrate(contract).await
    }

    pub async fn update(
        &self,
        identity: &Identity,
        contract_id: &str,
        command: UpdateContractCommand,
    ) -> DomainResult<ContractDetails> {
        info!("Updating contract: {}", contract_id);

        let mut contract = self.load(identity, Action::Update, contract_id).await?;

        if command.touches_details() {
            ensure_details_editable("contract", identity.role)?;
        }

        if let Some(title) = command.title {
            let title = title.trim().to_string();
            validate_title(&title)?;
            contract.title = title;
        }
        if let Some(description) = command.description {
            contract.description = description;
        }
        if let Some(start_date) = command.start_date {
            contract.start_date = start_date;
        }
        if let Some(end_date) = command.end_date {
            contract.end_date = end_date;
        }
        if contract.end_date < contract.start_date {
            return Err(DomainError::validation("end date cannot be before start date"));
        }

        if let Some(status) = command.status {
            check_transition(contract.status, status, identity.role)?;
            if status != contract.status {
                info!("Contract {} status {} -> {}", contract.id, contract.status, status);
            }
            contract.status = status;
        }

        contract.updated_at = Utc::now();
        self.contracts.update_contract(&contract).await?;

        self.hydrate(contract).await
    }

    pub async fn delete(&self, identity: &Identity, contract_id: &str) -> DomainResult<()> {
        info!("Deleting contract: {}", contract_id);

        self.load(identity, Action::Delete, contract_id).await?;

        if !self.contracts.soft_delete_contract(contract_id, Utc::now()).await? {
            return Err(DomainError::NotFound("contract"));
        }

        info!("Deleted contract: {}", contract_id);
        Ok(())
    }

    /// Fetch a live contract and check the caller may perform `action` on it
    async fn load(&self, identity: &Identity, action: Action, contract_id: &str) -> DomainResult<Contract> {
        let contract = self.contracts.get_contract(contract_id).await?;
        let link = ContractLink::resolve(identity, contract.as_ref());

        if let Err(err) = authorize(identity.role, action, Resource::Contract, link).enforce(action, Resource::Contract) {
            warn!("Contract {} denied to {}: {}", contract_id, identity.subject_id, err);
            return Err(err);
        }

        contract.ok_or(DomainError::NotFound("contract"))
    }

    async fn hydrate(&self, contract: Contract) -> DomainResult<ContractDetails> {
        let parent = self.require_user(&contract.parent_id).await?;
        let child = self.require_user(&contract.child_id).await?;
        let tasks = self.tasks.list_contract_tasks(&contract.id).await?;
        let rewards = self.rewards.list_contract_rewards(&contract.id).await?;

        Ok(ContractDetails { contract, parent, child, tasks, rewards })
    }

    async fn require_user(&self, user_id: &str) -> DomainResult<User> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::Internal(anyhow!("contract party {} is missing", user_id)))
    }
}

pub(crate) fn validate_title(title: &str) -> DomainResult<()> {
    if title.is_empty() {
        return Err(DomainError::validation("title cannot be empty"));
    }
    if title.chars().count() > 200 {
        return Err(DomainError::validation("title cannot exceed 200 characters"));
    }
    Ok(())
}
