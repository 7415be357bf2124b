use chrono::Utc;
use shared::RewardStatus;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::rewards::{CreateRewardCommand, RewardListQuery, RewardListResult, UpdateRewardCommand};
use crate::domain::contract_service::validate_title;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::identity::Identity;
use crate::domain::lifecycle::{check_transition, ensure_contract_active, ensure_details_editable};
use crate::domain::models::reward::{Reward, RewardRecord};
use crate::domain::policy::{authorize, Action, ContractLink, Resource, Visibility};
use crate::domain::task_service::validate_points;
use crate::storage::traits::{ContractStorage, RewardStorage};

/// Service for rewards: the child claims, the parent confirms.
#[derive(Clone)]
pub struct RewardService {
    contracts: Arc<dyn ContractStorage>,
    rewards: Arc<dyn RewardStorage>,
}

impl RewardService {
    pub fn new(contracts: Arc<dyn ContractStorage>, rewards: Arc<dyn RewardStorage>) -> Self {
        Self { contracts, rewards }
    }

    pub async fn create(&self, identity: &Identity, command: CreateRewardCommand) -> DomainResult<RewardRecord> {
        info!("Creating reward on contract {}", command.contract_id);

        let contract = self.contracts.get_contract(&command.contract_id).await?;
        let link = ContractLink::resolve(identity, contract.as_ref());
        authorize(identity.role, Action::Create, Resource::Reward, link)
            .enforce_create_within_contract(Resource::Reward)?;
        let contract = contract.ok_or(DomainError::NotFound("contract"))?;

        let title = command.title.trim().to_string();
        validate_title(&title)?;
        validate_points(command.points_cost)?;
        ensure_contract_active(contract.status)?;

        let now = Utc::now();
        let reward = Reward {
            id: Reward::generate_id(),
            contract_id: contract.id.clone(),
            title,
            description: command.description,
            status: RewardStatus::Available,
            points_cost: command.points_cost,
            expiry_date: command.expiry_date,
            created_at: now,
            updated_at: now,
        };
        self.rewards.store_reward(&reward).await?;

        info!("Created reward {} (cost {})", reward.id, reward.points_cost);
        Ok(RewardRecord { reward, contract })
    }

    pub async fn list(&self, identity: &Identity, query: RewardListQuery) -> DomainResult<RewardListResult> {
        info!("Listing rewards for {} {} (status={:?})", identity.role, identity.subject_id, query.status);

        let scope = Visibility::of(identity);
        let rewards = self.rewards.list_rewards(&scope, query.status).await?;
        let total = self.rewards.count_rewards(&scope, query.status).await?;

        Ok(RewardListResult { rewards, total })
    }

    pub async fn get(&self, identity: &Identity, reward_id: &str) -> DomainResult<RewardRecord> {
        info!("Getting reward: {}", reward_id);
        self.load(identity, Action::Read, reward_id).await
    }

    pub async fn update(
        &self,
        identity: &Identity,
        reward_id: &str,
        command: UpdateRewardCommand,
    ) -> DomainResult<RewardRecord> {
        info!("Updating reward: {}", reward_id);

        let RewardRecord { mut reward, contract } = self.load(identity, Action::Update, reward_id).await?;
        ensure_contract_active(contract.status)?;

        if command.touches_details() {
            ensure_details_editable("reward", identity.role)?;
        }

        if let Some(title) = command.title {
            let title = title.trim().to_string();
            validate_title(&title)?;
            reward.title = title;
        }
        if let Some(description) = command.description {
            reward.description = description;
        }
        if let Some(points_cost) = command.points_cost {
            validate_points(points_cost)?;
            reward.points_cost = points_cost;
        }
        if let Some(expiry_date) = command.expiry_date {
            reward.expiry_date = expiry_date;
        }
        if let Some(status) = command.status {
            check_transition(reward.status, status, identity.role)?;
            info!("Reward {} status {} -> {}", reward.id, reward.status, status);
            reward.status = status;
        }

        reward.updated_at = Utc::now();
        self.rewards.update_reward(&reward).await?;

        Ok(RewardRecord { reward, contract })
    }

    pub async fn delete(&self, identity: &Identity, reward_id: &str) -> DomainResult<()> {
        info!("Deleting reward: {}", reward_id);

        let record = self.load(identity, Action::Delete, reward_id).await?;
        ensure_contract_active(record.contract.status)?;

        if !self.rewards.soft_delete_reward(reward_id, Utc::now()).await? {
            return Err(DomainError::NotFound("reward"));
        }

        info!("Deleted reward: {}", reward_id);
        Ok(())
    }

    async fn load(&self, identity: &Identity, action: Action, reward_id: &str) -> DomainResult<RewardRecord> {
        let record = self.rewards.get_reward(reward_id).await?;
        let link = ContractLink::resolve(identity, record.as_ref().map(|r| &r.contract));

        if let Err(err) = authorize(identity.role, action, Resource::Reward, link).enforce(action, Resource::Reward) {
            warn!("Reward {} denied to {}: {}", reward_id, identity.subject_id, err);
            return Err(err);
        }

        record.ok_or(DomainError::NotFound("reward"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::contracts::UpdateContractCommand;
    use crate::domain::lifecycle::LifecycleViolation;
    use crate::domain::test_support::TestWorld;
    use chrono::Duration;
    use shared::{ContractStatus, Role};

    fn create_command(contract_id: &str, points_cost: i64) -> CreateRewardCommand {
        CreateRewardCommand {
            contract_id: contract_id.to_string(),
            title: "Movie night".to_string(),
            description: String::new(),
            points_cost,
            expiry_date: None,
        }
    }

    fn set_status(status: RewardStatus) -> UpdateRewardCommand {
        UpdateRewardCommand { status: Some(status), ..Default::default() }
    }

    #[tokio::test]
    async fn test_claim_confirm_then_second_claim_fails() {
        let world = TestWorld::new().await;
        let a = world.user("a", Role::Parent).await;
        let b = world.user("b", Role::Child).await;
        let c1 = world.contract(&a, &b).await;

        let r1 = world.rewards.create(&a, create_command(&c1, 50)).await.unwrap().reward;
        assert_eq!(r1.status, RewardStatus::Available);
        assert_eq!(r1.points_cost, 50);

        let claimed = world.rewards.update(&b, &r1.id, set_status(RewardStatus::Claimed)).await.unwrap();
        assert_eq!(claimed.reward.status, RewardStatus::Claimed);

        let confirmed = world.rewards.update(&a, &r1.id, set_status(RewardStatus::Completed)).await.unwrap();
        assert_eq!(confirmed.reward.status, RewardStatus::Completed);

        let err = world.rewards.update(&b, &r1.id, set_status(RewardStatus::Claimed)).await.unwrap_err();
        assert!(matches!(err, DomainError::Lifecycle(LifecycleViolation::IllegalTransition { .. })));
    }

    #[tokio::test]
    async fn test_role_mismatches() {
        let world = TestWorld::new().await;
        let a = world.user("a", Role::Parent).await;
        let b = world.user("b", Role::Child).await;
        let c1 = world.contract(&a, &b).await;
        let r1 = world.rewards.create(&a, create_command(&c1, 10)).await.unwrap().reward;

        let err = world.rewards.update(&b, &r1.id, set_status(RewardStatus::Completed)).await.unwrap_err();
        assert!(matches!(err, DomainError::Lifecycle(ref v) if v.is_role_mismatch()));

        let err = world.rewards.update(&a, &r1.id, set_status(RewardStatus::Claimed)).await.unwrap_err();
        assert!(matches!(err, DomainError::Lifecycle(ref v) if v.is_role_mismatch()));

        let cheaper = UpdateRewardCommand { points_cost: Some(1), ..Default::default() };
        let err = world.rewards.update(&b, &r1.id, cheaper).await.unwrap_err();
        assert!(matches!(err, DomainError::Lifecycle(ref v) if v.is_role_mismatch()));

        assert!(matches!(world.rewards.create(&b, create_command(&c1, 1)).await, Err(DomainError::Forbidden(_))));
        assert!(matches!(world.rewards.delete(&b, &r1.id).await, Err(DomainError::Forbidden(_))));

        assert_eq!(world.rewards.get(&a, &r1.id).await.unwrap().reward.status, RewardStatus::Available);
    }

    #[tokio::test]
    async fn test_closed_contract_blocks_rewards() {
        let world = TestWorld::new().await;
        let a = world.user("a", Role::Parent).await;
        let b = world.user("b", Role::Child).await;
        let c1 = world.contract(&a, &b).await;
        let r1 = world.rewards.create(&a, create_command(&c1, 10)).await.unwrap().reward;

        world
            .contracts
            .update(&a, &c1, UpdateContractCommand { status: Some(ContractStatus::Completed), ..Default::default() })
            .await
            .unwrap();

        // The inactive contract wins over the parent's role mismatch
        let err = world.rewards.update(&a, &r1.id, set_status(RewardStatus::Claimed)).await.unwrap_err();
        assert!(matches!(err, DomainError::Lifecycle(LifecycleViolation::ContractNotActive)));

        let err = world.rewards.update(&b, &r1.id, set_status(RewardStatus::Claimed)).await.unwrap_err();
        assert!(matches!(err, DomainError::Lifecycle(LifecycleViolation::ContractNotActive)));

        let err = world.rewards.create(&a, create_command(&c1, 5)).await.unwrap_err();
        assert!(matches!(err, DomainError::Lifecycle(LifecycleViolation::ContractNotActive)));

        let err = world.rewards.delete(&a, &r1.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Lifecycle(LifecycleViolation::ContractNotActive)));
    }

    #[tokio::test]
    async fn test_parent_edits_details() {
        let world = TestWorld::new().await;
        let a = world.user("a", Role::Parent).await;
        let b = world.user("b", Role::Child).await;
        let c1 = world.contract(&a, &b).await;
        let r1 = world.rewards.create(&a, create_command(&c1, 10)).await.unwrap().reward;

        let expiry = Utc::now() + Duration::days(14);
        let update = UpdateRewardCommand {
            description: Some("Pick any film".to_string()),
            points_cost: Some(30),
            expiry_date: Some(Some(expiry)),
            ..Default::default()
        };
        let updated = world.rewards.update(&a, &r1.id, update).await.unwrap().reward;
        assert_eq!(updated.title, "Movie night");
        assert_eq!(updated.description, "Pick any film");
        assert_eq!(updated.points_cost, 30);
        assert!(updated.expiry_date.is_some());

        // Leaving the expiry out keeps it
        let retitled = UpdateRewardCommand { title: Some("Cinema".to_string()), ..Default::default() };
        let updated = world.rewards.update(&a, &r1.id, retitled).await.unwrap().reward;
        assert!(updated.expiry_date.is_some());

        let cleared = UpdateRewardCommand { expiry_date: Some(None), ..Default::default() };
        let updated = world.rewards.update(&a, &r1.id, cleared).await.unwrap().reward;
        assert!(updated.expiry_date.is_none());
        assert!(world.rewards.get(&b, &r1.id).await.unwrap().reward.expiry_date.is_none());

        let err = world
            .rewards
            .update(&a, &r1.id, UpdateRewardCommand { points_cost: Some(-5), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_visibility_and_listing() {
        let world = TestWorld::new().await;
        let a = world.user("a", Role::Parent).await;
        let b = world.user("b", Role::Child).await;
        let other = world.user("k", Role::Child).await;
        let c1 = world.contract(&a, &b).await;

        let first = world.rewards.create(&a, create_command(&c1, 10)).await.unwrap().reward;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = world.rewards.create(&a, create_command(&c1, 20)).await.unwrap().reward;
        world.rewards.update(&b, &first.id, set_status(RewardStatus::Claimed)).await.unwrap();

        let all = world.rewards.list(&b, RewardListQuery::default()).await.unwrap();
        assert_eq!(all.total, 2);
        assert_eq!(all.rewards[0].reward.id, second.id);

        let claimed = world
            .rewards
            .list(&a, RewardListQuery { status: Some(RewardStatus::Claimed) })
            .await
            .unwrap();
        assert_eq!(claimed.total, 1);
        assert_eq!(claimed.rewards[0].reward.id, first.id);

        assert_eq!(world.rewards.list(&other, RewardListQuery::default()).await.unwrap().total, 0);
        assert!(matches!(world.rewards.get(&other, &first.id).await, Err(DomainError::NotFound("reward"))));
    }

    #[tokio::test]
    async fn test_create_on_foreign_or_missing_contract() {
        let world = TestWorld::new().await;
        let a = world.user("a", Role::Parent).await;
        let b = world.user("b", Role::Child).await;
        let stranger = world.user("s", Role::Parent).await;
        let c1 = world.contract(&a, &b).await;

        let err = world.rewards.create(&stranger, create_command(&c1, 5)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound("contract")));
        assert_eq!(err.to_string(), "contract not found");

        let err = world.rewards.create(&a, create_command("no-such-contract", 5)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound("contract")));

        assert!(matches!(
            world.rewards.create(&b, create_command("no-such-contract", 5)).await,
            Err(DomainError::Forbidden(_))
        ));
        assert_eq!(world.rewards.list(&stranger, RewardListQuery::default()).await.unwrap().total, 0);
    }
}
