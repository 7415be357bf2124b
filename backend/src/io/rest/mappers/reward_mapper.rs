use shared::{
    ContractSummary, CreateRewardRequest, Reward as SharedReward, RewardListResponse, RewardResponse, RewardStatus,
    StatusFilter, UpdateRewardRequest,
};

use crate::domain::commands::rewards::{CreateRewardCommand, RewardListQuery, RewardListResult, UpdateRewardCommand};
use crate::domain::errors::DomainResult;
use crate::domain::models::reward::{Reward as DomainReward, RewardRecord};
use crate::io::rest::mappers::ContractMapper;

pub struct RewardMapper;

impl RewardMapper {
    pub fn reward_to_dto(reward: DomainReward, contract: Option<ContractSummary>) -> SharedReward {
        SharedReward {
            id: reward.id,
            contract_id: reward.contract_id,
            title: reward.title,
            description: reward.description,
            status: reward.status,
            points_cost: reward.points_cost,
            expiry_date: reward.expiry_date,
            contract,
            created_at: reward.created_at,
            updated_at: reward.updated_at,
        }
    }

    pub fn to_dto(record: RewardRecord) -> SharedReward {
        let summary = ContractMapper::to_summary(&record.contract);
        Self::reward_to_dto(record.reward, Some(summary))
    }

    pub fn to_reward_response(record: RewardRecord) -> RewardResponse {
        RewardResponse { reward: Self::to_dto(record) }
    }

    pub fn to_list_response(result: RewardListResult) -> RewardListResponse {
        RewardListResponse {
            rewards: result.rewards.into_iter().map(Self::to_dto).collect(),
            total: result.total,
        }
    }

    pub fn to_list_query(filter: StatusFilter) -> DomainResult<RewardListQuery> {
        let status = match filter.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(value.parse::<RewardStatus>()?),
        };
        Ok(RewardListQuery { status })
    }

    pub fn to_create_command(request: CreateRewardRequest) -> CreateRewardCommand {
        CreateRewardCommand {
            contract_id: request.contract_id,
            title: request.title,
            description: request.description,
            points_cost: request.points_cost,
            expiry_date: request.expiry_date,
        }
    }

    pub fn to_update_command(request: UpdateRewardRequest) -> UpdateRewardCommand {
        UpdateRewardCommand {
            title: request.title,
            description: request.description,
            status: request.status,
            points_cost: request.points_cost,
            expiry_date: request.expiry_date,
        }
    }
}
