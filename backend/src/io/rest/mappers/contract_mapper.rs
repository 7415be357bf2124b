use shared::{
    Contract as SharedContract, ContractListResponse, ContractResponse, ContractSummary, CreateContractRequest,
    UpdateContractRequest,
};

use crate::domain::commands::contracts::{ContractListResult, CreateContractCommand, UpdateContractCommand};
use crate::domain::models::contract::{Contract as DomainContract, ContractDetails};
use crate::io::rest::mappers::{RewardMapper, TaskMapper, UserMapper};

/// Mapper between contract DTOs and the hydrated domain aggregate.
pub struct ContractMapper;

impl ContractMapper {
    pub fn to_dto(details: ContractDetails) -> SharedContract {
        let ContractDetails { contract, parent, child, tasks, rewards } = details;

        SharedContract {
            id: contract.id,
            title: contract.title,
            description: contract.description,
            parent_id: contract.parent_id,
            parent: UserMapper::to_dto(parent),
            child_id: contract.child_id,
            child: UserMapper::to_dto(child),
            status: contract.status,
            start_date: contract.start_date,
            end_date: contract.end_date,
            // Nested children omit the back-reference to this contract
            tasks: tasks.into_iter().map(|t| TaskMapper::task_to_dto(t, None)).collect(),
            rewards: rewards.into_iter().map(|r| RewardMapper::reward_to_dto(r, None)).collect(),
            created_at: contract.created_at,
            updated_at: contract.updated_at,
        }
    }

    pub fn to_summary(contract: &DomainContract) -> ContractSummary {
        ContractSummary {
            id: contract.id.clone(),
            title: contract.title.clone(),
            parent_id: contract.parent_id.clone(),
            child_id: contract.child_id.clone(),
            status: contract.status,
        }
    }

    pub fn to_contract_response(details: ContractDetails) -> ContractResponse {
        ContractResponse { contract: Self::to_dto(details) }
    }

    pub fn to_list_response(result: ContractListResult) -> ContractListResponse {
        ContractListResponse {
            contracts: result.contracts.into_iter().map(Self::to_dto).collect(),
            total: result.total,
        }
    }

    pub fn to_create_command(request: CreateContractRequest) -> CreateContractCommand {
        CreateContractCommand {
            title: request.title,
            description: request.description,
            child_id: request.child_id,
            start_date: request.start_date,
            end_date: request.end_date,
        }
    }

    pub fn to_update_command(request: UpdateContractRequest) -> UpdateContractCommand {
        UpdateContractCommand {
            title: request.title,
            description: request.description,
            status: request.status,
            start_date: request.start_date,
            end_date: request.end_date,
        }
    }
}
