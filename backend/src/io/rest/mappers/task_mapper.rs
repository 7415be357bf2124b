use shared::{
    ContractSummary, CreateTaskRequest, StatusFilter, Task as SharedTask, TaskListResponse, TaskResponse, TaskStatus,
    UpdateTaskRequest,
};

use crate::domain::commands::tasks::{CreateTaskCommand, TaskListQuery, TaskListResult, UpdateTaskCommand};
use crate::domain::errors::DomainResult;
use crate::domain::models::task::{Task as DomainTask, TaskRecord};
use crate::io::rest::mappers::ContractMapper;

pub struct TaskMapper;

impl TaskMapper {
    pub fn task_to_dto(task: DomainTask, contract: Option<ContractSummary>) -> SharedTask {
        SharedTask {
            id: task.id,
            contract_id: task.contract_id,
            title: task.title,
            description: task.description,
            status: task.status,
            points: task.points,
            due_date: task.due_date,
            contract,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }

    /// Top-level tasks carry a summary of their contract
    pub fn to_dto(record: TaskRecord) -> SharedTask {
        let summary = ContractMapper::to_summary(&record.contract);
        Self::task_to_dto(record.task, Some(summary))
    }

    pub fn to_task_response(record: TaskRecord) -> TaskResponse {
        TaskResponse { task: Self::to_dto(record) }
    }

    pub fn to_list_response(result: TaskListResult) -> TaskListResponse {
        TaskListResponse {
            tasks: result.tasks.into_iter().map(Self::to_dto).collect(),
            total: result.total,
        }
    }

    /// An empty `?status=` is treated as no filter
    pub fn to_list_query(filter: StatusFilter) -> DomainResult<TaskListQuery> {
        let status = match filter.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(value.parse::<TaskStatus>()?),
        };
        Ok(TaskListQuery { status })
    }

    pub fn to_create_command(request: CreateTaskRequest) -> CreateTaskCommand {
        CreateTaskCommand {
            contract_id: request.contract_id,
            title: request.title,
            description: request.description,
            points: request.points,
            due_date: request.due_date,
        }
    }

    pub fn to_update_command(request: UpdateTaskRequest) -> UpdateTaskCommand {
        UpdateTaskCommand {
            title: request.title,
            description: request.description,
            status: request.status,
            points: request.points,
            due_date: request.due_date,
        }
    }
}
