use chrono::Utc;
use shared::TaskStatus;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::tasks::{CreateTaskCommand, TaskListQuery, TaskListResult, UpdateTaskCommand};
use crate::domain::contract_service::validate_title;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::identity::Identity;
use crate::domain::lifecycle::{check_transition, ensure_contract_active, ensure_details_editable};
use crate::domain::models::task::{Task, TaskRecord};
use crate::domain::policy::{authorize, Action, ContractLink, Resource, Visibility};
use crate::storage::traits::{ContractStorage, TaskStorage};

/// Service for tasks. The owning contract is re-read on every call.
#[derive(Clone)]
pub struct TaskService {
    contracts: Arc<dyn ContractStorage>,
    tasks: Arc<dyn TaskStorage>,
}

impl TaskService {
    pub fn new(contracts: Arc<dyn ContractStorage>, tasks: Arc<dyn TaskStorage>) -> Self {
        Self { contracts, tasks }
    }

    pub async fn create(&self, identity: &Identity, command: CreateTaskCommand) -> DomainResult<TaskRecord> {
        info!("Creating task on contract {}", command.contract_id);

        let contract = self.contracts.get_contract(&command.contract_id).await?;
        let link = ContractLink::resolve(identity, contract.as_ref());
        authorize(identity.role, Action::Create, Resource::Task, link)
            .enforce_create_within_contract(Resource::Task)?;
        let contract = contract.ok_or(DomainError::NotFound("contract"))?;

        let title = command.title.trim().to_string();
        validate_title(&title)?;
        validate_points(command.points)?;
        ensure_contract_active(contract.status)?;

        let now = Utc::now();
        let task = Task {
            id: Task::generate_id(),
            contract_id: contract.id.clone(),
            title,
            description: command.description,
            status: TaskStatus::Pending,
            points: command.points,
            due_date: command.due_date,
            created_at: now,
            updated_at: now,
        };
        self.tasks.store_task(&task).await?;

        info!("Created task {} ({} points)", task.id, task.points);
        Ok(TaskRecord { task, contract })
    }

    pub async fn list(&self, identity: &Identity, query: TaskListQuery) -> DomainResult<TaskListResult> {
        info!("Listing tasks for {} {} (status={:?})", identity.role, identity.subject_id, query.status);

        let scope = Visibility::of(identity);
        let tasks = self.tasks.list_tasks(&scope, query.status).await?;
        let total = self.tasks.count_tasks(&scope, query.status).await?;

        Ok(TaskListResult { tasks, total })
    }

    pub async fn get(&self, identity: &Identity, task_id: &str) -> DomainResult<TaskRecord> {
        info!("Getting task: {}", task_id);
        self.load(identity, Action::Read, task_id).await
    }

    pub async fn update(&self, identity: &Identity, task_id: &str, command: UpdateTaskCommand) -> DomainResult<TaskRecord> {
        info!("Updating task: {}", task_id);

        let TaskRecord { mut task, contract } = self.load(identity, Action::Update, task_id).await?;
        ensure_contract_active(contract.status)?;

        if command.touches_details() {
            ensure_details_editable("task", identity.role)?;
        }

        if let Some(title) = command.title {
            let title = title.trim().to_string();
            validate_title(&title)?;
            task.title = title;
        }
        if let Some(description) = command.description {
            task.description = description;
        }
        if let Some(points) = command.points {
            validate_points(points)?;
            task.points = points;
        }
        if let Some(due_date) = command.due_date {
            task.due_date = due_date;
        }
        if let Some(status) = command.status {
            check_transition(task.status, status, identity.role)?;
            if status != task.status {
                info!("Task {} status {} -> {}", task.id, task.status, status);
            }
            task.status = status;
        }

        task.updated_at = Utc::now();
        self.tasks.update_task(&task).await?;

        Ok(TaskRecord { task, contract })
    }

    pub async fn delete(&self, identity: &Identity, task_id: &str) -> DomainResult<()> {
        info!("Deleting task: {}", task_id);

        let record = self.load(identity, Action::Delete, task_id).await?;
        ensure_contract_active(record.contract.status)?;

        if !self.tasks.soft_delete_task(task_id, Utc::now()).await? {
            return Err(DomainError::NotFound("task"));
        }

        info!("Deleted task: {}", task_id);
        Ok(())
    }

    async fn load(&self, identity: &Identity, action: Action, task_id: &str) -> DomainResult<TaskRecord> {
        let record = self.tasks.get_task(task_id).await?;
        let link = ContractLink::resolve(identity, record.as_ref().map(|r| &r.contract));

        if let Err(err) = authorize(identity.role, action, Resource::Task, link).enforce(action, Resource::Task) {
            warn!("Task {} denied to {}: {}", task_id, identity.subject_id, err);
            return Err(err);
        }

        record.ok_or(DomainError::NotFound("task"))
    }
}

pub(crate) fn validate_points(points: i64) -> DomainResult<()> {
    if points < 0 {
        return Err(DomainError::validation("points cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::contracts::UpdateContractCommand;
    use crate::domain::lifecycle::LifecycleViolation;
    use crate::domain::test_support::TestWorld;
    use chrono::Duration;
    use shared::{ContractStatus, Role};

    fn create_command(contract_id: &str, title: &str, points: i64) -> CreateTaskCommand {
        CreateTaskCommand {
            contract_id: contract_id.to_string(),
            title: title.to_string(),
            description: String::new(),
            points,
            due_date: Utc::now() + Duration::days(3),
        }
    }

    fn set_status(status: TaskStatus) -> UpdateTaskCommand {
        UpdateTaskCommand { status: Some(status), ..Default::default() }
    }

    #[tokio::test]
    async fn test_complete_then_contract_closes() {
        let world = TestWorld::new().await;
        let a = world.user("a", Role::Parent).await;
        let b = world.user("b", Role::Child).await;
        let c1 = world.contract(&a, &b).await;

        let t1 = world.tasks.create(&a, create_command(&c1, "Clean room", 20)).await.unwrap().task;
        assert_eq!(t1.status, TaskStatus::Pending);
        assert_eq!(t1.points, 20);

        let done = world.tasks.update(&b, &t1.id, set_status(TaskStatus::Completed)).await.unwrap();
        assert_eq!(done.task.status, TaskStatus::Completed);

        world
            .contracts
            .update(&a, &c1, UpdateContractCommand { status: Some(ContractStatus::Completed), ..Default::default() })
            .await
            .unwrap();

        let err = world.tasks.update(&b, &t1.id, set_status(TaskStatus::Pending)).await.unwrap_err();
        assert!(matches!(err, DomainError::Lifecycle(LifecycleViolation::ContractNotActive)));
        assert_eq!(err.to_string(), "contract not active");
    }

    #[tokio::test]
    async fn test_closed_contract_blocks_every_write() {
        let world = TestWorld::new().await;
        let a = world.user("a", Role::Parent).await;
        let b = world.user("b", Role::Child).await;
        let c1 = world.contract(&a, &b).await;
        let t1 = world.tasks.create(&a, create_command(&c1, "Clean room", 5)).await.unwrap().task;

        world
            .contracts
            .update(&b, &c1, UpdateContractCommand { status: Some(ContractStatus::Terminated), ..Default::default() })
            .await
            .unwrap();

        let not_active = |r: DomainResult<()>| matches!(r, Err(DomainError::Lifecycle(LifecycleViolation::ContractNotActive)));

        assert!(not_active(world.tasks.create(&a, create_command(&c1, "More", 1)).await.map(|_| ())));
        assert!(not_active(world.tasks.update(&a, &t1.id, set_status(TaskStatus::Failed)).await.map(|_| ())));
        assert!(not_active(world.tasks.update(&b, &t1.id, set_status(TaskStatus::Completed)).await.map(|_| ())));
        assert!(not_active(world.tasks.delete(&a, &t1.id).await));

        // Reads keep working
        assert!(world.tasks.get(&b, &t1.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_child_restrictions() {
        let world = TestWorld::new().await;
        let a = world.user("a", Role::Parent).await;
        let b = world.user("b", Role::Child).await;
        let c1 = world.contract(&a, &b).await;
        let t1 = world.tasks.create(&a, create_command(&c1, "Clean room", 5)).await.unwrap().task;

        assert!(matches!(world.tasks.create(&b, create_command(&c1, "Mine", 1)).await, Err(DomainError::Forbidden(_))));
        assert!(matches!(world.tasks.delete(&b, &t1.id).await, Err(DomainError::Forbidden(_))));

        let err = world.tasks.update(&b, &t1.id, set_status(TaskStatus::Failed)).await.unwrap_err();
        assert!(matches!(err, DomainError::Lifecycle(ref v) if v.is_role_mismatch()));

        let more_points = UpdateTaskCommand { points: Some(100), ..Default::default() };
        let err = world.tasks.update(&b, &t1.id, more_points).await.unwrap_err();
        assert!(matches!(err, DomainError::Lifecycle(ref v) if v.is_role_mismatch()));

        let unchanged = world.tasks.get(&a, &t1.id).await.unwrap();
        assert_eq!(unchanged.task.points, 5);
        assert_eq!(unchanged.task.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_parent_sets_fields_and_any_status() {
        let world = TestWorld::new().await;
        let a = world.user("a", Role::Parent).await;
        let b = world.user("b", Role::Child).await;
        let c1 = world.contract(&a, &b).await;
        let t1 = world.tasks.create(&a, create_command(&c1, "Clean room", 5)).await.unwrap().task;

        let update = UpdateTaskCommand {
            title: Some("Clean garage".to_string()),
            status: Some(TaskStatus::Failed),
            points: Some(8),
            ..Default::default()
        };
        let updated = world.tasks.update(&a, &t1.id, update).await.unwrap().task;
        assert_eq!(updated.title, "Clean garage");
        assert_eq!(updated.status, TaskStatus::Failed);
        assert_eq!(updated.points, 8);
        assert_eq!(updated.description, "");

        let back = world.tasks.update(&a, &t1.id, set_status(TaskStatus::Pending)).await.unwrap();
        assert_eq!(back.task.status, TaskStatus::Pending);

        let err = world
            .tasks
            .update(&a, &t1.id, UpdateTaskCommand { points: Some(-1), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_cross_family_is_not_found() {
        let world = TestWorld::new().await;
        let a = world.user("a", Role::Parent).await;
        let b = world.user("b", Role::Child).await;
        let stranger = world.user("s", Role::Parent).await;
        let other_child = world.user("k", Role::Child).await;
        let c1 = world.contract(&a, &b).await;
        let t1 = world.tasks.create(&a, create_command(&c1, "Clean room", 5)).await.unwrap().task;

        assert!(matches!(
            world.tasks.create(&stranger, create_command(&c1, "Sneaky", 1)).await,
            Err(DomainError::NotFound("contract"))
        ));
        assert!(matches!(
            world.tasks.create(&a, create_command("no-such-contract", "Ghost", 1)).await,
            Err(DomainError::NotFound("contract"))
        ));
        assert!(matches!(world.tasks.get(&stranger, &t1.id).await, Err(DomainError::NotFound("task"))));
        assert!(matches!(world.tasks.get(&other_child, &t1.id).await, Err(DomainError::NotFound("task"))));
        assert!(matches!(world.tasks.delete(&stranger, &t1.id).await, Err(DomainError::NotFound("task"))));
        assert_eq!(world.tasks.list(&other_child, TaskListQuery::default()).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_list_filter_and_order() {
        let world = TestWorld::new().await;
        let a = world.user("a", Role::Parent).await;
        let b = world.user("b", Role::Child).await;
        let c1 = world.contract(&a, &b).await;

        let mut late = create_command(&c1, "Late", 1);
        late.due_date = Utc::now() + Duration::days(9);
        let mut early = create_command(&c1, "Early", 1);
        early.due_date = Utc::now() + Duration::days(1);
        world.tasks.create(&a, late).await.unwrap();
        let early = world.tasks.create(&a, early).await.unwrap().task;
        world.tasks.update(&b, &early.id, set_status(TaskStatus::Completed)).await.unwrap();

        let all = world.tasks.list(&b, TaskListQuery::default()).await.unwrap();
        assert_eq!(all.total, 2);
        assert_eq!(all.tasks[0].task.title, "Early");
        assert_eq!(all.tasks[0].contract.id, c1);

        let pending = world.tasks.list(&a, TaskListQuery { status: Some(TaskStatus::Pending) }).await.unwrap();
        assert_eq!(pending.total, 1);
        assert_eq!(pending.tasks[0].task.title, "Late");
    }

    #[tokio::test]
    async fn test_deleted_contract_hides_tasks() {
        let world = TestWorld::new().await;
        let a = world.user("a", Role::Parent).await;
        let b = world.user("b", Role::Child).await;
        let c1 = world.contract(&a, &b).await;
        let t1 = world.tasks.create(&a, create_command(&c1, "Clean room", 5)).await.unwrap().task;

        world.contracts.delete(&a, &c1).await.unwrap();

        assert!(matches!(world.tasks.get(&b, &t1.id).await, Err(DomainError::NotFound(_))));
        assert_eq!(world.tasks.list(&a, TaskListQuery::default()).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_parent_deletes_task() {
        let world = TestWorld::new().await;
        let a = world.user("a", Role::Parent).await;
        let b = world.user("b", Role::Child).await;
        let c1 = world.contract(&a, &b).await;
        let t1 = world.tasks.create(&a, create_command(&c1, "Clean room", 5)).await.unwrap().task;

        world.tasks.delete(&a, &t1.id).await.unwrap();
        assert!(matches!(world.tasks.get(&a, &t1.id).await, Err(DomainError::NotFound("task"))));
        assert!(matches!(world.tasks.delete(&a, &t1.id).await, Err(DomainError::NotFound("task"))));
    }
}
