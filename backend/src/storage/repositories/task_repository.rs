use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::TaskStatus;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::task::{Task, TaskRecord};
use crate::domain::policy::Visibility;
use crate::storage::connection::{decode_timestamp, encode_timestamp, DbConnection};
use crate::storage::repositories::contract_repository::{contract_from_row, JOINED_CONTRACT_COLUMNS};
use crate::storage::traits::TaskStorage;

const TASK_COLUMNS: &str = "t.id, t.contract_id, t.title, t.description, t.status, t.points, \
    t.due_date, t.created_at, t.updated_at";

/// Repository for tasks
#[derive(Clone)]
pub struct TaskRepository {
    db: DbConnection,
}

impl TaskRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

fn task_from_row(row: &SqliteRow) -> Result<Task> {
    let status: String = row.try_get("status")?;
    let due_date: String = row.try_get("due_date")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Task {
        id: row.try_get("id")?,
        contract_id: row.try_get("contract_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        status: status.parse()?,
        points: row.try_get("points")?,
        due_date: decode_timestamp(&due_date)?,
        created_at: decode_timestamp(&created_at)?,
        updated_at: decode_timestamp(&updated_at)?,
    })
}

fn record_from_row(row: &SqliteRow) -> Result<TaskRecord> {
    Ok(TaskRecord {
        task: task_from_row(row)?,
        contract: contract_from_row(row, "c_")?,
    })
}

fn status_clause(status: Option<TaskStatus>) -> &'static str {
    if status.is_some() {
        "AND t.status = ?"
    } else {
        ""
    }
}

#[async_trait]
impl TaskStorage for TaskRepository {
    async fn store_task(&self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, contract_id, title, description, status, points,
                               due_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(&task.contract_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.points)
        .bind(encode_timestamp(&task.due_date))
        .bind(encode_timestamp(&task.created_at))
        .bind(encode_timestamp(&task.updated_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_task(&self, task_id: &str) -> Result<Option<TaskRecord>> {
        let sql = format!(
            r#"
            SELECT {}, {}
            FROM tasks t
            JOIN contracts c ON c.id = t.contract_id
            WHERE t.id = ? AND t.deleted_at IS NULL AND c.deleted_at IS NULL
            "#,
            TASK_COLUMNS, JOINED_CONTRACT_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(task_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.map(|r| record_from_row(&r)).transpose()
    }

    async fn list_tasks(&self, scope: &Visibility, status: Option<TaskStatus>) -> Result<Vec<TaskRecord>> {
        let sql = format!(
            r#"
            SELECT {}, {}
            FROM tasks t
            JOIN contracts c ON c.id = t.contract_id
            WHERE c.{} = ? AND t.deleted_at IS NULL AND c.deleted_at IS NULL {}
            ORDER BY t.due_date ASC, t.id ASC
            "#,
            TASK_COLUMNS,
            JOINED_CONTRACT_COLUMNS,
            scope.contract_column(),
            status_clause(status)
        );

        let mut query = sqlx::query(&sql).bind(&scope.subject_id);
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }

        let rows = query.fetch_all(self.db.pool()).await?;
        rows.iter().map(record_from_row).collect()
    }

    async fn count_tasks(&self, scope: &Visibility, status: Option<TaskStatus>) -> Result<i64> {
        let sql = format!(
            r#"
            SELECT COUNT(*)
            FROM tasks t
            JOIN contracts c ON c.id = t.contract_id
            WHERE c.{} = ? AND t.deleted_at IS NULL AND c.deleted_at IS NULL {}
            "#,
            scope.contract_column(),
            status_clause(status)
        );

        let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(&scope.subject_id);
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }

        let count: i64 = query.fetch_one(self.db.pool()).await?;
        Ok(count)
    }

    async fn list_contract_tasks(&self, contract_id: &str) -> Result<Vec<Task>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM tasks t
            WHERE t.contract_id = ? AND t.deleted_at IS NULL
            ORDER BY t.due_date ASC, t.id ASC
            "#,
            TASK_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(contract_id)
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(task_from_row).collect()
    }

    async fn update_task(&self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, status = ?, points = ?, due_date = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.points)
        .bind(encode_timestamp(&task.due_date))
        .bind(encode_timestamp(&task.updated_at))
        .bind(&task.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn soft_delete_task(&self, task_id: &str, at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET deleted_at = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(encode_timestamp(&at))
        .bind(encode_timestamp(&at))
        .bind(task_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
