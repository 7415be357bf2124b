use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::contract::Contract;
use crate::domain::policy::Visibility;
use crate::storage::connection::{decode_timestamp, encode_timestamp, DbConnection};
use crate::storage::traits::ContractStorage;

/// Contract columns aliased with a `c_` prefix, for joins from tasks/rewards
pub(crate) const JOINED_CONTRACT_COLUMNS: &str = "c.id AS c_id, c.title AS c_title, \
    c.description AS c_description, c.parent_id AS c_parent_id, c.child_id AS c_child_id, \
    c.status AS c_status, c.start_date AS c_start_date, c.end_date AS c_end_date, \
    c.created_at AS c_created_at, c.updated_at AS c_updated_at";

/// Repository for contracts
#[derive(Clone)]
pub struct ContractRepository {
    db: DbConnection,
}

impl ContractRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn contract_from_row(row: &SqliteRow, prefix: &str) -> Result<Contract> {
    let col = |name: &str| format!("{}{}", prefix, name);
    let status: String = row.try_get(col("status").as_str())?;
    let start_date: String = row.try_get(col("start_date").as_str())?;
    let end_date: String = row.try_get(col("end_date").as_str())?;
    let created_at: String = row.try_get(col("created_at").as_str())?;
    let updated_at: String = row.try_get(col("updated_at").as_str())?;

    Ok(Contract {
        id: row.try_get(col("id").as_str())?,
        title: row.try_get(col("title").as_str())?,
        description: row.try_get(col("description").as_str())?,
        parent_id: row.try_get(col("parent_id").as_str())?,
        child_id: row.try_get(col("child_id").as_str())?,
        status: status.parse()?,
        start_date: decode_timestamp(&start_date)?,
        end_date: decode_timestamp(&end_date)?,
        created_at: decode_timestamp(&created_at)?,
        updated_at: decode_timestamp(&updated_at)?,
    })
}

#[async_trait]
impl ContractStorage for ContractRepository {
    async fn store_contract(&self, contract: &Contract) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO contracts (id, title, description, parent_id, child_id, status,
                                   start_date, end_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&contract.id)
        .bind(&contract.title)
        .bind(&contract.description)
        .bind(&contract.parent_id)
        .bind(&contract.child_id)
        .bind(contract.status.as_str())
        .bind(encode_timestamp(&contract.start_date))
        .bind(encode_timestamp(&contract.end_date))
        .bind(encode_timestamp(&contract.created_at))
        .bind(encode_timestamp(&contract.updated_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_contract(&self, contract_id: &str) -> Result<Option<Contract>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, parent_id, child_id, status,
                   start_date, end_date, created_at, updated_at
            FROM contracts
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(contract_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(|r| contract_from_row(&r, "")).transpose()
    }

    async fn list_contracts(&self, scope: &Visibility) -> Result<Vec<Contract>> {
        let sql = format!(
            r#"
            SELECT id, title, description, parent_id, child_id, status,
                   start_date, end_date, created_at, updated_at
            FROM contracts
            WHERE {} = ? AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            "#,
            scope.contract_column()
        );

        let rows = sqlx::query(&sql)
            .bind(&scope.subject_id)
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(|r| contract_from_row(r, "")).collect()
    }

    async fn count_contracts(&self, scope: &Visibility) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM contracts WHERE {} = ? AND deleted_at IS NULL",
            scope.contract_column()
        );

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(&scope.subject_id)
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }

    async fn update_contract(&self, contract: &Contract) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE contracts
            SET title = ?, description = ?, status = ?, start_date = ?, end_date = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(&contract.title)
        .bind(&contract.description)
        .bind(contract.status.as_str())
        .bind(encode_timestamp(&contract.start_date))
        .bind(encode_timestamp(&contract.end_date))
        .bind(encode_timestamp(&contract.updated_at))
        .bind(&contract.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn soft_delete_contract(&self, contract_id: &str, at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE contracts
            SET deleted_at = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(encode_timestamp(&at))
        .bind(encode_timestamp(&at))
        .bind(contract_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
