use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::RewardStatus;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::reward::{Reward, RewardRecord};
use crate::domain::policy::Visibility;
use crate::storage::connection::{decode_timestamp, encode_timestamp, DbConnection};
use crate::storage::repositories::contract_repository::{contract_from_row, JOINED_CONTRACT_COLUMNS};
use crate::storage::traits::RewardStorage;

const REWARD_COLUMNS: &str = "r.id, r.contract_id, r.title, r.description, r.status, r.points_cost, \
    r.expiry_date, r.created_at, r.updated_at";

/// Repository for rewards
#[derive(Clone)]
pub struct RewardRepository {
    db: DbConnection,
}

impl RewardRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

fn reward_from_row(row: &SqliteRow) -> Result<Reward> {
    let status: String = row.try_get("status")?;
    let expiry_date: Option<String> = row.try_get("expiry_date")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Reward {
        id: row.try_get("id")?,
        contract_id: row.try_get("contract_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        status: status.parse()?,
        points_cost: row.try_get("points_cost")?,
        expiry_date: expiry_date.as_deref().map(decode_timestamp).transpose()?,
        created_at: decode_timestamp(&created_at)?,
        updated_at: decode_timestamp(&updated_at)?,
    })
}

fn record_from_row(row: &SqliteRow) -> Result<RewardRecord> {
    Ok(RewardRecord {
        reward: reward_from_row(row)?,
        contract: contract_from_row(row, "c_")?,
    })
}

fn status_clause(status: Option<RewardStatus>) -> &'static str {
    if status.is_some() {
        "AND r.status = ?"
    } else {
        ""
    }
}

#[async_trait]
impl RewardStorage for RewardRepository {
    async fn store_reward(&self, reward: &Reward) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO rewards (id, contract_id, title, description, status, points_cost,
                                 expiry_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&reward.id)
        .bind(&reward.contract_id)
        .bind(&reward.title)
        .bind(&reward.description)
        .bind(reward.status.as_str())
        .bind(reward.points_cost)
        .bind(reward.expiry_date.as_ref().map(encode_timestamp))
        .bind(encode_timestamp(&reward.created_at))
        .bind(encode_timestamp(&reward.updated_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_reward(&self, reward_id: &str) -> Result<Option<RewardRecord>> {
        let sql = format!(
            r#"
            SELECT {}, {}
            FROM rewards r
            JOIN contracts c ON c.id = r.contract_id
            WHERE r.id = ? AND r.deleted_at IS NULL AND c.deleted_at IS NULL
            "#,
            REWARD_COLUMNS, JOINED_CONTRACT_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(reward_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.map(|r| record_from_row(&r)).transpose()
    }

    async fn list_rewards(&self, scope: &Visibility, status: Option<RewardStatus>) -> Result<Vec<RewardRecord>> {
        let sql = format!(
            r#"
            SELECT {}, {}
            FROM rewards r
            JOIN contracts c ON c.id = r.contract_id
            WHERE c.{} = ? AND r.deleted_at IS NULL AND c.deleted_at IS NULL {}
            ORDER BY r.created_at DESC, r.id DESC
            "#,
            REWARD_COLUMNS,
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

    async fn count_rewards(&self, scope: &Visibility, status: Option<RewardStatus>) -> Result<i64> {
        let sql = format!(
            r#"
            SELECT COUNT(*)
            FROM rewards r
            JOIN contracts c ON c.id = r.contract_id
            WHERE c.{} = ? AND r.deleted_at IS NULL AND c.deleted_at IS NULL {}
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

    async fn list_contract_rewards(&self, contract_id: &str) -> Result<Vec<Reward>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM rewards r
            WHERE r.contract_id = ? AND r.deleted_at IS NULL
            ORDER BY r.created_at DESC, r.id DESC
            "#,
            REWARD_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(contract_id)
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(reward_from_row).collect()
    }

    async fn update_reward(&self, reward: &Reward) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE rewards
            SET title = ?, description = ?, status = ?, points_cost = ?, expiry_date = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(&reward.title)
        .bind(&reward.description)
        .bind(reward.status.as_str())
        .bind(reward.points_cost)
        .bind(reward.expiry_date.as_ref().map(encode_timestamp))
        .bind(encode_timestamp(&reward.updated_at))
        .bind(&reward.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn soft_delete_reward(&self, reward_id: &str, at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE rewards
            SET deleted_at = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(encode_timestamp(&at))
        .bind(encode_timestamp(&at))
        .bind(reward_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
