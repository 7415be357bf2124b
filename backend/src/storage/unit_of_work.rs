use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, Transaction};
use tracing::debug;

use crate::storage::connection::encode_timestamp;

/// A single storage transaction. Every write goes through the same
/// connection; nothing is visible to other readers until `commit`, and
/// dropping the scope uncommitted rolls all of it back.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    pub(crate) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx }
    }

    /// Soft delete every live contract the user is a party to
    pub async fn soft_delete_contracts_of_user(&mut self, user_id: &str, at: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE contracts
            SET deleted_at = ?, updated_at = ?
            WHERE (parent_id = ? OR child_id = ?) AND deleted_at IS NULL
            "#,
        )
        .bind(encode_timestamp(&at))
        .bind(encode_timestamp(&at))
        .bind(user_id)
        .bind(user_id)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn revoke_sessions(&mut self, user_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    /// Returns false when the user was already gone
    pub async fn soft_delete_user(&mut self, user_id: &str, at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET deleted_at = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(encode_timestamp(&at))
        .bind(encode_timestamp(&at))
        .bind(user_id)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        debug!("Unit of work committed");
        Ok(())
    }
}
