use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::user::{PasswordCredentials, User};
use crate::storage::connection::{decode_timestamp, encode_timestamp, DbConnection};
use crate::storage::errors::classify;
use crate::storage::traits::UserStorage;

/// Repository for user accounts and their credentials
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

/// Decode the user columns of a row, each prefixed with `prefix`
pub(crate) fn user_from_row(row: &SqliteRow, prefix: &str) -> Result<User> {
    let col = |name: &str| format!("{}{}", prefix, name);
    let role: String = row.try_get(col("role").as_str())?;
    let created_at: String = row.try_get(col("created_at").as_str())?;
    let updated_at: String = row.try_get(col("updated_at").as_str())?;

    Ok(User {
        id: row.try_get(col("id").as_str())?,
        username: row.try_get(col("username").as_str())?,
        email: row.try_get(col("email").as_str())?,
        role: role.parse()?,
        created_at: decode_timestamp(&created_at)?,
        updated_at: decode_timestamp(&updated_at)?,
    })
}

fn credentials_from_row(row: &SqliteRow) -> PasswordCredentials {
    PasswordCredentials {
        hash: row.get("password_hash"),
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn store_user(&self, user: &User, credentials: &PasswordCredentials) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, role, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&credentials.hash)
        .bind(encode_timestamp(&user.created_at))
        .bind(encode_timestamp(&user.updated_at))
        .execute(self.db.pool())
        .await
        .map_err(classify)?;
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, role, created_at, updated_at
            FROM users
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(|r| user_from_row(&r, "")).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<(User, PasswordCredentials)>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, role, password_hash, created_at, updated_at
            FROM users
            WHERE email = ? AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some((user_from_row(&r, "")?, credentials_from_row(&r)))),
            None => Ok(None),
        }
    }

    async fn get_credentials(&self, user_id: &str) -> Result<Option<PasswordCredentials>> {
        let row = sqlx::query(
            "SELECT password_hash FROM users WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| credentials_from_row(&r)))
    }

    async fn username_taken(&self, username: &str, except_id: Option<&str>) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ? AND id != ?")
            .bind(username)
            .bind(except_id.unwrap_or(""))
            .fetch_one(self.db.pool())
            .await?;
        Ok(count > 0)
    }

    async fn email_taken(&self, email: &str, except_id: Option<&str>) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ? AND id != ?")
            .bind(email)
            .bind(except_id.unwrap_or(""))
            .fetch_one(self.db.pool())
            .await?;
        Ok(count > 0)
    }

    async fn update_profile(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, email = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(encode_timestamp(&user.updated_at))
        .bind(&user.id)
        .execute(self.db.pool())
        .await
        .map_err(classify)?;
        Ok(())
    }

    async fn update_credentials(
        &self,
        user_id: &str,
        credentials: &PasswordCredentials,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(&credentials.hash)
        .bind(encode_timestamp(&updated_at))
        .bind(user_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}
