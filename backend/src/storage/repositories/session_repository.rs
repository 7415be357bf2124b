use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::models::user::User;
use crate::storage::connection::{encode_timestamp, DbConnection};
use crate::storage::repositories::user_repository::user_from_row;
use crate::storage::traits::SessionStorage;

/// Repository for issued bearer-token sessions
#[derive(Clone)]
pub struct SessionRepository {
    db: DbConnection,
}

impl SessionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStorage for SessionRepository {
    async fn store_session(&self, token_hash: &str, user_id: &str, expires_at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token_hash, user_id, expires_at, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(encode_timestamp(&expires_at))
        .bind(encode_timestamp(&Utc::now()))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn find_session_user(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.username, u.email, u.role, u.created_at, u.updated_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = ? AND s.expires_at > ? AND u.deleted_at IS NULL
            "#,
        )
        .bind(token_hash)
        .bind(encode_timestamp(&now))
        .fetch_optional(self.db.pool())
        .await?;

        row.map(|r| user_from_row(&r, "")).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::user::PasswordCredentials;
    use crate::storage::repositories::user_repository::{tests::sample_user, UserRepository};
    use crate::storage::traits::UserStorage;
    use chrono::Duration;
    use shared::Role;

    #[tokio::test]
    async fn test_session_expiry() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let users = UserRepository::new(db.clone());
        let sessions = SessionRepository::new(db);

        let user = sample_user("erin", Role::Child);
        let creds = PasswordCredentials { hash: "h".to_string() };
        users.store_user(&user, &creds).await.unwrap();

        let now = Utc::now();
        sessions.store_session("digest", &user.id, now + Duration::hours(1)).await.unwrap();

        let found = sessions.find_session_user("digest", now).await.unwrap().expect("session missing");
        assert_eq!(found.id, user.id);

        assert!(sessions.find_session_user("digest", now + Duration::hours(2)).await.unwrap().is_none());
        assert!(sessions.find_session_user("other", now).await.unwrap().is_none());
    }
}
