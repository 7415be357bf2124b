//! Domain model for a registered user.
use chrono::{DateTime, Utc};
use shared::Role;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Password hash as stored next to the user row (argon2id PHC string)
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordCredentials {
    pub hash: String,
}

impl User {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
