//! Profile settings and account closure for the authenticated user.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::auth_service::{
    normalize_email, user_write_error, validate_email, validate_password, validate_username, EMAIL_TAKEN,
    USERNAME_TAKEN,
};
use crate::domain::commands::accounts::{ChangePasswordCommand, UpdateProfileCommand};
use crate::domain::credentials;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::identity::Identity;
use crate::domain::models::user::User;
use crate::storage::traits::UserStorage;
use crate::storage::DbConnection;

#[derive(Clone)]
pub struct AccountService {
    db: DbConnection,
    users: Arc<dyn UserStorage>,
}

impl AccountService {
    pub fn new(db: DbConnection, users: Arc<dyn UserStorage>) -> Self {
        Self { db, users }
    }

    pub async fn profile(&self, identity: &Identity) -> DomainResult<User> {
        info!("Getting profile: {}", identity.subject_id);
        self.users
            .get_user(&identity.subject_id)
            .await?
            .ok_or(DomainError::NotFound("user"))
    }

    pub async fn update_profile(&self, identity: &Identity, command: UpdateProfileCommand) -> DomainResult<User> {
        info!("Updating profile: {}", identity.subject_id);

        let mut user = self.profile(identity).await?;

        if let Some(username) = command.username {
            let username = username.trim().to_string();
            validate_username(&username)?;
            if self.users.username_taken(&username, Some(&user.id)).await? {
                return Err(DomainError::Conflict(USERNAME_TAKEN.to_string()));
            }
            user.username = username;
        }
        if let Some(email) = command.email {
            let email = normalize_email(&email);
            validate_email(&email)?;
            if self.users.email_taken(&email, Some(&user.id)).await? {
                return Err(DomainError::Conflict(EMAIL_TAKEN.to_string()));
            }
            user.email = email;
        }

        user.updated_at = Utc::now();
        self.users.update_profile(&user).await.map_err(user_write_error)?;

        Ok(user)
    }

    pub async fn change_password(&self, identity: &Identity, command: ChangePasswordCommand) -> DomainResult<()> {
        info!("Changing password: {}", identity.subject_id);

        let stored = self
            .users
            .get_credentials(&identity.subject_id)
            .await?
            .ok_or(DomainError::NotFound("user"))?;

        if !credentials::verify_password(&command.current_password, &stored) {
            warn!("Password change rejected for {}: wrong current password", identity.subject_id);
            return Err(DomainError::validation("current password is incorrect"));
        }
        validate_password(&command.new_password)?;

        let credentials = credentials::hash_password(&command.new_password)?;
        self.users
            .update_credentials(&identity.subject_id, &credentials, Utc::now())
            .await?;
        Ok(())
    }

    /// Soft delete every contract the user is party to, revoke its sessions
    /// and soft delete the user, all in one transaction.
    pub async fn delete_account(&self, identity: &Identity) -> DomainResult<()> {
        info!("Deleting account: {}", identity.subject_id);

        let now = Utc::now();
        let mut uow = self.db.begin().await?;

        let contracts = uow.soft_delete_contracts_of_user(&identity.subject_id, now).await?;
        let sessions = uow.revoke_sessions(&identity.subject_id).await?;
        if !uow.soft_delete_user(&identity.subject_id, now).await? {
            return Err(DomainError::NotFound("user"));
        }
        uow.commit().await?;

        info!(
            "Deleted account {} ({} contracts, {} sessions)",
            identity.subject_id, contracts, sessions
        );
        Ok(())
    }
}
