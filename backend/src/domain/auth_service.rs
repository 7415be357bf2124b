//! Registration, login and bearer-token resolution.

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::accounts::{AuthResult, LoginCommand, RegisterCommand};
use crate::domain::credentials::{self, MIN_PASSWORD_LEN};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::identity::Identity;
use crate::domain::models::user::User;
use crate::storage::errors::UniqueViolation;
use crate::storage::traits::{SessionStorage, UserStorage};

const BAD_LOGIN: &str = "invalid email or password";
pub(crate) const USERNAME_TAKEN: &str = "username already taken";
pub(crate) const EMAIL_TAKEN: &str = "email already registered";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStorage>,
    sessions: Arc<dyn SessionStorage>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStorage>, sessions: Arc<dyn SessionStorage>, session_ttl: Duration) -> Self {
        Self { users, sessions, session_ttl }
    }

    pub async fn register(&self, command: RegisterCommand) -> DomainResult<AuthResult> {
        let username = command.username.trim().to_string();
        let email = normalize_email(&command.email);
        info!("Registering {} user: {}", command.role, username);

        validate_username(&username)?;
        validate_email(&email)?;
        validate_password(&command.password)?;

        if self.users.username_taken(&username, None).await? {
            warn!("Registration rejected, username taken: {}", username);
            return Err(DomainError::Conflict(USERNAME_TAKEN.to_string()));
        }
        if self.users.email_taken(&email, None).await? {
            warn!("Registration rejected, email taken: {}", email);
            return Err(DomainError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: User::generate_id(),
            username,
            email,
            role: command.role,
            created_at: now,
            updated_at: now,
        };
        let credentials = credentials::hash_password(&command.password)?;
        self.users
            .store_user(&user, &credentials)
            .await
            .map_err(user_write_error)?;

        let token = self.issue_token(&user.id).await?;
        info!("Registered user {} with ID: {}", user.username, user.id);

        Ok(AuthResult { token, user })
    }

    pub async fn login(&self, command: LoginCommand) -> DomainResult<AuthResult> {
        let email = normalize_email(&command.email);
        info!("Login attempt for {}", email);

        let Some((user, stored)) = self.users.find_user_by_email(&email).await? else {
            warn!("Login failed, unknown email: {}", email);
            return Err(DomainError::Unauthenticated(BAD_LOGIN.to_string()));
        };

        if !credentials::verify_password(&command.password, &stored) {
            warn!("Login failed, wrong password for user {}", user.id);
            return Err(DomainError::Unauthenticated(BAD_LOGIN.to_string()));
        }

        let token = self.issue_token(&user.id).await?;
        Ok(AuthResult { token, user })
    }

    /// Resolve a bearer token to the caller's identity
    pub async fn authenticate(&self, token: &str) -> DomainResult<Identity> {
        let digest = credentials::token_digest(token);
        match self.sessions.find_session_user(&digest, Utc::now()).await? {
            Some(user) => Ok(Identity::new(user.id, user.role)),
            None => Err(DomainError::Unauthenticated("invalid or expired token".to_string())),
        }
    }

    async fn issue_token(&self, user_id: &str) -> DomainResult<String> {
        let token = credentials::generate_token();
        let expires_at = Utc::now() + self.session_ttl;
        self.sessions
            .store_session(&credentials::token_digest(&token), user_id, expires_at)
            .await?;
        Ok(token)
    }
}

/// A unique-constraint hit that slipped past the pre-checks (a concurrent
/// writer) is still a conflict, not an internal error.
pub(crate) fn user_write_error(err: anyhow::Error) -> DomainError {
    match err.downcast_ref::<UniqueViolation>() {
        Some(violation) if violation.column == "email" => DomainError::Conflict(EMAIL_TAKEN.to_string()),
        Some(_) => DomainError::Conflict(USERNAME_TAKEN.to_string()),
        None => DomainError::Internal(err),
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn validate_username(username: &str) -> DomainResult<()> {
    if username.is_empty() {
        return Err(DomainError::validation("username cannot be empty"));
    }
    if username.chars().count() > 50 {
        return Err(DomainError::validation("username cannot exceed 50 characters"));
    }
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> DomainResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !valid {
        return Err(DomainError::validation("email address is not valid"));
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
