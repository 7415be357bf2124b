use shared::UnknownVariant;

use crate::domain::lifecycle::LifecycleViolation;

/// Every failure a service can report. Each variant maps to exactly one
/// HTTP status in the REST layer.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleViolation),

    #[error("storage failure: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }
}

impl From<UnknownVariant> for DomainError {
    fn from(err: UnknownVariant) -> Self {
        DomainError::Validation(err.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
