//! Storage failures the domain needs to tell apart from plain I/O errors.

use thiserror::Error;

/// A write hit a UNIQUE constraint on `column`
#[derive(Debug, Error)]
#[error("unique constraint failed on {column}")]
pub struct UniqueViolation {
    pub column: String,
}

/// Wrap a sqlx error, keeping unique violations downcastable
pub(crate) fn classify(err: sqlx::Error) -> anyhow::Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            // SQLite reports "UNIQUE constraint failed: users.email"
            let column = db_err.message().rsplit('.').next().unwrap_or_default().trim().to_string();
            return UniqueViolation { column }.into();
        }
    }
    err.into()
}
