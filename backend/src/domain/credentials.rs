//! Password hashing and session-token digests.
//!
//! Passwords are stored as argon2id PHC strings, which carry their own salt
//! and parameters. Bearer tokens are random and only their SHA-256 digest is
//! persisted.

use anyhow::{anyhow, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::domain::models::user::PasswordCredentials;

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(password: &str) -> Result<PasswordCredentials> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(PasswordCredentials { hash })
}

/// Constant-time check of `password` against a stored PHC string
pub fn verify_password(password: &str, credentials: &PasswordCredentials) -> bool {
    match PasswordHash::new(&credentials.hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            warn!("Unreadable stored password hash: {}", e);
            false
        }
    }
}

/// Fresh opaque bearer token (64 hex chars)
pub fn generate_token() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let creds = hash_password("hunter22").unwrap();
        assert!(creds.hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &creds));
        assert!(!verify_password("hunter23", &creds));
    }

    #[test]
    fn test_same_password_gets_different_hash() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a.hash, b.hash);
        assert!(verify_password("secret1", &b));
    }

    #[test]
    fn test_legacy_or_garbled_hash_never_verifies() {
        let garbled = PasswordCredentials { hash: "5e884898da28047151d0e56f8dc629".to_string() };
        assert!(!verify_password("password", &garbled));
    }

    #[test]
    fn test_token_digest() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert_eq!(token_digest(&token), token_digest(&token));
        assert_ne!(token_digest(&token), token);
        assert_ne!(generate_token(), token);
    }
}
