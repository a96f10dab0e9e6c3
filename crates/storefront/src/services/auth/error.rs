//! Errors from account registration, login and profile edits.

use thiserror::Error;

use crate::db::RepositoryError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] jolananas_core::EmailError),

    /// Unknown email or wrong password; the two are not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The session points at an account that was deleted.
    #[error("account not found")]
    UserNotFound,

    /// Registration with an email that already has an account.
    #[error("an account already exists for this email")]
    UserAlreadyExists,

    #[error("password rejected: {0}")]
    WeakPassword(String),

    /// Name or phone rejected after sanitization.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// argon2 failed to hash or parse a stored hash.
    #[error("password hashing failed")]
    PasswordHash,
}
