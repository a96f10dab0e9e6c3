//! Authentication service.
//!
//! Password accounts (Argon2id) and profile management. The logged-in user
//! is kept in the session under [`keys::CURRENT_USER`](crate::models::session::keys::CURRENT_USER).

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use sqlx::PgPool;

use jolananas_core::sanitize::{MAX_LINE_CHARS, sanitize_line};
use jolananas_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::address::optional_line;
use crate::models::user::{ProfileUpdate, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (bounds hashing cost).
const MAX_PASSWORD_LENGTH: usize = 128;

/// Longest accepted phone number.
const MAX_PHONE_CHARS: usize = 32;

/// Profile fields as submitted by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ProfileInput {
    /// Sanitize names and check the phone number.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidProfile` for a malformed phone number.
    pub fn validate(&self) -> Result<ProfileUpdate, AuthError> {
        let phone = self
            .phone
            .as_deref()
            .map(|p| sanitize_line(p, MAX_PHONE_CHARS))
            .filter(|p| !p.is_empty());

        if let Some(ref p) = phone
            && !p
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '.' | '-' | '(' | ')'))
        {
            return Err(AuthError::InvalidProfile(
                "phone may only contain digits, spaces and + . - ( )".to_string(),
            ));
        }

        Ok(ProfileUpdate {
            first_name: optional_line(self.first_name.as_deref()),
            last_name: optional_line(self.last_name.as_deref()),
            phone,
        })
    }
}

/// Authentication service.
///
/// Handles user registration, login, and profile updates.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register_with_password(
        &self,
        email: &str,
        password: &str,
        profile: &ProfileInput,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let profile = profile.validate()?;

        let password_hash = hash_password(password)?;

        self.users
            .create_with_password(&email, &password_hash, &profile)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Update the user's names and phone number.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidProfile` for bad input and
    /// `AuthError::UserNotFound` if the user no longer exists.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        input: &ProfileInput,
    ) -> Result<User, AuthError> {
        let profile = input.validate()?;

        self.users
            .update_profile(user_id, &profile)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    if password.trim().is_empty() {
        return Err(AuthError::WeakPassword(
            "password cannot be only whitespace".to_string(),
        ));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_length() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("ananas-du-matin").is_ok());
        assert!(validate_password(&"x".repeat(129)).is_err());
        assert!(validate_password("        ").is_err());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("ananas-du-matin").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("ananas-du-matin", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_garbage_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("whatever1", "not-a-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_profile_input_sanitizes() {
        let input = ProfileInput {
            first_name: Some("  Anne\u{0}  ".to_string()),
            last_name: Some(String::new()),
            phone: Some(" +33 6 12 34 56 78 ".to_string()),
        };
        let profile = input.validate().unwrap();
        assert_eq!(profile.first_name.as_deref(), Some("Anne"));
        assert_eq!(profile.last_name, None);
        assert_eq!(profile.phone.as_deref(), Some("+33 6 12 34 56 78"));
    }

    #[test]
    fn test_profile_input_rejects_bad_phone() {
        let input = ProfileInput {
            phone: Some("call me maybe".to_string()),
            ..ProfileInput::default()
        };
        assert!(matches!(
            input.validate(),
            Err(AuthError::InvalidProfile(_))
        ));
    }
}
