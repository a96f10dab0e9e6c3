//! Database operations for storefront `PostgreSQL`.
//!
//! # Schema: `storefront`
//!
//! Stores local data only (Shopify is source of truth for products, carts,
//! customers and orders):
//!
//! ## Tables
//!
//! - `user` - Site accounts (linked to a Shopify customer after checkout)
//! - `user_password` - Argon2 password hashes
//! - `address` - Saved shipping addresses, at most one default per user
//! - `activity_log` - Account events shown on the dashboard
//!
//! Sessions live in `tower_sessions.session`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p jolananas-cli -- migrate
//! ```

pub mod activity;
pub mod addresses;
pub mod users;

pub use activity::ActivityRepository;
pub use addresses::AddressRepository;
pub use users::UserRepository;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The row to update or delete does not exist.
    #[error("not found")]
    NotFound,

    /// Stored data failed domain validation.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Map a unique violation to `Conflict`, everything else to `Database`.
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(what.to_owned());
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
