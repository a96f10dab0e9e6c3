//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use jolananas_core::{Email, UserId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::user::{ProfileUpdate, User};

const USER_COLUMNS: &str = "id, email, first_name, last_name, phone, shopify_customer_id, \
                            created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    shopify_customer_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&r.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(r.id),
            email,
            first_name: r.first_name,
            last_name: r.last_name,
            phone: r.phone,
            shopify_customer_id: r.shopify_customer_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserPasswordRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: Option<String>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the email in the database is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM storefront.user WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Create a new user with email, password hash and optional names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_password(
        &self,
        email: &Email,
        password_hash: &str,
        profile: &ProfileUpdate,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO storefront.user (email, first_name, last_name, phone) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email.normalized())
        .bind(profile.first_name.as_deref())
        .bind(profile.last_name.as_deref())
        .bind(profile.phone.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "email already exists"))?;

        let user = User::try_from(row)?;

        sqlx::query(
            r"
            INSERT INTO storefront.user_password (user_id, password_hash)
            VALUES ($1, $2)
            ",
        )
        .bind(user.id.as_i32())
        .bind(password_hash)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Get a user and their password hash by email.
    ///
    /// Returns `None` if the user doesn't exist or has no password set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserPasswordRow>(
            r"
            SELECT u.id, u.email, u.first_name, u.last_name, u.phone,
                   u.shopify_customer_id, u.created_at, u.updated_at,
                   p.password_hash
            FROM storefront.user u
            LEFT JOIN storefront.user_password p ON u.id = p.user_id
            WHERE u.email = $1
            ",
        )
        .bind(email.normalized())
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let Some(password_hash) = r.password_hash else {
            return Ok(None);
        };

        Ok(Some((User::try_from(r.user)?, password_hash)))
    }

    /// Update profile fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn update_profile(
        &self,
        id: UserId,
        profile: &ProfileUpdate,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE storefront.user \
             SET first_name = $2, last_name = $3, phone = $4 \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(profile.first_name.as_deref())
        .bind(profile.last_name.as_deref())
        .bind(profile.phone.as_deref())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        User::try_from(row)
    }

    /// Link the user to their Shopify customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_shopify_customer_id(
        &self,
        id: UserId,
        shopify_customer_id: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE storefront.user
            SET shopify_customer_id = $2
            WHERE id = $1 AND shopify_customer_id IS DISTINCT FROM $2
            ",
        )
        .bind(id.as_i32())
        .bind(shopify_customer_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 && self.get_by_id(id).await?.is_none() {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
