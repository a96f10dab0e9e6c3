//! Saved address repository.
//!
//! Keeps the single-default invariant: the first address becomes the default,
//! setting a default clears the others in the same transaction, and deleting
//! the default promotes the most recently updated remaining address.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use jolananas_core::{AddressId, CountryCode, UserId};

use super::RepositoryError;
use crate::models::address::{Address, ValidAddress};

const ADDRESS_COLUMNS: &str = "id, user_id, label, first_name, last_name, company, address1, \
                               address2, city, zip, province, country_code, phone, is_default, \
                               created_at, updated_at";

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: i32,
    user_id: i32,
    label: Option<String>,
    first_name: String,
    last_name: String,
    company: Option<String>,
    address1: String,
    address2: Option<String>,
    city: String,
    zip: String,
    province: Option<String>,
    country_code: String,
    phone: Option<String>,
    is_default: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AddressRow> for Address {
    type Error = RepositoryError;

    fn try_from(r: AddressRow) -> Result<Self, Self::Error> {
        let country_code = CountryCode::parse(&r.country_code).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid country code in database: {e}"))
        })?;

        Ok(Self {
            id: AddressId::new(r.id),
            user_id: UserId::new(r.user_id),
            label: r.label,
            first_name: r.first_name,
            last_name: r.last_name,
            company: r.company,
            address1: r.address1,
            address2: r.address2,
            city: r.city,
            zip: r.zip,
            province: r.province,
            country_code,
            phone: r.phone,
            is_default: r.is_default,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// Repository for saved addresses.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All addresses of a user, default first then most recently updated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM storefront.address \
             WHERE user_id = $1 \
             ORDER BY is_default DESC, updated_at DESC, id DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Address::try_from).collect()
    }

    /// Get one address owned by the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        user_id: UserId,
        id: AddressId,
    ) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM storefront.address WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(Address::try_from).transpose()
    }

    /// Insert an address. The user's first address is always the default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        address: &ValidAddress,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM storefront.address WHERE user_id = $1")
                .bind(user_id.as_i32())
                .fetch_one(&mut *tx)
                .await?;

        let is_default = existing == 0 || address.is_default;
        if is_default {
            clear_default(&mut tx, user_id).await?;
        }

        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "INSERT INTO storefront.address \
             (user_id, label, first_name, last_name, company, address1, address2, city, zip, \
              province, country_code, phone, is_default) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(user_id.as_i32())
        .bind(address.label.as_deref())
        .bind(&address.first_name)
        .bind(&address.last_name)
        .bind(address.company.as_deref())
        .bind(&address.address1)
        .bind(address.address2.as_deref())
        .bind(&address.city)
        .bind(&address.zip)
        .bind(address.province.as_deref())
        .bind(address.country_code.as_str())
        .bind(address.phone.as_deref())
        .bind(is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Address::try_from(row)
    }

    /// Replace an address's fields.
    ///
    /// Requesting `is_default` makes it the default; an address that is
    /// already the default stays so.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not belong to the user.
    pub async fn update(
        &self,
        user_id: UserId,
        id: AddressId,
        address: &ValidAddress,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if address.is_default {
            clear_default_except(&mut tx, user_id, id).await?;
        }

        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "UPDATE storefront.address SET \
             label = $3, first_name = $4, last_name = $5, company = $6, address1 = $7, \
             address2 = $8, city = $9, zip = $10, province = $11, country_code = $12, \
             phone = $13, is_default = is_default OR $14 \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .bind(address.label.as_deref())
        .bind(&address.first_name)
        .bind(&address.last_name)
        .bind(address.company.as_deref())
        .bind(&address.address1)
        .bind(address.address2.as_deref())
        .bind(&address.city)
        .bind(&address.zip)
        .bind(address.province.as_deref())
        .bind(address.country_code.as_str())
        .bind(address.phone.as_deref())
        .bind(address.is_default)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;

        Address::try_from(row)
    }

    /// Make an address the user's only default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not belong to the user.
    pub async fn set_default(
        &self,
        user_id: UserId,
        id: AddressId,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        clear_default_except(&mut tx, user_id, id).await?;

        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "UPDATE storefront.address SET is_default = TRUE \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;

        Address::try_from(row)
    }

    /// Delete an address, promoting another one if it was the default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not belong to the user.
    pub async fn delete(&self, user_id: UserId, id: AddressId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let was_default: bool = sqlx::query_scalar(
            r"
            DELETE FROM storefront.address
            WHERE id = $1 AND user_id = $2
            RETURNING is_default
            ",
        )
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if was_default {
            sqlx::query(
                r"
                UPDATE storefront.address SET is_default = TRUE
                WHERE id = (
                    SELECT id FROM storefront.address
                    WHERE user_id = $1
                    ORDER BY updated_at DESC, id DESC
                    LIMIT 1
                )
                ",
            )
            .bind(user_id.as_i32())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}

async fn clear_default(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
) -> Result<(), RepositoryError> {
    sqlx::query("UPDATE storefront.address SET is_default = FALSE WHERE user_id = $1 AND is_default")
        .bind(user_id.as_i32())
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn clear_default_except(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
    keep: AddressId,
) -> Result<(), RepositoryError> {
    sqlx::query(
        "UPDATE storefront.address SET is_default = FALSE \
         WHERE user_id = $1 AND is_default AND id <> $2",
    )
    .bind(user_id.as_i32())
    .bind(keep.as_i32())
    .execute(&mut **tx)
    .await?;
    Ok(())
}
