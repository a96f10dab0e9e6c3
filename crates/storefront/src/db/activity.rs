//! Activity log repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use jolananas_core::{ActivityId, UserId};

use super::RepositoryError;
use crate::models::activity::{ActivityEntry, ActivityKind};

/// Upper bound on entries returned by [`ActivityRepository::recent`].
pub const MAX_ACTIVITY_LIMIT: i64 = 100;

#[derive(sqlx::FromRow)]
struct ActivityRow {
    id: i32,
    user_id: i32,
    kind: String,
    detail: Option<serde_json::Value>,
    ip_address: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ActivityRow> for ActivityEntry {
    type Error = RepositoryError;

    fn try_from(r: ActivityRow) -> Result<Self, Self::Error> {
        let kind = r
            .kind
            .parse::<ActivityKind>()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: ActivityId::new(r.id),
            user_id: UserId::new(r.user_id),
            kind,
            detail: r.detail,
            ip_address: r.ip_address,
            created_at: r.created_at,
        })
    }
}

/// Repository for the account activity log.
pub struct ActivityRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ActivityRepository<'a> {
    /// Create a new activity repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append an entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record(
        &self,
        user_id: UserId,
        kind: ActivityKind,
        detail: Option<serde_json::Value>,
        ip_address: Option<&str>,
    ) -> Result<ActivityEntry, RepositoryError> {
        let row = sqlx::query_as::<_, ActivityRow>(
            r"
            INSERT INTO storefront.activity_log (user_id, kind, detail, ip_address)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, kind, detail, ip_address, created_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(kind.as_str())
        .bind(detail)
        .bind(ip_address)
        .fetch_one(self.pool)
        .await?;

        ActivityEntry::try_from(row)
    }

    /// Most recent entries first, at most `limit` (clamped to 1..=100).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<ActivityEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r"
            SELECT id, user_id, kind, detail, ip_address, created_at
            FROM storefront.activity_log
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            ",
        )
        .bind(user_id.as_i32())
        .bind(limit.clamp(1, MAX_ACTIVITY_LIMIT))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ActivityEntry::try_from).collect()
    }
}
