use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, migrate::Migrator};

use crate::assignment::{Assignment, GuildScope};
use crate::error::StoreResult;
use crate::store::{AssignmentStore, ExpiryStrategy};

/// Compile-time discovered SQLx migrations for the `wife-database` crate.
pub static MIGRATOR: Migrator = sqlx::migrate!();

#[derive(Debug, FromRow)]
struct AssignmentRow {
    guild_scope: String,
    requester_id: i64,
    assignee_id: i64,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<AssignmentRow> for Assignment {
    fn from(row: AssignmentRow) -> Self {
        Self {
            guild_scope: GuildScope::new(row.guild_scope),
            requester_id: row.requester_id as u64,
            assignee_id: row.assignee_id as u64,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

/// Assignment table in Postgres, cleared in bulk by the daily sweep.
///
/// Reads also filter on `expires_at` so a sweep missed while the bot was
/// offline does not resurrect yesterday's pairings.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a store from an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> StoreResult<()> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl AssignmentStore for PostgresStore {
    async fn find(
        &self,
        scope: &GuildScope,
        requester_id: u64,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Assignment>> {
        let row = sqlx::query_as::<_, AssignmentRow>(
            "SELECT guild_scope, requester_id, assignee_id, created_at, expires_at \
             FROM wife_assignments \
             WHERE guild_scope = $1 AND requester_id = $2 AND expires_at > $3 \
             ORDER BY id DESC \
             LIMIT 1",
        )
        .bind(scope.as_str())
        .bind(requester_id as i64)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Assignment::from))
    }

    async fn create(&self, assignment: &Assignment) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM wife_assignments WHERE guild_scope = $1 AND requester_id = $2")
            .bind(assignment.guild_scope.as_str())
            .bind(assignment.requester_id as i64)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO wife_assignments \
             (guild_scope, requester_id, assignee_id, created_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(assignment.guild_scope.as_str())
        .bind(assignment.requester_id as i64)
        .bind(assignment.assignee_id as i64)
        .bind(assignment.created_at)
        .bind(assignment.expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_assignee_ids(
        &self,
        scope: &GuildScope,
        now: DateTime<Utc>,
    ) -> StoreResult<HashSet<u64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT DISTINCT assignee_id FROM wife_assignments \
             WHERE guild_scope = $1 AND expires_at > $2",
        )
        .bind(scope.as_str())
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(|id| id as u64).collect())
    }

    async fn clear_expired(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM wife_assignments WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn clear_all(&self) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM wife_assignments")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    fn expiry_strategy(&self) -> ExpiryStrategy {
        ExpiryStrategy::Sweep
    }
}
