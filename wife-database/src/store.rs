use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::assignment::{Assignment, GuildScope};
use crate::error::StoreResult;

/// How a backend bounds the lifetime of its assignments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpiryStrategy {
    /// Every record carries its own expiry; reads skip expired records.
    Passive,
    /// A daily task at the cutoff hour clears the whole table.
    Sweep,
}

/// Storage contract for daily assignments.
///
/// Implementations must never return an assignment whose `expires_at` is at
/// or before `now`.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Active assignment for `requester_id` in `scope`, if any.
    async fn find(
        &self,
        scope: &GuildScope,
        requester_id: u64,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Assignment>>;

    /// Store a new assignment, replacing any previous one for the same key.
    async fn create(&self, assignment: &Assignment) -> StoreResult<()>;

    /// Members already picked by someone in `scope` during the current period.
    async fn list_assignee_ids(
        &self,
        scope: &GuildScope,
        now: DateTime<Utc>,
    ) -> StoreResult<HashSet<u64>>;

    /// Drop expired records. Returns how many were removed.
    async fn clear_expired(&self, now: DateTime<Utc>) -> StoreResult<u64>;

    /// Drop every record regardless of expiry. Returns how many were removed.
    async fn clear_all(&self) -> StoreResult<u64>;

    fn expiry_strategy(&self) -> ExpiryStrategy;
}
