use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::assignment::{Assignment, GuildScope};
use crate::error::StoreResult;
use crate::store::{AssignmentStore, ExpiryStrategy};

type ScopeEntries = HashMap<u64, Assignment>;

/// Process-local assignment cache with per-entry expiry.
///
/// Entries stay in the map after they expire until `clear_expired` runs, but
/// are invisible to every read.
#[derive(Default)]
pub struct MemoryStore {
    scopes: RwLock<HashMap<GuildScope, ScopeEntries>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, expired ones included.
    pub async fn len(&self) -> usize {
        self.scopes.read().await.values().map(HashMap::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AssignmentStore for MemoryStore {
    async fn find(
        &self,
        scope: &GuildScope,
        requester_id: u64,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Assignment>> {
        let scopes = self.scopes.read().await;
        let assignment = scopes
            .get(scope)
            .and_then(|entries| entries.get(&requester_id))
            .filter(|assignment| assignment.is_active_at(now))
            .cloned();

        Ok(assignment)
    }

    async fn create(&self, assignment: &Assignment) -> StoreResult<()> {
        let mut scopes = self.scopes.write().await;
        scopes
            .entry(assignment.guild_scope.clone())
            .or_default()
            .insert(assignment.requester_id, assignment.clone());

        Ok(())
    }

    async fn list_assignee_ids(
        &self,
        scope: &GuildScope,
        now: DateTime<Utc>,
    ) -> StoreResult<HashSet<u64>> {
        let scopes = self.scopes.read().await;
        let ids = scopes
            .get(scope)
            .map(|entries| {
                entries
                    .values()
                    .filter(|assignment| assignment.is_active_at(now))
                    .map(|assignment| assignment.assignee_id)
                    .collect()
            })
            .unwrap_or_default();

        Ok(ids)
    }

    async fn clear_expired(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let mut scopes = self.scopes.write().await;
        let mut removed = 0_u64;

        for entries in scopes.values_mut() {
            let before = entries.len();
            entries.retain(|_, assignment| assignment.is_active_at(now));
            removed = removed.saturating_add((before - entries.len()) as u64);
        }
        scopes.retain(|_, entries| !entries.is_empty());

        Ok(removed)
    }

    async fn clear_all(&self) -> StoreResult<u64> {
        let mut scopes = self.scopes.write().await;
        let removed = scopes.values().map(HashMap::len).sum::<usize>() as u64;
        scopes.clear();

        Ok(removed)
    }

    fn expiry_strategy(&self) -> ExpiryStrategy {
        ExpiryStrategy::Passive
    }
}
