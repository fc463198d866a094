use std::sync::Arc;

use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, info};

use wife_core::StorageConfig;
use wife_database::{AssignmentStore, ExpiryStrategy, MemoryStore, PostgresStore};
use wife_utils::schedule::{spawn_daily, spawn_interval};

/// How often the in-memory cache drops entries that have already expired.
const PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Open the configured assignment backend.
pub async fn connect_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn AssignmentStore>> {
    match config {
        StorageConfig::Memory => {
            info!("Using in-memory assignment store.");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageConfig::Postgres { database_url } => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            info!("PostgreSQL connection established.");

            let store = PostgresStore::new(pool);
            store.migrate().await?;
            info!("Assignment table migrations applied.");

            Ok(Arc::new(store))
        }
    }
}

/// Start the background task that bounds assignment lifetime for `store`.
pub fn spawn_expiry_task(store: Arc<dyn AssignmentStore>, cutoff_hour: u32) -> JoinHandle<()> {
    match store.expiry_strategy() {
        ExpiryStrategy::Passive => spawn_interval("assignment-purge", PURGE_INTERVAL, move || {
            let store = Arc::clone(&store);
            async move {
                let removed = store.clear_expired(Utc::now()).await?;
                debug!(removed, "purged expired assignments");
                Ok(())
            }
        }),
        ExpiryStrategy::Sweep => spawn_daily("assignment-sweep", cutoff_hour, move || {
            let store = Arc::clone(&store);
            async move {
                let removed = store.clear_all().await?;
                info!(removed, cutoff_hour, "cleared assignments at cutoff");
                Ok(())
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::DateTime;
    use tokio::time::sleep;
    use wife_database::{Assignment, GuildScope, StoreResult};

    struct CountingStore {
        strategy: ExpiryStrategy,
        expired_purges: AtomicUsize,
        full_clears: AtomicUsize,
    }

    impl CountingStore {
        fn new(strategy: ExpiryStrategy) -> Arc<Self> {
            Arc::new(Self {
                strategy,
                expired_purges: AtomicUsize::new(0),
                full_clears: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AssignmentStore for CountingStore {
        async fn find(
            &self,
            _scope: &GuildScope,
            _requester_id: u64,
            _now: DateTime<Utc>,
        ) -> StoreResult<Option<Assignment>> {
            Ok(None)
        }

        async fn create(&self, _assignment: &Assignment) -> StoreResult<()> {
            Ok(())
        }

        async fn list_assignee_ids(
            &self,
            _scope: &GuildScope,
            _now: DateTime<Utc>,
        ) -> StoreResult<HashSet<u64>> {
            Ok(HashSet::new())
        }

        async fn clear_expired(&self, _now: DateTime<Utc>) -> StoreResult<u64> {
            self.expired_purges.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }

        async fn clear_all(&self) -> StoreResult<u64> {
            self.full_clears.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }

        fn expiry_strategy(&self) -> ExpiryStrategy {
            self.strategy
        }
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_store_is_cleared_daily() {
        let store = CountingStore::new(ExpiryStrategy::Sweep);
        let handle = spawn_expiry_task(store.clone(), 4);

        // A local day is at most 25 hours long.
        sleep(Duration::from_secs(26 * 60 * 60)).await;
        handle.abort();

        assert!(store.full_clears.load(Ordering::SeqCst) >= 1);
        assert_eq!(store.expired_purges.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn passive_store_is_purged_hourly() {
        let store = CountingStore::new(ExpiryStrategy::Passive);
        let handle = spawn_expiry_task(store.clone(), 4);

        sleep(PURGE_INTERVAL * 2 + Duration::from_secs(1)).await;
        handle.abort();

        assert_eq!(store.expired_purges.load(Ordering::SeqCst), 2);
        assert_eq!(store.full_clears.load(Ordering::SeqCst), 0);
    }
}
