/// The assignment record and its scope key.
pub mod assignment;
pub mod error;
/// Process-local backend with passive expiry.
pub mod memory;
/// Postgres backend cleared by the daily sweep.
pub mod postgres;
/// Storage contract shared by every backend.
pub mod store;

pub use assignment::{Assignment, GuildScope};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::{MIGRATOR, PostgresStore};
pub use store::{AssignmentStore, ExpiryStrategy};
