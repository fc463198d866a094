use std::sync::Arc;

use twilight_http::Client;
use wife_database::AssignmentStore;

/// Environment-driven runtime settings.
pub mod config;
/// Member listing seam used by the pairing engine.
pub mod directory;
/// Candidate filtering, random draw and the assignment lifecycle.
pub mod pairing;

pub use config::{ConfigError, Locale, StorageConfig, WifeConfig};
pub use directory::MemberDirectory;
pub use pairing::{FilterConfig, Member, Outcome, PairingEngine};

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub store: Arc<dyn AssignmentStore>,
    pub config: Arc<WifeConfig>,
    /// User id of the account the bot runs as.
    pub bot_user_id: u64,
}

impl Context {
    /// Create a new application context.
    pub fn new(
        http: Arc<Client>,
        store: Arc<dyn AssignmentStore>,
        config: WifeConfig,
        bot_user_id: u64,
    ) -> Self {
        Self {
            http,
            store,
            config: Arc::new(config),
            bot_user_id,
        }
    }

    /// Pairing engine bound to this context's store and settings.
    pub fn pairing_engine(&self) -> PairingEngine {
        PairingEngine::new(
            Arc::clone(&self.store),
            self.config.filter,
            self.config.cutoff_hour,
        )
    }
}
