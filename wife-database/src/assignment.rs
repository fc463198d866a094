use std::fmt;

use chrono::{DateTime, Utc};

/// Isolation boundary for pairings.
///
/// Two scopes never see each other's assignments, even when the same user is
/// a member of both.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GuildScope(String);

impl GuildScope {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Scope of a Discord guild, prefixed with the platform name.
    pub fn discord(guild_id: u64) -> Self {
        Self(format!("discord:{guild_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuildScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A daily requester -> assignee pairing.
///
/// Records are never mutated. A new day produces a new record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub guild_scope: GuildScope,
    pub requester_id: u64,
    pub assignee_id: u64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Assignment {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}
