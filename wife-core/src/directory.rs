use async_trait::async_trait;

use wife_database::GuildScope;

use crate::pairing::Member;

/// Source of the full, depaginated member list of a guild scope.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn list_members(&self, scope: &GuildScope) -> anyhow::Result<Vec<Member>>;
}
