use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::Client;
use twilight_model::{
    guild,
    id::{Id, marker::GuildMarker},
};

use wife_core::{Member, MemberDirectory};
use wife_database::GuildScope;
use wife_utils::members::{fetch_all_guild_members, member_avatar_url, member_display_name};

/// Member directory backed by the Discord REST API for a single guild.
pub struct DiscordMemberDirectory {
    http: Arc<Client>,
    guild_id: Id<GuildMarker>,
    bot_user_id: u64,
}

impl DiscordMemberDirectory {
    pub fn new(http: Arc<Client>, guild_id: Id<GuildMarker>, bot_user_id: u64) -> Self {
        Self {
            http,
            guild_id,
            bot_user_id,
        }
    }
}

#[async_trait]
impl MemberDirectory for DiscordMemberDirectory {
    async fn list_members(&self, _scope: &GuildScope) -> anyhow::Result<Vec<Member>> {
        let members = fetch_all_guild_members(&self.http, self.guild_id).await?;

        Ok(members
            .iter()
            .map(|member| to_candidate(self.guild_id, member, self.bot_user_id))
            .collect())
    }
}

/// Map a twilight guild member onto the engine's view of a member.
pub fn to_candidate(guild_id: Id<GuildMarker>, member: &guild::Member, bot_user_id: u64) -> Member {
    Member {
        id: member.user.id.get(),
        display_name: member_display_name(member),
        avatar_url: Some(member_avatar_url(guild_id, member)),
        is_bot: member.user.bot,
        is_self: member.user.id.get() == bot_user_id,
    }
}
