use std::sync::Arc;

use chrono::Local;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};
use twilight_http::Client;
use twilight_model::{
    gateway::payload::incoming::MessageCreate,
    id::{Id, marker::GuildMarker},
};

use crate::CommandMeta;
use crate::fun::directory::{DiscordMemberDirectory, to_candidate};
use crate::fun::messages::{WifeProfile, guild_only_message, no_wife_reply, wife_reply};
use wife_core::{Context, Locale, Outcome};
use wife_database::GuildScope;

pub const META: CommandMeta = CommandMeta {
    name: "wife",
    desc: "Draw your wife of the day from the members of this server.",
    category: "fun",
    usage: "!wife",
};

/// Reply with the author's wife of the day, drawing one if needed.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let locale = ctx.config.locale;

    let (guild_id, scope) = match resolve_scope(msg.guild_id, locale) {
        Ok(resolved) => resolved,
        Err(reply) => {
            http.create_message(msg.channel_id).content(reply).await?;
            return Ok(());
        }
    };

    let requester_id = msg.author.id.get();
    let directory = DiscordMemberDirectory::new(Arc::clone(http), guild_id, ctx.bot_user_id);
    let mut rng = StdRng::from_entropy();

    let outcome = ctx
        .pairing_engine()
        .get_or_create(&scope, requester_id, &directory, &Local::now(), &mut rng)
        .await?;

    let wife = match outcome {
        Outcome::Existing(assignment) => {
            fetch_wife_profile(http, guild_id, assignment.assignee_id, ctx.bot_user_id).await
        }
        Outcome::Created { assignee, .. } => WifeProfile::from(&assignee),
        Outcome::NoCandidate => {
            http.create_message(msg.channel_id)
                .content(&no_wife_reply(locale, requester_id))
                .await?;
            return Ok(());
        }
    };

    debug!(scope = %scope, requester_id, assignee_id = wife.id, "replying with wife");
    let (content, embed) = wife_reply(locale, requester_id, &wife)?;
    http.create_message(msg.channel_id)
        .content(&content)
        .embeds(&[embed])
        .await?;

    Ok(())
}

/// Pairing scope of the channel, or the reply to send when it is not a guild.
fn resolve_scope(
    guild_id: Option<Id<GuildMarker>>,
    locale: Locale,
) -> Result<(Id<GuildMarker>, GuildScope), &'static str> {
    match guild_id {
        Some(guild_id) => Ok((guild_id, GuildScope::discord(guild_id.get()))),
        None => Err(guild_only_message(locale)),
    }
}

/// Resolve a stored assignee for display, falling back to a bare id.
async fn fetch_wife_profile(
    http: &Client,
    guild_id: Id<GuildMarker>,
    assignee_id: u64,
    bot_user_id: u64,
) -> WifeProfile {
    let member = match http.guild_member(guild_id, Id::new(assignee_id)).await {
        Ok(response) => response.model().await,
        Err(source) => {
            warn!(?source, assignee_id, "failed to fetch stored wife");
            return WifeProfile::unknown(assignee_id);
        }
    };

    match member {
        Ok(member) => WifeProfile::from(&to_candidate(guild_id, &member, bot_user_id)),
        Err(source) => {
            warn!(?source, assignee_id, "failed to decode stored wife");
            WifeProfile::unknown(assignee_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_messages_get_the_guild_only_reply() {
        assert_eq!(
            resolve_scope(None, Locale::English),
            Err("Please use this command in a server.")
        );
        assert_eq!(
            resolve_scope(None, Locale::SimplifiedChinese),
            Err("请在群聊中使用此命令。")
        );
    }

    #[test]
    fn guild_messages_are_scoped_to_the_guild() {
        let guild_id = Id::new(1234);

        assert_eq!(
            resolve_scope(Some(guild_id), Locale::English),
            Ok((guild_id, GuildScope::discord(1234)))
        );
    }
}
