use anyhow::bail;
use tracing::debug;
use twilight_http::Client;
use twilight_model::{
    guild::Member,
    id::{
        Id,
        marker::{GuildMarker, UserMarker},
    },
    util::ImageHash,
};

/// Maximum number of members Discord returns per page.
const PAGE_LIMIT: u16 = 1000;

/// Fetch every member of a guild, following `after` cursors until a short page.
pub async fn fetch_all_guild_members(
    http: &Client,
    guild_id: Id<GuildMarker>,
) -> anyhow::Result<Vec<Member>> {
    let mut members: Vec<Member> = Vec::new();
    let mut after: Option<Id<UserMarker>> = None;

    loop {
        let page = match after {
            Some(after_id) => {
                http.guild_members(guild_id)
                    .after(after_id)
                    .limit(PAGE_LIMIT)
                    .await?
            }
            None => http.guild_members(guild_id).limit(PAGE_LIMIT).await?,
        }
        .model()
        .await?;

        let page_len = page.len();
        let last = page.last().map(|member| member.user.id);
        members.extend(page);

        if page_len < usize::from(PAGE_LIMIT) {
            debug!(guild_id = guild_id.get(), fetched = members.len(), "listed guild members");
            return Ok(members);
        }

        after = Some(advance_cursor(after, last)?);
    }
}

/// Cursor for the next page. Fails when the listing stops moving forward.
fn advance_cursor(
    after: Option<Id<UserMarker>>,
    last: Option<Id<UserMarker>>,
) -> anyhow::Result<Id<UserMarker>> {
    match last {
        Some(last) if Some(last) > after => Ok(last),
        _ => bail!("member listing did not advance past {after:?}"),
    }
}

/// Name shown for a member: guild nickname, then global name, then account name.
pub fn member_display_name(member: &Member) -> String {
    member
        .nick
        .clone()
        .or_else(|| member.user.global_name.clone())
        .unwrap_or_else(|| member.user.name.clone())
}

/// Avatar URL for a member, preferring their guild-specific avatar.
pub fn member_avatar_url(guild_id: Id<GuildMarker>, member: &Member) -> String {
    match member.avatar {
        Some(hash) => format!(
            "https://cdn.discordapp.com/guilds/{}/users/{}/avatars/{}.png?size=256",
            guild_id.get(),
            member.user.id.get(),
            hash
        ),
        None => user_avatar_url(member.user.id, member.user.avatar),
    }
}

/// Avatar URL for a user, falling back to Discord's default avatars.
pub fn user_avatar_url(user_id: Id<UserMarker>, avatar: Option<ImageHash>) -> String {
    match avatar {
        Some(hash) => format!(
            "https://cdn.discordapp.com/avatars/{}/{}.png?size=256",
            user_id.get(),
            hash
        ),
        None => {
            let default_avatar_index = (user_id.get() >> 22) % 6;
            format!(
                "https://cdn.discordapp.com/embed/avatars/{}.png",
                default_avatar_index
            )
        }
    }
}
