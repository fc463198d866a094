use twilight_model::channel::message::embed::Embed;

use wife_core::{Locale, Member};
use wife_utils::embed::build_image_embed;

/// User-facing strings of the wife command for one locale.
pub struct Messages {
    pub todays_wife_is: &'static str,
    pub you_have_no_wife: &'static str,
    pub please_use_in_guilds: &'static str,
}

static ENGLISH: Messages = Messages {
    todays_wife_is: "Your wife of the day is",
    you_have_no_wife: "you have no wife today.",
    please_use_in_guilds: "Please use this command in a server.",
};

static SIMPLIFIED_CHINESE: Messages = Messages {
    todays_wife_is: "你今天的老婆是",
    you_have_no_wife: "你今天没有老婆。",
    please_use_in_guilds: "请在群聊中使用此命令。",
};

pub fn messages(locale: Locale) -> &'static Messages {
    match locale {
        Locale::English => &ENGLISH,
        Locale::SimplifiedChinese => &SIMPLIFIED_CHINESE,
    }
}

/// What the reply shows about the drawn member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WifeProfile {
    pub id: u64,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl WifeProfile {
    /// Placeholder used when the member can no longer be resolved.
    pub fn unknown(id: u64) -> Self {
        Self {
            id,
            display_name: format!("User {id}"),
            avatar_url: None,
        }
    }
}

impl From<&Member> for WifeProfile {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            display_name: member.display_name.clone(),
            avatar_url: member.avatar_url.clone(),
        }
    }
}

/// Message content and embed announcing the requester's wife.
pub fn wife_reply(
    locale: Locale,
    requester_id: u64,
    wife: &WifeProfile,
) -> anyhow::Result<(String, Embed)> {
    let text = messages(locale);
    let content = format!("<@{requester_id}>");
    let description = format!("{} ({})", sanitize_name(&wife.display_name), wife.id);
    let embed = build_image_embed(text.todays_wife_is, description, wife.avatar_url.as_deref())?;

    Ok((content, embed))
}

pub fn no_wife_reply(locale: Locale, requester_id: u64) -> String {
    format!("<@{requester_id}> {}", messages(locale).you_have_no_wife)
}

pub fn guild_only_message(locale: Locale) -> &'static str {
    messages(locale).please_use_in_guilds
}

fn sanitize_name(name: &str) -> String {
    name.replace('@', "@\u{200B}")
}
