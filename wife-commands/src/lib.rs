pub mod fun;
pub mod utility;

use tracing::debug;
use twilight_model::gateway::payload::incoming::MessageCreate;

use wife_core::Context;
use wife_utils::COMMAND_PREFIX;
use wife_utils::parse::parse_command;

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    fun::wife::META,
    utility::help::META,
    // Add new commands here
];

pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let Some(name) = parse_command(&msg.content, COMMAND_PREFIX) else {
        return Ok(());
    };

    debug!(
        command = %name,
        author_id = msg.author.id.get(),
        guild_id = msg.guild_id.map(|id| id.get()),
        "dispatching message command"
    );

    match name.as_str() {
        "wife" => fun::wife::run(ctx, msg).await?,
        "help" => utility::help::run(ctx, msg).await?,
        // Add new commands here
        _ => {}
    }

    Ok(())
}
