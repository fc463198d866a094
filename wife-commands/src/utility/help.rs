use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{COMMANDS, CommandMeta};
use wife_core::Context;
use wife_utils::embed::build_image_embed;

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!help",
};

/// Render the command catalog grouped by category.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let embed = build_image_embed("Commands", help_description(COMMANDS), None)?;
    ctx.http
        .create_message(msg.channel_id)
        .embeds(&[embed])
        .await?;

    Ok(())
}

fn help_description(commands: &[CommandMeta]) -> String {
    let mut categories: Vec<&str> = commands.iter().map(|c| c.category).collect();
    categories.sort_unstable();
    categories.dedup();

    categories
        .into_iter()
        .map(|category| {
            let lines = commands
                .iter()
                .filter(|command| command.category == category)
                .map(|command| format!("`{}` {}", command.usage, command.desc))
                .collect::<Vec<_>>()
                .join("\n");
            format!("**{category}**\n{lines}")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_commands_by_category() {
        let description = help_description(COMMANDS);

        assert!(description.starts_with("**fun**\n`!wife`"));
        assert!(description.contains("**utility**\n`!help` Lists out all available commands."));
    }
}
