use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::{EmbedBuilder, ImageSource};

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0xE9_1E_63;

/// Build an embed with a title, a description and an optional large image.
pub fn build_image_embed(
    title: &str,
    description: impl Into<String>,
    image_url: Option<&str>,
) -> anyhow::Result<Embed> {
    let builder = EmbedBuilder::new()
        .title(title)
        .color(DEFAULT_EMBED_COLOR)
        .description(description);

    let builder = match image_url {
        Some(url) => builder.image(ImageSource::url(url.to_owned())?),
        None => builder,
    };

    Ok(builder.validate()?.build())
}
