mod storage;

use std::env;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::event::Event;

use rustls::crypto::ring::default_provider;

use wife_commands::handle_message;
use wife_core::{Context, WifeConfig};

use crate::storage::{connect_store, spawn_expiry_task};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load the .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    let token = env::var("DISCORD_TOKEN")?;
    let config = WifeConfig::from_env()?;
    info!(
        cutoff_hour = config.cutoff_hour,
        filter = ?config.filter,
        locale = ?config.locale,
        "Configuration loaded."
    );

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(token.clone()));
    let bot_user = http.current_user().await?.model().await?;

    let store = connect_store(&config.storage).await?;
    let _expiry_task = spawn_expiry_task(Arc::clone(&store), config.cutoff_hour);

    let ctx = Context::new(Arc::clone(&http), store, config, bot_user.id.get());

    // Member listing needs the privileged GUILD_MEMBERS intent
    let intents = Intents::GUILDS
        | Intents::GUILD_MEMBERS
        | Intents::GUILD_MESSAGES
        | Intents::MESSAGE_CONTENT;

    let mut shard = Shard::new(ShardId::new(0, 1), token, intents);

    info!(bot_user_id = bot_user.id.get(), "Connecting to the gateway...");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        match event {
            Event::Ready(_) => {
                info!("Shard is ready.");
            }
            Event::MessageCreate(msg) => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    if let Err(source) = handle_message(ctx, msg).await {
                        error!(?source, "message command failed");
                    }
                });
            }
            _ => {} // Ignore unused events
        }
    }

    Ok(())
}
