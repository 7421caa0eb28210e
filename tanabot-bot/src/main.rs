mod events;
mod snapshot;

use serenity::all::{
    Client, Context, EventHandler, GatewayIntents, Message, Ready,
};
use serenity::async_trait;
use tracing::info;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;

use tanabot_core::{Config, Data};
use tanabot_dispatch::Registry;

struct Handler {
    data: Data,
    registry: Registry<Context>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "TanaBot is ready!");
    }

    async fn message(&self, ctx: Context, message: Message) {
        events::message::handle_message(&ctx, &self.data, &self.registry, &message).await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let token = config.token.clone();
    let data = Data::new(config);

    let registry = Registry::new(tanabot_commands::commands())?;
    info!(commands = registry.len(), "command registry loaded");

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::DIRECT_MESSAGE_REACTIONS
        | GatewayIntents::MESSAGE_CONTENT;

    info!("TanaBot is connecting...");

    let mut client = Client::builder(&token, intents)
        .event_handler(Handler { data, registry })
        .await?;

    client.start().await?;
    Ok(())
}
