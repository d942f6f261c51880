mod commands;
mod config;
mod error;
mod handlers;
mod models;
mod presentation;
mod registry;
mod tasks;
mod voting;

use config::Config;
use registry::PollRegistry;
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::{Activity, Ready};
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use log::{error, info};
use tasks::shutdown::ShutdownSignal;

struct Bot {
    registry: Arc<PollRegistry>,
    guild_id: Option<GuildId>,
    heartbeat_started: AtomicBool,
}

#[async_trait]
impl EventHandler for Bot {
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let registry = Arc::clone(&self.registry);

        // Spawn a task to handle the interaction concurrently
        tokio::spawn(async move {
            handlers::handle_interaction(&registry, &ctx, interaction).await;
        });
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        ctx.set_activity(Activity::watching("tier list votes | /tier-vote")).await;

        match commands::register_commands(&ctx, self.guild_id).await {
            Ok(()) => match self.guild_id {
                Some(guild_id) => info!("Registered slash commands on guild {}", guild_id),
                None => info!("Successfully registered global slash commands."),
            },
            Err(why) => error!("Failed to register slash commands: {:?}", why),
        }

        // Ready fires again on reconnect; only one heartbeat per process.
        if !self.heartbeat_started.swap(true, Ordering::SeqCst) {
            let registry = Arc::clone(&self.registry);
            tokio::spawn(async move {
                tasks::heartbeat::heartbeat_task(registry).await;
            });
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let registry = Arc::new(PollRegistry::new());

    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES;

    let mut client = match Client::builder(&config.token, intents)
        .event_handler(Bot {
            registry: Arc::clone(&registry),
            guild_id: config.guild_id,
            heartbeat_started: AtomicBool::new(false),
        })
        .await
    {
        Ok(client) => client,
        Err(e) => {
            error!("Error creating client: {:?}", e);
            return;
        }
    };

    let mut shutdown = match ShutdownSignal::new() {
        Ok(shutdown) => shutdown,
        Err(e) => {
            error!("Could not listen for shutdown signals: {}", e);
            return;
        }
    };

    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        tasks::shutdown::drain_on(shutdown.recv(), &registry).await;
        shard_manager.lock().await.shutdown_all().await;
    });

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }
}
