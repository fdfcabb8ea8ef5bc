//! Gateway client setup and event handling.
//!
//! # Responsibilities
//! - Build the command framework and gateway client
//! - Dispatch gateway events: ready, member joins, guild changes
//! - Keep the shared guild count current for the health endpoint
//! - Start the DM round task exactly once, surviving reconnects
//!
//! # Design Decisions
//! - The live ChatPort and everything built on it are assembled in the
//!   framework setup hook, where the HTTP client first exists
//! - Cache lookups (does the welcome channel/role exist?) happen here, so
//!   the greeter itself stays free of gateway types

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use poise::serenity_prelude as serenity;

use crate::config::BotConfig;
use crate::discord::commands;
use crate::discord::greeter::Greeter;
use crate::discord::notifier::AdminNotifier;
use crate::discord::port::{ChatPort, SerenityChat};
use crate::discord::Error;
use crate::lifecycle::Shutdown;
use crate::tasks::DmRound;

/// State shared with every command and event handler.
pub struct Data {
    pub config: Arc<BotConfig>,
    pub greeter: Arc<Greeter>,
    pub dm_round: Arc<DmRound>,
    pub guild_count: Arc<AtomicUsize>,
    pub shutdown: Arc<Shutdown>,
}

/// Connect to the gateway and run until shutdown.
///
/// Returns when the shard manager drains, whether that came from Ctrl+C
/// or from the restart command.
pub async fn run(
    token: &str,
    config: Arc<BotConfig>,
    guild_count: Arc<AtomicUsize>,
    shutdown: Arc<Shutdown>,
) -> Result<(), serenity::Error> {
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let prefix = config.discord.command_prefix.clone();
    let setup_config = Arc::clone(&config);
    let setup_guild_count = Arc::clone(&guild_count);
    let setup_shutdown = Arc::clone(&shutdown);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![commands::restart()],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            on_error: |error| Box::pin(commands::on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!(
                    user = %ready.user.name,
                    "Logged in, slash commands registered"
                );

                let port: Arc<dyn ChatPort> = Arc::new(SerenityChat::new(ctx.http.clone()));
                let notifier = Arc::new(AdminNotifier::new(
                    Arc::clone(&port),
                    &setup_config.roster,
                ));
                let greeter = Arc::new(Greeter::new(
                    Arc::clone(&port),
                    Arc::clone(&notifier),
                    &setup_config.welcome,
                ));
                let dm_round = Arc::new(DmRound::new(port, notifier, &setup_config.roster));

                Ok(Data {
                    config: setup_config,
                    greeter,
                    dm_round,
                    guild_count: setup_guild_count,
                    shutdown: setup_shutdown,
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    // Whatever triggers shutdown (Ctrl+C here, or the restart command via
    // the broadcast channel), this watcher is the one place that drains
    // the shards so client.start() can return.
    let shard_manager = client.shard_manager.clone();
    let mut shutdown_rx = shutdown.subscribe();
    let signal_shutdown = Arc::clone(&shutdown);
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_signal() => {
                signal_shutdown.trigger();
            }
            _ = shutdown_rx.recv() => {}
        }
        shard_manager.shutdown_all().await;
    });

    client.start().await
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            data.guild_count
                .store(data_about_bot.guilds.len(), Ordering::Relaxed);
            tracing::info!(
                user = %data_about_bot.user.name,
                guilds = data_about_bot.guilds.len(),
                "Gateway ready"
            );

            // Ready fires again on every reconnect; start() is a no-op
            // after the first call.
            if Arc::clone(&data.dm_round).start(data.shutdown.subscribe()) {
                tracing::info!("DM round task started");
            } else {
                tracing::info!("DM round task already running, skipping start");
            }
        }
        serenity::FullEvent::CacheReady { guilds } => {
            data.guild_count.store(guilds.len(), Ordering::Relaxed);
        }
        serenity::FullEvent::GuildCreate { .. } | serenity::FullEvent::GuildDelete { .. } => {
            data.guild_count
                .store(ctx.cache.guild_count(), Ordering::Relaxed);
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            let welcome = &data.config.welcome;
            let (channel_in_guild, role_in_guild) = match ctx.cache.guild(new_member.guild_id) {
                Some(guild) => (
                    welcome.channel_id != 0
                        && guild
                            .channels
                            .contains_key(&serenity::ChannelId::new(welcome.channel_id)),
                    welcome.role_id != 0
                        && guild
                            .roles
                            .contains_key(&serenity::RoleId::new(welcome.role_id)),
                ),
                None => (false, false),
            };

            data.greeter
                .handle_join(
                    &new_member.user.name,
                    new_member.user.id,
                    channel_in_guild,
                    role_in_guild,
                )
                .await;
        }
        _ => {}
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
