//! # Main Entry Point
//!
//! Wires the layers together:
//! - Domain: Configuration, Types and Traits
//! - Infrastructure: Discord, Riot, Media Providers, Record Stores
//! - Application: Verifier, Router, Deferred Executor, Fallback Engine
//! - Interface: Webhook and Command Handlers
//!
//! `serve` (default) runs the webhook server; `announce-birthdays` and
//! `register-commands` are one-shot jobs meant for cron and deploys.

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::birthday::{announce_birthdays, local_now, run_daily};
use crate::application::deferred::DeferredExecutor;
use crate::application::router::{CommandContext, CommandRouter};
use crate::application::verifier::SignatureVerifier;
use crate::domain::config::{AppConfig, Secrets, StoreConfig};
use crate::domain::traits::{RecordStore, StatsApi};
use crate::infrastructure::discord::DiscordClient;
use crate::infrastructure::media::{build_media_service, http_client};
use crate::infrastructure::riot::RiotClient;
use crate::infrastructure::store::FileStore;
use crate::interface::webhook::{AppState, build_router};
use crate::strings::logs;

#[derive(Parser, Debug)]
#[command(name = "gbm-bot", version, about = "Discord interactions bot")]
struct Cli {
    /// Path to the YAML configuration
    #[arg(long, default_value = "data/config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Run the webhook server (default)
    Serve,
    /// Post today's birthdays once and exit
    AnnounceBirthdays,
    /// Upload the slash-command definitions and exit
    RegisterCommands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let (config, secrets) = AppConfig::load(&cli.config)?;

    // 2. Logging Setup
    let _guard = application::logging::init(&config.system.log_dir)?;
    tracing::info!("{}", logs::STARTING);

    // 3. Shared Infrastructure
    let http = http_client(&config.media)?;
    let discord = Arc::new(DiscordClient::new(
        http.clone(),
        config.discord.api_base.clone(),
        secrets.bot_token.clone(),
    ));

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, secrets, http, discord).await,
        Command::AnnounceBirthdays => announce(config, discord).await,
        Command::RegisterCommands => register(config, discord).await,
    }
}

async fn open_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
    #[cfg(feature = "redis")]
    if let Some(url) = &config.redis_url {
        let store = infrastructure::store::RedisStore::connect(url).await?;
        tracing::info!("{}", logs::store_opened("redis", url));
        return Ok(Arc::new(store));
    }
    #[cfg(not(feature = "redis"))]
    if config.redis_url.is_some() {
        tracing::warn!("store.redis_url is set but the redis feature is disabled; using the JSON file store");
    }

    let store = FileStore::open(&config.path).await?;
    tracing::info!("{}", logs::store_opened("json", &config.path));
    Ok(Arc::new(store))
}

async fn serve(config: AppConfig, secrets: Secrets, http: reqwest::Client, discord: Arc<DiscordClient>) -> Result<()> {
    let store = open_store(&config.store).await?;
    let stats: Arc<dyn StatsApi> = Arc::new(RiotClient::new(
        http.clone(),
        secrets.riot_api_key.clone(),
        &config.riot.region,
        &config.riot.platform,
    ));
    let media = Arc::new(build_media_service(&config.media, &http));

    // Birthday Background Loop
    if config.birthdays.enabled {
        if let Some(channel_id) = config.birthdays.channel_id.clone() {
            tokio::spawn(run_daily(
                config.birthdays.clone(),
                channel_id,
                store.clone(),
                discord.clone(),
            ));
        }
    }

    let executor = DeferredExecutor::new(discord.clone());
    let bind = config.server.bind.clone();
    let path = config.server.path.clone();

    let ctx = Arc::new(CommandContext {
        config,
        store,
        stats,
        media,
    });
    let state = Arc::new(AppState {
        verifier: SignatureVerifier::new(&secrets.public_key)?,
        router: CommandRouter::new(ctx),
        executor: executor.clone(),
    });

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    tracing::info!("{}", logs::listening(&bind, &path));

    axum::serve(listener, build_router(state, &path))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("{}", logs::SHUTDOWN);
    executor.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("{}", logs::shutdown_fail(&e.to_string()));
        std::future::pending::<()>().await;
    }
}

async fn announce(config: AppConfig, discord: Arc<DiscordClient>) -> Result<()> {
    let channel_id = config
        .birthdays
        .channel_id
        .as_deref()
        .context("birthdays.channel_id is not configured")?;
    let store = open_store(&config.store).await?;
    let (today, _) = local_now(&config.birthdays);
    announce_birthdays(store.as_ref(), discord.as_ref(), channel_id, today).await?;
    Ok(())
}

async fn register(config: AppConfig, discord: Arc<DiscordClient>) -> Result<()> {
    let application_id = config
        .discord
        .application_id
        .as_deref()
        .context("discord.application_id is required to register commands")?;
    let guild_id = config.discord.guild_id.as_deref();
    let count = discord
        .register_commands(application_id, guild_id, &strings::commands::definitions())
        .await?;
    let scope = guild_id.map(|g| format!("guild {g}")).unwrap_or_else(|| "global".to_string());
    tracing::info!("{}", logs::commands_registered(count, &scope));
    Ok(())
}
