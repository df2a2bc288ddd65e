//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Secrets may be given inline or through the name of an environment variable; both are
//! resolved once in [`AppConfig::load`] so that a missing credential fails at startup.

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::domain::types::{MediaPlatform, ProviderKind};

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub discord: DiscordConfig,
    pub riot: RiotConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub birthdays: BirthdayConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_webhook_path")]
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            path: default_webhook_path(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_webhook_path() -> String {
    "/api/interactions".to_string()
}

/// Discord application settings.
#[derive(Debug, Deserialize, Clone)]
pub struct DiscordConfig {
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub public_key_env: Option<String>, // e.g. "DISCORD_PUBLIC_KEY"
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default)]
    pub bot_token_env: Option<String>, // e.g. "DISCORD_TOKEN"
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

/// Riot Games API settings.
#[derive(Debug, Deserialize, Clone)]
pub struct RiotConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>, // e.g. "RIOT_API_TOKEN"
    /// Regional routing (account-v1, match-v5)
    #[serde(default = "default_region")]
    pub region: String,
    /// Platform routing (league-v4)
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_match_history")]
    pub match_history: usize,
}

fn default_region() -> String {
    "europe".to_string()
}
fn default_platform() -> String {
    "euw1".to_string()
}
fn default_match_history() -> usize {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    /// Upload cap enforced before handing media to Discord.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
    #[serde(default = "default_yt_dlp")]
    pub yt_dlp_binary: String,
    /// Provider priority per platform. Order is the fallback order.
    #[serde(default = "default_providers")]
    pub providers: HashMap<MediaPlatform, Vec<ProviderKind>>,
    /// Endpoint overrides for the API providers, e.g. a self-hosted cobalt.
    #[serde(default)]
    pub endpoints: HashMap<ProviderKind, String>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            provider_timeout_secs: default_provider_timeout(),
            download_timeout_secs: default_download_timeout(),
            yt_dlp_binary: default_yt_dlp(),
            providers: default_providers(),
            endpoints: HashMap::new(),
        }
    }
}

impl MediaConfig {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 8 * 1024 * 1024;

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}
fn default_provider_timeout() -> u64 {
    30
}
fn default_download_timeout() -> u64 {
    60
}
fn default_yt_dlp() -> String {
    "yt-dlp".to_string()
}

fn default_providers() -> HashMap<MediaPlatform, Vec<ProviderKind>> {
    HashMap::from([
        (
            MediaPlatform::TikTok,
            vec![ProviderKind::TikWm, ProviderKind::LoveTik],
        ),
        (
            MediaPlatform::Instagram,
            vec![
                ProviderKind::Cobalt,
                ProviderKind::OpenGraph,
                ProviderKind::YtDlp,
            ],
        ),
    ])
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
    #[serde(default)]
    pub redis_url: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            redis_url: None,
        }
    }
}

fn default_store_path() -> String {
    "data/records.json".to_string()
}

/// Daily birthday announcement settings.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct BirthdayConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub announce_hour: u32,
    /// Offset from UTC used to decide what "today" is.
    #[serde(default)]
    pub utc_offset_hours: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SystemConfig {
    #[serde(default = "default_source_url")]
    pub source_url: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            log_dir: default_log_dir(),
        }
    }
}

fn default_source_url() -> String {
    "https://github.com/haeffema/gbm-discord-bot".to_string()
}
fn default_log_dir() -> String {
    "data".to_string()
}

/// Secrets after inline/env resolution.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub public_key: [u8; 32],
    pub bot_token: String,
    pub riot_api_key: String,
}

impl AppConfig {
    /// Reads, parses and validates the configuration, resolving all secrets.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, Secrets)> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<(Self, Secrets)> {
        let config: AppConfig =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;
        let secrets = config.resolve_secrets()?;
        config.validate()?;
        Ok((config, secrets))
    }

    fn resolve_secrets(&self) -> Result<Secrets> {
        let public_key_hex = resolve_secret(
            "discord.public_key",
            &self.discord.public_key,
            &self.discord.public_key_env,
        )?;
        let public_key = decode_public_key(&public_key_hex)?;

        let bot_token = resolve_secret(
            "discord.bot_token",
            &self.discord.bot_token,
            &self.discord.bot_token_env,
        )?;
        let riot_api_key =
            resolve_secret("riot.api_key", &self.riot.api_key, &self.riot.api_key_env)?;

        Ok(Secrets {
            public_key,
            bot_token,
            riot_api_key,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.media.max_upload_bytes == 0 {
            bail!("media.max_upload_bytes must be greater than zero");
        }
        for platform in MediaPlatform::ALL {
            let configured = self
                .media
                .providers
                .get(&platform)
                .map(|p| !p.is_empty())
                .unwrap_or(false);
            if !configured {
                bail!("media.providers.{} has no providers", platform.as_str());
            }
        }
        if self.birthdays.enabled && self.birthdays.channel_id.is_none() {
            bail!("birthdays.enabled requires birthdays.channel_id");
        }
        if self.birthdays.announce_hour > 23 {
            bail!("birthdays.announce_hour must be between 0 and 23");
        }
        if !(-12..=14).contains(&self.birthdays.utc_offset_hours) {
            bail!("birthdays.utc_offset_hours must be between -12 and 14");
        }
        if !self.server.path.starts_with('/') {
            bail!("server.path must start with '/'");
        }
        Ok(())
    }
}

fn resolve_secret(name: &str, inline: &Option<String>, env: &Option<String>) -> Result<String> {
    if let Some(value) = inline {
        if !value.trim().is_empty() {
            return Ok(value.trim().to_string());
        }
    }
    if let Some(var) = env {
        return std::env::var(var)
            .map(|v| v.trim().to_string())
            .map_err(|e| anyhow!("{name}: env var {var} not set: {e}"));
    }
    Err(anyhow!("{name} is required (set it inline or via the *_env field)"))
}

fn decode_public_key(hex_key: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(hex_key).context("discord.public_key is not valid hex")?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow!("discord.public_key must be 32 bytes, got {}", b.len()))
}
