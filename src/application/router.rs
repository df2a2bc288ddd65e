//! # Command Router
//!
//! Maps a verified command invocation to its handler (in `interface/commands`).
//! Handlers only do cheap validation here: they either answer immediately or hand
//! back a [`BackgroundTask`] for the deferred executor.

use std::sync::Arc;

use crate::application::deferred::BackgroundTask;
use crate::application::media::MediaService;
use crate::domain::config::AppConfig;
use crate::domain::interaction::CommandInvocation;
use crate::domain::ranked::QueueKind;
use crate::domain::traits::{RecordStore, StatsApi};
use crate::domain::types::FollowUp;
use crate::interface::commands;
use crate::strings::messages;

/// Shared dependencies handed to every command handler.
pub struct CommandContext {
    pub config: AppConfig,
    pub store: Arc<dyn RecordStore>,
    pub stats: Arc<dyn StatsApi>,
    pub media: Arc<MediaService>,
}

pub enum RouteOutcome {
    /// Reply inside the acknowledgment window; no follow-up.
    Immediate(String),
    /// Acknowledge now, deliver the task's result later.
    Deferred(BackgroundTask),
}

impl RouteOutcome {
    pub fn deferred<F>(task: F) -> Self
    where
        F: Future<Output = anyhow::Result<FollowUp>> + Send + 'static,
    {
        Self::Deferred(Box::pin(task))
    }
}

impl std::fmt::Debug for RouteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Immediate(content) => f.debug_tuple("Immediate").field(content).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

pub struct CommandRouter {
    ctx: Arc<CommandContext>,
}

impl CommandRouter {
    pub fn new(ctx: Arc<CommandContext>) -> Self {
        Self { ctx }
    }

    pub fn route(&self, cmd: &CommandInvocation) -> RouteOutcome {
        tracing::info!(
            command = %cmd.name,
            user = cmd.user_id.as_deref().unwrap_or("-"),
            options = cmd.options.len(),
            "Router dispatching"
        );

        match cmd.name.as_str() {
            "ping" => commands::misc::handle_ping(),
            "code" => commands::misc::handle_code(&self.ctx),
            "download" => commands::download::handle_download(&self.ctx, cmd),
            "set-birthday" => commands::birthday::handle_set(&self.ctx, cmd),
            "remove-birthday" => commands::birthday::handle_remove(&self.ctx, cmd),
            "add-league-account" => commands::league::handle_add_account(&self.ctx, cmd),
            "remove-league-account" => commands::league::handle_remove_account(&self.ctx, cmd),
            "ranked" => commands::league::handle_profile(&self.ctx, cmd, QueueKind::SoloDuo),
            "flex" => commands::league::handle_profile(&self.ctx, cmd, QueueKind::Flex),
            "ranked-race" => commands::league::handle_race(&self.ctx, QueueKind::SoloDuo),
            "flex-race" => commands::league::handle_race(&self.ctx, QueueKind::Flex),
            other => RouteOutcome::Immediate(messages::unknown_command(other)),
        }
    }
}
