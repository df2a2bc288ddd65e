//! # Download Command
//!
//! `/download url:<link>`: the host is checked immediately, the actual fetch runs
//! through the platform's fallback engine in the background.

use std::sync::Arc;

use crate::application::router::{CommandContext, RouteOutcome};
use crate::domain::interaction::CommandInvocation;
use crate::strings::messages;

pub fn handle_download(ctx: &Arc<CommandContext>, cmd: &CommandInvocation) -> RouteOutcome {
    let Some(url) = cmd.string("url").map(str::trim).filter(|u| !u.is_empty()) else {
        return RouteOutcome::Immediate(messages::UNSUPPORTED_URL.to_string());
    };
    let Some(platform) = ctx.media.supports(url) else {
        tracing::info!(url = %url, "Rejected download for unsupported host");
        return RouteOutcome::Immediate(messages::UNSUPPORTED_URL.to_string());
    };

    let media = ctx.media.clone();
    let url = url.to_string();
    RouteOutcome::deferred(async move { Ok(media.fetch(platform, &url).await) })
}
