//! # Miscellaneous Commands
//!
//! Handles `/ping` and `/code`. Both answer inside the acknowledgment window.

use crate::application::router::{CommandContext, RouteOutcome};
use crate::strings::messages;

pub fn handle_ping() -> RouteOutcome {
    RouteOutcome::Immediate(messages::PONG.to_string())
}

pub fn handle_code(ctx: &CommandContext) -> RouteOutcome {
    RouteOutcome::Immediate(ctx.config.system.source_url.clone())
}
