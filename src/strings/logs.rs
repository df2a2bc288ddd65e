//! # Log Messages
//!
//! Operator-facing log lines for startup and shutdown.

pub const STARTING: &str = "Starting GBM bot...";
pub const SHUTDOWN: &str = "Shutting down...";

pub fn listening(addr: &str, path: &str) -> String {
    format!("Listening for interactions on http://{addr}{path}")
}

pub fn store_opened(kind: &str, location: &str) -> String {
    format!("Record store ready ({kind}: {location})")
}

pub fn providers_configured(platform: &str, providers: &[&str]) -> String {
    format!("Media providers for {platform}: {}", providers.join(" -> "))
}

pub fn shutdown_fail(err: &str) -> String {
    format!("Unable to listen for shutdown signal: {err}")
}

pub fn commands_registered(count: usize, scope: &str) -> String {
    format!("Registered {count} commands ({scope})")
}
