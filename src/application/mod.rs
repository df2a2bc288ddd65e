//! # Application Layer
//!
//! Contains the core business logic and orchestration of the bot.
//! This includes request verification, command routing, deferred execution, the
//! media fallback engine, and the ranked/birthday features built on the stores.

pub mod birthday;
pub mod deferred;
pub mod fallback;
pub mod formatter;
pub mod leaderboard;
pub mod logging;
pub mod media;
pub mod profile;
pub mod records;
pub mod router;
pub mod verifier;
