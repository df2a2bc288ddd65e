//! # Strings Module
//!
//! Centralizes user-facing strings, log lines, and slash-command definitions.
//! Ensures consistency in messaging and easier localization/updates.

pub mod commands;
pub mod logs;
pub mod messages;
