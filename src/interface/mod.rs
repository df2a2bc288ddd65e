//! # Interface Layer
//!
//! Entry points from the outside world: the signed webhook endpoint and the
//! per-command handlers it dispatches to.

pub mod commands;
pub mod webhook;
