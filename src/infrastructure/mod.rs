//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (InteractionResponder,
//! StatsApi, MediaProvider, RecordStore).

pub mod discord;
pub mod media;
pub mod riot;
pub mod store;
