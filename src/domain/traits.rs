//! # Domain Traits
//!
//! Abstract interfaces for the external collaborators (chat platform, record store,
//! stats API, media providers). Implementations live in the Infrastructure layer.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::domain::interaction::CallbackHandle;
use crate::domain::ranked::{MatchSummary, RankedEntry, RiotIdentity};
use crate::domain::types::{FollowUp, ProviderResult};

/// Outbound chat-platform client.
#[async_trait]
pub trait InteractionResponder: Send + Sync {
    /// Replace the deferred placeholder with the final message.
    /// The platform accepts one edit per handle; callers must not retry.
    async fn edit_original(&self, handle: &CallbackHandle, message: &FollowUp) -> Result<()>;

    /// Post a plain message into a channel.
    async fn post_channel_message(&self, channel_id: &str, content: &str) -> Result<()>;
}

/// Key/value record persistence with atomic upsert.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_record(&self, table: &str, key: &str) -> Result<Option<Value>>;

    async fn upsert_record(&self, table: &str, key: &str, fields: Value) -> Result<()>;

    /// Returns whether a record was removed.
    async fn delete_record(&self, table: &str, key: &str) -> Result<bool>;

    async fn list_records(&self, table: &str) -> Result<Vec<(String, Value)>>;
}

/// Third-party ranked stats lookups. Not-found is `Ok(None)`, never an error.
#[async_trait]
pub trait StatsApi: Send + Sync {
    async fn lookup_riot_id(&self, game_name: &str, tag_line: &str)
    -> Result<Option<RiotIdentity>>;

    async fn lookup_identity(&self, puuid: &str) -> Result<Option<RiotIdentity>>;

    async fn lookup_entries(&self, puuid: &str) -> Result<Vec<RankedEntry>>;

    async fn lookup_match_ids(
        &self,
        puuid: &str,
        count: usize,
        queue: Option<u16>,
    ) -> Result<Vec<String>>;

    /// Summary of `puuid`'s performance in the match.
    async fn lookup_match_detail(&self, match_id: &str, puuid: &str)
    -> Result<Option<MatchSummary>>;
}

/// One strategy in a media fallback chain.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn resolve(&self, url: &str) -> Result<ProviderResult>;
}
