//! # Ranked Profile
//!
//! Loads one player's ranked entry for a queue plus their most recent games in it.
//! Match details are fetched concurrently; a failed detail only drops that game.

use anyhow::Result;
use futures::future::join_all;

use crate::application::records;
use crate::domain::ranked::{MatchSummary, QueueKind, RankedEntry, RiotIdentity};
use crate::domain::traits::{RecordStore, StatsApi};

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub queue: QueueKind,
    pub identity: RiotIdentity,
    pub entry: Option<RankedEntry>,
    pub recent: Vec<MatchSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileOutcome {
    NotLinked,
    NoData,
    Found(Profile),
}

pub async fn load_profile(
    store: &dyn RecordStore,
    stats: &dyn StatsApi,
    user_id: &str,
    queue: QueueKind,
    history: usize,
) -> Result<ProfileOutcome> {
    let Some(account) = records::linked_account(store, user_id).await? else {
        return Ok(ProfileOutcome::NotLinked);
    };
    let Some(identity) = stats.lookup_identity(&account.puuid).await? else {
        return Ok(ProfileOutcome::NoData);
    };

    let (entries, match_ids) = tokio::try_join!(
        stats.lookup_entries(&account.puuid),
        stats.lookup_match_ids(&account.puuid, history, Some(queue.queue_id()))
    )?;
    let entry = entries.into_iter().find(|e| e.queue == queue);

    let puuid = account.puuid.as_str();
    let details = join_all(match_ids.iter().map(|id| async move {
        match stats.lookup_match_detail(id, puuid).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(match_id = %id, "Failed to fetch match details: {:#}", e);
                None
            }
        }
    }))
    .await;

    Ok(ProfileOutcome::Found(Profile {
        queue,
        identity,
        entry,
        recent: details.into_iter().flatten().collect(),
    }))
}
