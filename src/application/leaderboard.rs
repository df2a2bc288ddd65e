//! # Leaderboard
//!
//! Ranked race across every linked account: concurrent lookups per account, then a
//! stable three-key sort (tier, division, points) truncated to the top ten.

use futures::future::join_all;

use crate::application::records::LinkedAccount;
use crate::domain::ranked::{LeaderboardRow, QueueKind};
use crate::domain::traits::StatsApi;

pub const LEADERBOARD_SIZE: usize = 10;

pub async fn build_leaderboard(
    stats: &dyn StatsApi,
    accounts: Vec<LinkedAccount>,
    queue: QueueKind,
) -> Vec<LeaderboardRow> {
    tracing::info!(accounts = accounts.len(), queue = queue.queue_type(), "Building leaderboard");

    let lookups = accounts
        .into_iter()
        .map(|account| fetch_row(stats, account, queue));
    let rows = join_all(lookups).await.into_iter().flatten().collect();

    rank(rows)
}

/// Looks up one account. Any failure drops the account from the race.
async fn fetch_row(stats: &dyn StatsApi, account: LinkedAccount, queue: QueueKind) -> Option<LeaderboardRow> {
    let lookup = async {
        tokio::try_join!(
            stats.lookup_identity(&account.puuid),
            stats.lookup_entries(&account.puuid)
        )
    };
    let (identity, entries) = match lookup.await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(user_id = %account.user_id, "Failed to fetch ranked data: {:#}", e);
            return None;
        }
    };

    let identity = identity?;
    let entry = entries.into_iter().find(|e| e.queue == queue)?;
    Some(LeaderboardRow {
        user_id: account.user_id,
        identity,
        entry,
    })
}

/// Sorts by ladder position and keeps the top ten. Exact ties keep input order.
pub fn rank(mut rows: Vec<LeaderboardRow>) -> Vec<LeaderboardRow> {
    rows.sort_by(|a, b| a.entry.ladder_cmp(&b.entry));
    rows.truncate(LEADERBOARD_SIZE);
    rows
}
