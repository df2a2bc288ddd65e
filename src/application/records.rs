//! # Records
//!
//! Typed helpers over the generic [`RecordStore`] for the two tables the bot keeps:
//! birthdays and linked League accounts.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::traits::RecordStore;

pub const BIRTHDAYS: &str = "birthdays";
pub const LEAGUE_ACCOUNTS: &str = "league_accounts";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Birthday {
    pub day: u32,
    pub month: u32,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueAccount {
    pub puuid: String,
}

/// A linked account together with the Discord user that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedAccount {
    pub user_id: String,
    pub puuid: String,
}

pub async fn set_birthday(store: &dyn RecordStore, user_id: &str, birthday: &Birthday) -> Result<()> {
    store
        .upsert_record(BIRTHDAYS, user_id, serde_json::to_value(birthday)?)
        .await
        .context("Failed to store birthday")
}

pub async fn remove_birthday(store: &dyn RecordStore, user_id: &str) -> Result<bool> {
    store
        .delete_record(BIRTHDAYS, user_id)
        .await
        .context("Failed to remove birthday")
}

/// Birthdays falling on `day`.`month`, as `(user_id, birthday)`.
pub async fn birthdays_on(store: &dyn RecordStore, day: u32, month: u32) -> Result<Vec<(String, Birthday)>> {
    let records = store.list_records(BIRTHDAYS).await?;
    let mut matches = Vec::new();
    for (user_id, value) in records {
        match serde_json::from_value::<Birthday>(value) {
            Ok(b) if b.day == day && b.month == month => matches.push((user_id, b)),
            Ok(_) => {}
            Err(e) => tracing::warn!(user_id = %user_id, "Skipping malformed birthday record: {}", e),
        }
    }
    Ok(matches)
}

pub async fn link_account(store: &dyn RecordStore, user_id: &str, puuid: &str) -> Result<()> {
    let account = LeagueAccount {
        puuid: puuid.to_string(),
    };
    store
        .upsert_record(LEAGUE_ACCOUNTS, user_id, serde_json::to_value(account)?)
        .await
        .context("Failed to store league account")
}

pub async fn unlink_account(store: &dyn RecordStore, user_id: &str) -> Result<bool> {
    store
        .delete_record(LEAGUE_ACCOUNTS, user_id)
        .await
        .context("Failed to remove league account")
}

pub async fn linked_account(store: &dyn RecordStore, user_id: &str) -> Result<Option<LinkedAccount>> {
    let Some(value) = store.get_record(LEAGUE_ACCOUNTS, user_id).await? else {
        return Ok(None);
    };
    let account: LeagueAccount =
        serde_json::from_value(value).context("Malformed league account record")?;
    Ok(Some(LinkedAccount {
        user_id: user_id.to_string(),
        puuid: account.puuid,
    }))
}

pub async fn all_linked_accounts(store: &dyn RecordStore) -> Result<Vec<LinkedAccount>> {
    let records = store.list_records(LEAGUE_ACCOUNTS).await?;
    Ok(records
        .into_iter()
        .filter_map(|(user_id, value)| {
            match serde_json::from_value::<LeagueAccount>(value) {
                Ok(a) => Some(LinkedAccount {
                    user_id,
                    puuid: a.puuid,
                }),
                Err(e) => {
                    tracing::warn!(user_id = %user_id, "Skipping malformed league account record: {}", e);
                    None
                }
            }
        })
        .collect())
}
