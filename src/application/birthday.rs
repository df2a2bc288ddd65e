//! # Birthday Announcements
//!
//! Posts one congratulation message per day listing everyone whose birthday it is.
//! Runs either once from the `announce-birthdays` subcommand or from the daily loop.

use anyhow::{Context, Result};
use chrono::{Datelike, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::application::records;
use crate::domain::config::BirthdayConfig;
use crate::domain::traits::{InteractionResponder, RecordStore};
use crate::strings::messages;

/// Sends the announcement for `today`. Returns how many users were congratulated.
pub async fn announce_birthdays(
    store: &dyn RecordStore,
    responder: &dyn InteractionResponder,
    channel_id: &str,
    today: NaiveDate,
) -> Result<usize> {
    let users = records::birthdays_on(store, today.day(), today.month()).await?;
    if users.is_empty() {
        tracing::info!("No birthdays today.");
        return Ok(0);
    }

    let lines: Vec<String> = users
        .iter()
        .map(|(user_id, b)| {
            let age = b.year.map(|y| today.year() - y).filter(|age| *age > 0);
            messages::birthday_line(user_id, age)
        })
        .collect();

    responder
        .post_channel_message(channel_id, &messages::birthday_announcement(&lines))
        .await
        .context("Failed to post birthday announcement")?;
    tracing::info!("Sent birthday message to {} users.", users.len());
    Ok(users.len())
}

/// Current local date and hour at the configured offset.
pub fn local_now(config: &BirthdayConfig) -> (NaiveDate, u32) {
    let offset = FixedOffset::east_opt(config.utc_offset_hours * 3600).unwrap_or(Utc.fix());
    let now = Utc::now().with_timezone(&offset);
    (now.date_naive(), now.hour())
}

/// Background loop: announces once per day after `announce_hour`.
pub async fn run_daily(
    config: BirthdayConfig,
    channel_id: String,
    store: Arc<dyn RecordStore>,
    responder: Arc<dyn InteractionResponder>,
) {
    let mut last_announced: Option<NaiveDate> = None;
    loop {
        let (today, hour) = local_now(&config);
        if hour >= config.announce_hour && last_announced != Some(today) {
            match announce_birthdays(store.as_ref(), responder.as_ref(), &channel_id, today).await {
                Ok(_) => last_announced = Some(today),
                Err(e) => tracing::error!("Birthday announcement failed: {:#}", e),
            }
        }
        tokio::time::sleep(Duration::from_secs(60)).await;
    }
}
