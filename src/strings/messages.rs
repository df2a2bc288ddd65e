//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.
//! Includes error messages, command replies, and follow-up templates.

pub const PONG: &str = "Pong!";
pub const INVALID_DATE: &str = "❌ Not a valid date.";
pub const UNSUPPORTED_URL: &str = "❌ This URL is not supported yet.";
pub const MISSING_RIOT_ID: &str = "❌ Please provide both a game name and a tag line.";
pub const NO_TARGET_USER: &str = "❌ Could not determine which user this is for.";
pub const NO_ACCOUNTS_LINKED: &str = "No accounts linked yet.";
pub const NO_RANKED_PLAYERS: &str = "No ranked players found for this queue.";
pub const NO_DATA: &str = "No data found.";
pub const BIRTHDAY_REMOVED: &str = "Birthday removed.";
pub const ACCOUNT_REMOVED: &str = "Riot account removed.";

pub fn unknown_command(name: &str) -> String {
    format!("Command '{name}' not implemented yet.")
}

pub fn task_failed(err: &str) -> String {
    format!("❌ **Error**: {err}")
}

pub fn no_video_found(url: &str) -> String {
    format!("No video found: {url}")
}

pub fn video_too_large(size: u64, limit: u64) -> String {
    format!(
        "📦 Video is too large to upload ({:.1} MiB, limit {:.0} MiB).",
        mib(size),
        mib(limit)
    )
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

pub fn birthday_set(user_id: &str, day: u32, month: u32, year: i32) -> String {
    format!("🎂 Birthday for <@{user_id}> set to {day}.{month}.{year}!")
}

pub fn birthday_removed_for(user_id: &str) -> String {
    format!("Birthday of <@{user_id}> removed.")
}

pub fn riot_account_not_found(game_name: &str, tag_line: &str) -> String {
    format!("No Riot account found (EUW) for {game_name}#{tag_line}.")
}

pub fn riot_account_linked(display_name: &str, user_id: &str) -> String {
    format!("Riot account **{display_name}** linked for <@{user_id}>!")
}

pub fn account_removed_for(user_id: &str) -> String {
    format!("Riot account for <@{user_id}> removed.")
}

pub fn account_not_linked(user_id: &str) -> String {
    format!("<@{user_id}> has no Riot account linked. Use `/add-league-account` to add one.")
}

pub fn birthday_line(user_id: &str, age: Option<i32>) -> String {
    match age {
        Some(age) => format!("Happy birthday, <@{user_id}>! Turning {age} today 🥳"),
        None => format!("Happy birthday, <@{user_id}>! 🥳"),
    }
}

pub fn birthday_announcement(lines: &[String]) -> String {
    format!("🎉 **Birthdays Today!** 🎂\n{}", lines.join("\n"))
}
