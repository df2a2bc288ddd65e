//! # Embed Formatter
//!
//! Renders ranked profiles and leaderboards into Discord embeds.

use crate::application::profile::Profile;
use crate::domain::ranked::{LeaderboardRow, RiotIdentity};
use crate::domain::types::{Embed, EmbedField};
use crate::strings::messages;

const UNRANKED_COLOR: u32 = 0x99aab5;
const LEADERBOARD_COLOR: u32 = 0xf1c40f;

const PROFILE_BASE: &str = "https://dpm.lol/";

/// dpm.lol profile link for an identity.
pub fn profile_url(identity: &RiotIdentity) -> String {
    let slug = format!("{}-{}", identity.game_name, identity.tag_line);
    let Ok(mut url) = reqwest::Url::parse(PROFILE_BASE) else {
        return format!("{PROFILE_BASE}{slug}");
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(&slug);
    }
    url.to_string()
}

pub fn profile_embed(profile: &Profile) -> Embed {
    let label = profile.queue.label();
    let mut embed = Embed {
        title: Some(profile.identity.display_name()),
        url: Some(profile_url(&profile.identity)),
        ..Embed::default()
    };

    match &profile.entry {
        Some(entry) => {
            embed.color = Some(entry.tier.color());
            embed.fields.push(EmbedField {
                name: format!("{label} Rank"),
                value: format!("{} ({} LP)", entry.rank_label(), entry.points),
                inline: true,
            });
            let win_rate = match entry.win_rate() {
                Some(rate) => format!("{rate}% ({}W / {}L)", entry.wins, entry.losses),
                None => format!("- ({}W / {}L)", entry.wins, entry.losses),
            };
            embed.fields.push(EmbedField {
                name: "Win Rate".to_string(),
                value: win_rate,
                inline: true,
            });
        }
        None => {
            embed.description = Some(format!("Unranked in {label}."));
            embed.color = Some(UNRANKED_COLOR);
        }
    }

    if !profile.recent.is_empty() {
        let history: String = profile
            .recent
            .iter()
            .map(|m| {
                format!(
                    "{} **{}** ({}/{}/{})\n",
                    if m.win { "✅" } else { "❌" },
                    m.champion,
                    m.kills,
                    m.deaths,
                    m.assists
                )
            })
            .collect();
        embed.fields.push(EmbedField {
            name: format!("Last {} Games", profile.recent.len()),
            value: history,
            inline: false,
        });
    }

    embed
}

fn medal(index: usize) -> String {
    match index {
        0 => "🥇".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        n => format!("#{}", n + 1),
    }
}

pub fn leaderboard_embed(title: &str, rows: &[LeaderboardRow]) -> Embed {
    let mut description = String::new();
    for (index, row) in rows.iter().enumerate() {
        let entry = &row.entry;
        description.push_str(&format!(
            "**{}** [{}]({})\n",
            medal(index),
            row.display_name(),
            profile_url(&row.identity)
        ));
        let win_rate = entry
            .win_rate()
            .map(|r| format!(" • {r}% WR"))
            .unwrap_or_default();
        description.push_str(&format!(
            "{} • {} LP{}\n\n",
            entry.rank_label(),
            entry.points,
            win_rate
        ));
    }
    if description.is_empty() {
        description = messages::NO_RANKED_PLAYERS.to_string();
    }

    Embed {
        title: Some(title.to_string()),
        description: Some(description),
        color: Some(LEADERBOARD_COLOR),
        ..Embed::default()
    }
}
