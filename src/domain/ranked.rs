//! # Ranked Ladder Types
//!
//! Tier/division ordering, ranked entries and leaderboard rows.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

impl Tier {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "IRON" => Self::Iron,
            "BRONZE" => Self::Bronze,
            "SILVER" => Self::Silver,
            "GOLD" => Self::Gold,
            "PLATINUM" => Self::Platinum,
            "EMERALD" => Self::Emerald,
            "DIAMOND" => Self::Diamond,
            "MASTER" => Self::Master,
            "GRANDMASTER" => Self::Grandmaster,
            "CHALLENGER" => Self::Challenger,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iron => "IRON",
            Self::Bronze => "BRONZE",
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
            Self::Platinum => "PLATINUM",
            Self::Emerald => "EMERALD",
            Self::Diamond => "DIAMOND",
            Self::Master => "MASTER",
            Self::Grandmaster => "GRANDMASTER",
            Self::Challenger => "CHALLENGER",
        }
    }

    /// Apex tiers have no divisions.
    pub fn is_apex(&self) -> bool {
        matches!(self, Self::Master | Self::Grandmaster | Self::Challenger)
    }

    /// Embed color for a tier.
    pub fn color(&self) -> u32 {
        match self {
            Self::Iron => 0x5d5d5d,
            Self::Bronze => 0x8c523a,
            Self::Silver => 0x80989d,
            Self::Gold => 0xcdfafa,
            Self::Platinum => 0x25c6a5,
            Self::Emerald => 0x25c65f,
            Self::Diamond => 0x576bce,
            Self::Master => 0x9d48e0,
            Self::Grandmaster => 0xef4f4f,
            Self::Challenger => 0xf4c874,
        }
    }
}

/// Minor rank within a tier. `I` is the best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Division {
    I = 1,
    II = 2,
    III = 3,
    IV = 4,
}

impl Division {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "I" => Some(Self::I),
            "II" => Some(Self::II),
            "III" => Some(Self::III),
            "IV" => Some(Self::IV),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::I => "I",
            Self::II => "II",
            Self::III => "III",
            Self::IV => "IV",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueKind {
    SoloDuo,
    Flex,
}

impl QueueKind {
    pub fn queue_type(&self) -> &'static str {
        match self {
            Self::SoloDuo => "RANKED_SOLO_5x5",
            Self::Flex => "RANKED_FLEX_SR",
        }
    }

    pub fn from_queue_type(s: &str) -> Option<Self> {
        match s {
            "RANKED_SOLO_5x5" => Some(Self::SoloDuo),
            "RANKED_FLEX_SR" => Some(Self::Flex),
            _ => None,
        }
    }

    /// match-v5 queue id filter.
    pub fn queue_id(&self) -> u16 {
        match self {
            Self::SoloDuo => 420,
            Self::Flex => 440,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SoloDuo => "Solo/Duo",
            Self::Flex => "Flex",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub queue: QueueKind,
    pub tier: Tier,
    pub division: Option<Division>,
    pub points: i32,
    pub wins: u32,
    pub losses: u32,
}

impl RankedEntry {
    /// Rounded win percentage; `None` when no games were played.
    pub fn win_rate(&self) -> Option<u32> {
        let games = self.wins + self.losses;
        if games == 0 {
            return None;
        }
        Some(((self.wins as f64 / games as f64) * 100.0).round() as u32)
    }

    /// `GOLD II` or `CHALLENGER` for apex tiers.
    pub fn rank_label(&self) -> String {
        match self.division {
            Some(d) => format!("{} {}", self.tier.as_str(), d.as_str()),
            None => self.tier.as_str().to_string(),
        }
    }

    /// Ladder order: tier descending, division ascending, points descending.
    pub fn ladder_cmp(&self, other: &Self) -> Ordering {
        other
            .tier
            .cmp(&self.tier)
            .then_with(|| division_key(self.division).cmp(&division_key(other.division)))
            .then_with(|| other.points.cmp(&self.points))
    }
}

fn division_key(division: Option<Division>) -> u8 {
    division.map(|d| d as u8).unwrap_or(0)
}

/// Riot account identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiotIdentity {
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
}

impl RiotIdentity {
    pub fn display_name(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    pub user_id: String,
    pub identity: RiotIdentity,
    pub entry: RankedEntry,
}

impl LeaderboardRow {
    pub fn display_name(&self) -> String {
        self.identity.display_name()
    }
}

/// One participant's line from a match detail.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub champion: String,
    pub win: bool,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tier: Tier, division: Option<Division>, points: i32) -> RankedEntry {
        RankedEntry {
            queue: QueueKind::SoloDuo,
            tier,
            division,
            points,
            wins: 0,
            losses: 0,
        }
    }

    #[test]
    fn test_win_rate() {
        let mut e = entry(Tier::Gold, Some(Division::I), 0);
        assert_eq!(e.win_rate(), None);
        e.wins = 3;
        assert_eq!(e.win_rate(), Some(100));
        e.losses = 3;
        assert_eq!(e.win_rate(), Some(50));
        e.wins = 2;
        e.losses = 1;
        assert_eq!(e.win_rate(), Some(67));
    }

    #[test]
    fn test_ladder_order() {
        let mut entries = vec![
            entry(Tier::Gold, Some(Division::II), 40),
            entry(Tier::Gold, Some(Division::I), 10),
            entry(Tier::Platinum, Some(Division::IV), 0),
        ];
        entries.sort_by(|a, b| a.ladder_cmp(b));
        assert_eq!(entries[0].rank_label(), "PLATINUM IV");
        assert_eq!(entries[1].rank_label(), "GOLD I");
        assert_eq!(entries[2].rank_label(), "GOLD II");
    }

    #[test]
    fn test_apex_tiers_compare_on_points() {
        let a = entry(Tier::Challenger, None, 500);
        let b = entry(Tier::Challenger, None, 900);
        assert_eq!(a.ladder_cmp(&b), Ordering::Greater);
        assert!(Tier::Challenger.is_apex());
        assert_eq!(a.rank_label(), "CHALLENGER");
    }

    #[test]
    fn test_parse_ladder_names() {
        assert_eq!(Tier::parse("emerald"), Some(Tier::Emerald));
        assert_eq!(Tier::parse("WOOD"), None);
        assert_eq!(Division::parse("III"), Some(Division::III));
        assert_eq!(QueueKind::from_queue_type("RANKED_FLEX_SR"), Some(QueueKind::Flex));
        assert_eq!(QueueKind::SoloDuo.queue_id(), 420);
    }
}
