//! # Riot Games Adapter
//!
//! Implements `StatsApi` against account-v1, league-v4 and match-v5.
//! Account lookups treat 404 as "no such player". A failed match detail is logged
//! and reported as missing so one bad game never fails a whole profile.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::domain::ranked::{Division, MatchSummary, QueueKind, RankedEntry, RiotIdentity, Tier};
use crate::domain::traits::StatsApi;

const USER_AGENT: &str = "GBM-Discord-Bot/1.0";

#[derive(Clone)]
pub struct RiotClient {
    http: reqwest::Client,
    api_key: String,
    /// account-v1 and match-v5
    regional_base: String,
    /// league-v4
    platform_base: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountDto {
    puuid: String,
    #[serde(default)]
    game_name: Option<String>,
    #[serde(default)]
    tag_line: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeagueEntryDto {
    queue_type: String,
    tier: String,
    #[serde(default)]
    rank: Option<String>,
    league_points: i32,
    wins: u32,
    losses: u32,
}

#[derive(Debug, Deserialize)]
struct MatchDto {
    info: MatchInfoDto,
}

#[derive(Debug, Deserialize)]
struct MatchInfoDto {
    participants: Vec<ParticipantDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantDto {
    puuid: String,
    champion_name: String,
    win: bool,
    kills: u32,
    deaths: u32,
    assists: u32,
}

impl From<AccountDto> for RiotIdentity {
    fn from(dto: AccountDto) -> Self {
        Self {
            puuid: dto.puuid,
            game_name: dto.game_name.unwrap_or_default(),
            tag_line: dto.tag_line.unwrap_or_default(),
        }
    }
}

impl LeagueEntryDto {
    fn into_entry(self) -> Option<RankedEntry> {
        let queue = QueueKind::from_queue_type(&self.queue_type)?;
        let tier = Tier::parse(&self.tier)?;
        let division = if tier.is_apex() {
            None
        } else {
            self.rank.as_deref().and_then(Division::parse)
        };
        Some(RankedEntry {
            queue,
            tier,
            division,
            points: self.league_points,
            wins: self.wins,
            losses: self.losses,
        })
    }
}

impl RiotClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>, region: &str, platform: &str) -> Self {
        Self::with_bases(
            http,
            api_key,
            format!("https://{region}.api.riotgames.com"),
            format!("https://{platform}.api.riotgames.com"),
        )
    }

    pub fn with_bases(
        http: reqwest::Client,
        api_key: impl Into<String>,
        regional_base: impl Into<String>,
        platform_base: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            regional_base: regional_base.into(),
            platform_base: platform_base.into(),
        }
    }

    /// Joins path segments onto `base`, percent-encoding each one.
    fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(base).with_context(|| format!("Invalid Riot base url {base}"))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Riot base url cannot take a path: {base}"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response> {
        self.http
            .get(url)
            .header("X-Riot-Token", &self.api_key)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .context("Failed to reach Riot API")
    }

    async fn fail(label: &str, res: reqwest::Response) -> anyhow::Error {
        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        tracing::warn!(status, body = %body, "Riot API error ({})", label);
        anyhow!("Riot API error ({label}): {status}")
    }

    async fn account(&self, label: &str, url: Url) -> Result<Option<RiotIdentity>> {
        let res = self.get(url).await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !res.status().is_success() {
            return Err(Self::fail(label, res).await);
        }
        let dto: AccountDto = res.json().await.context("Malformed account response")?;
        Ok(Some(dto.into()))
    }
}

#[async_trait]
impl StatsApi for RiotClient {
    async fn lookup_riot_id(&self, game_name: &str, tag_line: &str) -> Result<Option<RiotIdentity>> {
        let url = Self::endpoint(
            &self.regional_base,
            &["riot", "account", "v1", "accounts", "by-riot-id", game_name, tag_line],
        )?;
        self.account("Account", url).await
    }

    async fn lookup_identity(&self, puuid: &str) -> Result<Option<RiotIdentity>> {
        let url = Self::endpoint(
            &self.regional_base,
            &["riot", "account", "v1", "accounts", "by-puuid", puuid],
        )?;
        self.account("Account by PUUID", url).await
    }

    async fn lookup_entries(&self, puuid: &str) -> Result<Vec<RankedEntry>> {
        let url = Self::endpoint(
            &self.platform_base,
            &["lol", "league", "v4", "entries", "by-puuid", puuid],
        )?;
        let res = self.get(url).await?;
        if !res.status().is_success() {
            return Err(Self::fail("League by PUUID", res).await);
        }
        let entries: Vec<LeagueEntryDto> = res.json().await.context("Malformed league response")?;
        Ok(entries
            .into_iter()
            .filter_map(|dto| {
                let queue_type = dto.queue_type.clone();
                let entry = dto.into_entry();
                if entry.is_none() {
                    tracing::debug!(queue_type = %queue_type, "Ignoring league entry");
                }
                entry
            })
            .collect())
    }

    async fn lookup_match_ids(&self, puuid: &str, count: usize, queue: Option<u16>) -> Result<Vec<String>> {
        let mut url = Self::endpoint(
            &self.regional_base,
            &["lol", "match", "v5", "matches", "by-puuid", puuid, "ids"],
        )?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("start", "0").append_pair("count", &count.to_string());
            if let Some(queue) = queue {
                query.append_pair("queue", &queue.to_string());
            }
        }
        let res = self.get(url).await?;
        if !res.status().is_success() {
            return Err(Self::fail("Match IDs", res).await);
        }
        res.json().await.context("Malformed match id response")
    }

    async fn lookup_match_detail(&self, match_id: &str, puuid: &str) -> Result<Option<MatchSummary>> {
        let url = Self::endpoint(&self.regional_base, &["lol", "match", "v5", "matches", match_id])?;
        let res = self.get(url).await?;
        if !res.status().is_success() {
            let _ = Self::fail("Match Details", res).await;
            return Ok(None);
        }
        let detail: MatchDto = res.json().await.context("Malformed match response")?;
        Ok(detail
            .info
            .participants
            .into_iter()
            .find(|p| p.puuid == puuid)
            .map(|p| MatchSummary {
                champion: p.champion_name,
                win: p.win,
                kills: p.kills,
                deaths: p.deaths,
                assists: p.assists,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, RawQuery};
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::get;
    use axum::Json;
    use serde_json::json;

    async fn fake_riot() -> RiotClient {
        let app = axum::Router::new()
            .route(
                "/riot/account/v1/accounts/by-riot-id/:name/:tag",
                get(|Path((name, tag)): Path<(String, String)>, headers: HeaderMap| async move {
                    if headers.get("x-riot-token").and_then(|v| v.to_str().ok()) != Some("key") {
                        return Err(AxumStatus::FORBIDDEN);
                    }
                    if name != "Some One" {
                        return Err(AxumStatus::NOT_FOUND);
                    }
                    Ok(Json(json!({ "puuid": "p1", "gameName": name, "tagLine": tag })))
                }),
            )
            .route(
                "/riot/account/v1/accounts/by-puuid/:puuid",
                get(|| async { AxumStatus::SERVICE_UNAVAILABLE }),
            )
            .route(
                "/lol/league/v4/entries/by-puuid/:puuid",
                get(|| async {
                    Json(json!([
                        { "queueType": "RANKED_SOLO_5x5", "tier": "EMERALD", "rank": "II", "leaguePoints": 55, "wins": 3, "losses": 0 },
                        { "queueType": "RANKED_FLEX_SR", "tier": "MASTER", "rank": "I", "leaguePoints": 120, "wins": 1, "losses": 1 },
                        { "queueType": "CHERRY", "tier": "GOLD", "rank": "I", "leaguePoints": 0, "wins": 0, "losses": 0 }
                    ]))
                }),
            )
            .route(
                "/lol/match/v5/matches/by-puuid/:puuid/ids",
                get(|RawQuery(query): RawQuery| async move {
                    Json(json!([query.unwrap_or_default()]))
                }),
            )
            .route(
                "/lol/match/v5/matches/:id",
                get(|Path(id): Path<String>| async move {
                    if id == "EUW1_bad" {
                        return Err(AxumStatus::INTERNAL_SERVER_ERROR);
                    }
                    Ok(Json(json!({ "info": { "participants": [
                        { "puuid": "other", "championName": "Ahri", "win": false, "kills": 0, "deaths": 0, "assists": 0 },
                        { "puuid": "p1", "championName": "Jinx", "win": true, "kills": 10, "deaths": 2, "assists": 7 }
                    ]}})))
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });
        let base = format!("http://{addr}");
        RiotClient::with_bases(reqwest::Client::new(), "key", base.clone(), base)
    }

    #[tokio::test]
    async fn test_riot_id_lookup_and_not_found() {
        let client = fake_riot().await;
        let found = client.lookup_riot_id("Some One", "EUW").await.unwrap().unwrap();
        assert_eq!(found.display_name(), "Some One#EUW");
        assert!(client.lookup_riot_id("Nobody", "EUW").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_an_error() {
        let client = fake_riot().await;
        let err = client.lookup_identity("p1").await.unwrap_err();
        assert_eq!(err.to_string(), "Riot API error (Account by PUUID): 503");
    }

    #[tokio::test]
    async fn test_entries_are_parsed_and_filtered() {
        let client = fake_riot().await;
        let entries = client.lookup_entries("p1").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].rank_label(), "EMERALD II");
        assert_eq!(entries[0].win_rate(), Some(100));
        assert_eq!(entries[1].queue, QueueKind::Flex);
        assert_eq!(entries[1].division, None);
    }

    #[tokio::test]
    async fn test_match_ids_carry_queue_filter() {
        let client = fake_riot().await;
        let ids = client.lookup_match_ids("p1", 5, Some(440)).await.unwrap();
        assert_eq!(ids, vec!["start=0&count=5&queue=440".to_string()]);
    }

    #[tokio::test]
    async fn test_match_detail_degrades_on_failure() {
        let client = fake_riot().await;
        let summary = client.lookup_match_detail("EUW1_1", "p1").await.unwrap().unwrap();
        assert_eq!(summary.champion, "Jinx");
        assert_eq!((summary.kills, summary.deaths, summary.assists), (10, 2, 7));
        assert!(client.lookup_match_detail("EUW1_bad", "p1").await.unwrap().is_none());
    }
}
