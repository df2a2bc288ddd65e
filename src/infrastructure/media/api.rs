//! JSON download APIs that answer with a direct media URL.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::json;

use crate::domain::types::ProviderResult;

#[derive(Debug, Deserialize)]
struct TikWmResponse {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<TikWmData>,
}

#[derive(Debug, Deserialize)]
struct TikWmData {
    #[serde(default)]
    play: Option<String>,
}

pub(super) async fn tikwm(http: &reqwest::Client, endpoint: &str, url: &str) -> Result<ProviderResult> {
    let body: TikWmResponse = http
        .get(endpoint)
        .query(&[("url", url)])
        .send()
        .await?
        .json()
        .await
        .context("TikWM returned malformed JSON")?;
    match body.data.and_then(|d| d.play) {
        Some(play) if body.code == 0 => Ok(ProviderResult::RemoteUrl(play)),
        _ => bail!(
            "TikWM error: code {} ({})",
            body.code,
            body.msg.unwrap_or_default()
        ),
    }
}

#[derive(Debug, Deserialize)]
struct LoveTikResponse {
    #[serde(default)]
    links: Vec<LoveTikLink>,
}

#[derive(Debug, Deserialize)]
struct LoveTikLink {
    #[serde(default)]
    a: Option<String>,
}

pub(super) async fn lovetik(http: &reqwest::Client, endpoint: &str, url: &str) -> Result<ProviderResult> {
    let res = http.post(endpoint).json(&json!({ "query": url })).send().await?;
    if !res.status().is_success() {
        bail!("LoveTik status: {}", res.status().as_u16());
    }
    let body: LoveTikResponse = res.json().await.context("LoveTik returned malformed JSON")?;
    match body.links.into_iter().next().and_then(|l| l.a) {
        Some(link) => Ok(ProviderResult::RemoteUrl(link)),
        None => bail!("LoveTik found no links"),
    }
}

#[derive(Debug, Deserialize)]
struct CobaltResponse {
    status: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    picker: Vec<CobaltPick>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CobaltPick {
    url: String,
}

pub(super) async fn cobalt(http: &reqwest::Client, endpoint: &str, url: &str) -> Result<ProviderResult> {
    let body: CobaltResponse = http
        .post(endpoint)
        .header(reqwest::header::ACCEPT, "application/json")
        .json(&json!({ "url": url, "filenamePattern": "basic" }))
        .send()
        .await?
        .json()
        .await
        .context("Cobalt returned malformed JSON")?;

    let found = match body.status.as_str() {
        "stream" | "redirect" => body.url,
        "picker" => body.picker.into_iter().next().map(|p| p.url),
        _ => None,
    };
    match found {
        Some(link) => Ok(ProviderResult::RemoteUrl(link)),
        None => bail!(
            "Cobalt error: {}",
            body.text.unwrap_or(body.status)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::routing::{get, post};
    use axum::Json;
    use serde_json::Value;
    use std::collections::HashMap;

    async fn serve(app: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_tikwm_success_and_error_codes() {
        let base = serve(axum::Router::new().route(
            "/api/",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                if q.get("url").map(String::as_str) == Some("https://www.tiktok.com/@a/video/1") {
                    Json(json!({ "code": 0, "data": { "play": "https://cdn.example/v.mp4" } }))
                } else {
                    Json(json!({ "code": -1, "msg": "Url parsing is failed!" }))
                }
            }),
        ))
        .await;
        let http = reqwest::Client::new();
        let endpoint = format!("{base}/api/");

        let found = tikwm(&http, &endpoint, "https://www.tiktok.com/@a/video/1").await.unwrap();
        assert_eq!(found, ProviderResult::RemoteUrl("https://cdn.example/v.mp4".into()));

        let err = tikwm(&http, &endpoint, "https://www.tiktok.com/x").await.unwrap_err();
        assert!(err.to_string().contains("Url parsing is failed!"));
    }

    #[tokio::test]
    async fn test_lovetik_takes_first_link() {
        let base = serve(axum::Router::new().route(
            "/dl",
            post(|Json(body): Json<Value>| async move {
                assert!(body["query"].is_string());
                Json(json!({ "links": [{ "a": "https://cdn.example/1.mp4" }, { "a": "https://cdn.example/2.mp4" }] }))
            }),
        ))
        .await;
        let found = lovetik(&reqwest::Client::new(), &format!("{base}/dl"), "https://www.tiktok.com/x")
            .await
            .unwrap();
        assert_eq!(found, ProviderResult::RemoteUrl("https://cdn.example/1.mp4".into()));
    }

    #[tokio::test]
    async fn test_cobalt_statuses() {
        let base = serve(axum::Router::new().route(
            "/api/json",
            post(|Json(body): Json<Value>| async move {
                match body["url"].as_str().unwrap_or_default() {
                    "redirect" => Json(json!({ "status": "redirect", "url": "https://cdn.example/r.mp4" })),
                    "picker" => Json(json!({ "status": "picker", "picker": [{ "url": "https://cdn.example/p.mp4" }] })),
                    _ => Json(json!({ "status": "error", "text": "couldn't get this" })),
                }
            }),
        ))
        .await;
        let http = reqwest::Client::new();
        let endpoint = format!("{base}/api/json");

        assert_eq!(
            cobalt(&http, &endpoint, "redirect").await.unwrap(),
            ProviderResult::RemoteUrl("https://cdn.example/r.mp4".into())
        );
        assert_eq!(
            cobalt(&http, &endpoint, "picker").await.unwrap(),
            ProviderResult::RemoteUrl("https://cdn.example/p.mp4".into())
        );
        let err = cobalt(&http, &endpoint, "other").await.unwrap_err();
        assert_eq!(err.to_string(), "Cobalt error: couldn't get this");
    }
}
