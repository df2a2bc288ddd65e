//! # Media Providers
//!
//! Concrete strategies behind the `MediaProvider` trait:
//! - TikWM and LoveTik for TikTok (JSON APIs returning a direct video URL)
//! - Cobalt, an `og:video` page scrape, and a local `yt-dlp` run for Instagram
//!
//! The per-platform order comes from `media.providers` in the config.

mod api;
mod open_graph;
mod yt_dlp;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::application::fallback::FallbackEngine;
use crate::application::media::MediaService;
use crate::domain::config::MediaConfig;
use crate::domain::traits::MediaProvider;
use crate::domain::types::{MediaPlatform, ProviderKind, ProviderResult};
use crate::strings::logs;

pub struct MediaStrategy {
    kind: ProviderKind,
    http: reqwest::Client,
    endpoint: String,
    yt_dlp_binary: String,
}

fn default_endpoint(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::TikWm => "https://www.tikwm.com/api/",
        ProviderKind::LoveTik => "https://lovetik.com/api/v2/download",
        ProviderKind::Cobalt => "https://api.cobalt.tools/api/json",
        ProviderKind::OpenGraph | ProviderKind::YtDlp => "",
    }
}

impl MediaStrategy {
    pub fn new(kind: ProviderKind, http: reqwest::Client, config: &MediaConfig) -> Self {
        let strategy = Self {
            kind,
            http,
            endpoint: default_endpoint(kind).to_string(),
            yt_dlp_binary: config.yt_dlp_binary.clone(),
        };
        match config.endpoints.get(&kind) {
            Some(endpoint) => strategy.with_endpoint(endpoint.clone()),
            None => strategy,
        }
    }

    /// Points an API strategy at a different host.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl MediaProvider for MediaStrategy {
    fn name(&self) -> &str {
        self.kind.as_str()
    }

    async fn resolve(&self, url: &str) -> Result<ProviderResult> {
        match self.kind {
            ProviderKind::TikWm => api::tikwm(&self.http, &self.endpoint, url).await,
            ProviderKind::LoveTik => api::lovetik(&self.http, &self.endpoint, url).await,
            ProviderKind::Cobalt => api::cobalt(&self.http, &self.endpoint, url).await,
            ProviderKind::OpenGraph => open_graph::scrape(&self.http, url).await,
            ProviderKind::YtDlp => yt_dlp::download(&self.yt_dlp_binary, url).await,
        }
    }
}

/// Shared HTTP client for providers and media downloads.
pub fn http_client(config: &MediaConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(config.download_timeout())
        .connect_timeout(Duration::from_secs(10))
        .build()?)
}

/// One fallback engine per platform, in configured provider order.
pub fn build_media_service(config: &MediaConfig, http: &reqwest::Client) -> MediaService {
    let mut service = MediaService::new(config.max_upload_bytes);
    for platform in MediaPlatform::ALL {
        let Some(kinds) = config.providers.get(&platform) else {
            continue;
        };
        let providers: Vec<Arc<dyn MediaProvider>> = kinds
            .iter()
            .map(|kind| Arc::new(MediaStrategy::new(*kind, http.clone(), config)) as Arc<dyn MediaProvider>)
            .collect();
        let engine = FallbackEngine::new(providers, http.clone(), config.provider_timeout(), config.max_upload_bytes)
            .with_rewrites(platform.rewrites());
        tracing::info!("{}", logs::providers_configured(platform.as_str(), &engine.provider_names()));
        service = service.with_engine(platform, engine);
    }
    service
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_covers_both_platforms() {
        let config = MediaConfig::default();
        let http = reqwest::Client::new();
        let service = build_media_service(&config, &http);
        assert_eq!(
            service.supports("https://vm.tiktok.com/ZMabc/"),
            Some(MediaPlatform::TikTok)
        );
        assert_eq!(
            service.supports("https://www.instagram.com/reels/abc/"),
            Some(MediaPlatform::Instagram)
        );
    }

    #[tokio::test]
    async fn test_missing_yt_dlp_binary_is_a_provider_failure() {
        let config = MediaConfig {
            yt_dlp_binary: "gbm-bot-no-such-binary".to_string(),
            ..MediaConfig::default()
        };
        let strategy = MediaStrategy::new(ProviderKind::YtDlp, reqwest::Client::new(), &config);
        assert_eq!(strategy.name(), "yt-dlp");
        assert!(strategy.resolve("https://www.instagram.com/reel/x/").await.is_err());
    }

    #[tokio::test]
    async fn test_tikwm_url_flows_through_engine() {
        use axum::routing::get;
        use serde_json::json;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let video_url = format!("{base}/video.mp4");
        let app = axum::Router::new()
            .route(
                "/api/",
                get(move || {
                    let video_url = video_url.clone();
                    async move { axum::Json(json!({ "code": 0, "data": { "play": video_url } })) }
                }),
            )
            .route("/video.mp4", get(|| async { vec![1u8; 64] }));
        tokio::spawn(async move { axum::serve(listener, app).await });

        let mut config = MediaConfig::default();
        config.endpoints.insert(ProviderKind::TikWm, format!("{base}/api/"));
        let http = reqwest::Client::new();
        let tikwm = MediaStrategy::new(ProviderKind::TikWm, http.clone(), &config);
        let engine = FallbackEngine::new(
            vec![Arc::new(tikwm) as Arc<dyn MediaProvider>],
            http,
            config.provider_timeout(),
            config.max_upload_bytes,
        );
        let resolution = engine.resolve("https://www.tiktok.com/@a/video/1").await;
        assert_eq!(resolution, crate::domain::types::Resolution::Media(bytes::Bytes::from(vec![1u8; 64])));
    }
}
