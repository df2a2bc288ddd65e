//! # Provider Fallback Engine
//!
//! Resolves a source URL to media bytes by walking an ordered list of providers.
//! Providers run one after another and the first usable result wins; a failing
//! provider is logged and skipped, never surfaced as the overall failure.
//!
//! Size policy: anything larger than `max_bytes` resolves to [`Resolution::TooLarge`].
//! A `Content-Length` hint from a `HEAD` request is checked first when available, and
//! streamed downloads stop as soon as the cap is crossed.

use anyhow::{Context, Result, bail};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::traits::MediaProvider;
use crate::domain::types::{ProviderResult, Resolution};

pub struct FallbackEngine {
    providers: Vec<Arc<dyn MediaProvider>>,
    rewrites: Vec<(String, String)>,
    http: reqwest::Client,
    provider_timeout: Duration,
    max_bytes: u64,
}

/// Result of downloading a provider's URL.
enum Download {
    Complete(Bytes),
    TooLarge(u64),
}

impl FallbackEngine {
    pub fn new(
        providers: Vec<Arc<dyn MediaProvider>>,
        http: reqwest::Client,
        provider_timeout: Duration,
        max_bytes: u64,
    ) -> Self {
        Self {
            providers,
            rewrites: Vec::new(),
            http,
            provider_timeout,
            max_bytes,
        }
    }

    /// Adds a path segment rewrite applied before resolution (e.g. `/reels/` -> `/reel/`).
    pub fn with_rewrites(mut self, rewrites: Vec<(String, String)>) -> Self {
        self.rewrites = rewrites;
        self
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn normalize(&self, url: &str) -> String {
        self.rewrites
            .iter()
            .fold(url.trim().to_string(), |acc, (from, to)| acc.replace(from, to))
    }

    pub async fn resolve(&self, source_url: &str) -> Resolution {
        let url = self.normalize(source_url);
        tracing::info!("Resolving media for {}", url);

        for provider in &self.providers {
            let name = provider.name();
            tracing::debug!(provider = name, "Trying provider");

            let result = match tokio::time::timeout(self.provider_timeout, provider.resolve(&url)).await {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => {
                    tracing::warn!(provider = name, "Provider failed: {:#}", e);
                    continue;
                }
                Err(_) => {
                    tracing::warn!(
                        provider = name,
                        "Provider timed out after {}s",
                        self.provider_timeout.as_secs()
                    );
                    continue;
                }
            };

            match result {
                ProviderResult::Empty => {
                    tracing::info!(provider = name, "Provider returned empty result");
                }
                ProviderResult::RawBytes(data) if data.is_empty() => {
                    tracing::info!(provider = name, "Provider returned an empty buffer");
                }
                ProviderResult::RawBytes(data) => {
                    tracing::info!(provider = name, bytes = data.len(), "Provider returned buffer");
                    return self.limit(data);
                }
                ProviderResult::RemoteUrl(media_url) => {
                    if !media_url.starts_with("http://") && !media_url.starts_with("https://") {
                        tracing::warn!(provider = name, "Provider returned invalid URL: {}", media_url);
                        continue;
                    }
                    tracing::info!(provider = name, "Provider returned URL: {}", preview(&media_url));
                    match self.download(&media_url).await {
                        Ok(Download::Complete(data)) if !data.is_empty() => {
                            return Resolution::Media(data);
                        }
                        Ok(Download::Complete(_)) => {
                            tracing::warn!(provider = name, "Downloaded media was empty");
                        }
                        Ok(Download::TooLarge(size)) => {
                            tracing::info!(provider = name, size, "Media exceeds upload cap");
                            return Resolution::TooLarge(size);
                        }
                        Err(e) => {
                            tracing::warn!(provider = name, "Download failed: {:#}", e);
                        }
                    }
                }
            }
        }

        tracing::info!("All providers exhausted for {}", url);
        Resolution::NotFound
    }

    fn limit(&self, data: Bytes) -> Resolution {
        if data.len() as u64 > self.max_bytes {
            Resolution::TooLarge(data.len() as u64)
        } else {
            Resolution::Media(data)
        }
    }

    async fn download(&self, url: &str) -> Result<Download> {
        // Size hint is best effort; a failed HEAD never blocks the download.
        if let Ok(head) = self.http.head(url).send().await {
            if head.status().is_success() {
                // `content_length()` reflects the empty HEAD body, not the header.
                let hint = head
                    .headers()
                    .get(reqwest::header::CONTENT_LENGTH)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok());
                if let Some(size) = hint {
                    if size > self.max_bytes {
                        return Ok(Download::TooLarge(size));
                    }
                }
            }
        }

        let response = self.http.get(url).send().await.context("GET failed")?;
        let status = response.status();
        if !status.is_success() {
            bail!("media download returned status {}", status);
        }

        let mut buffer = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Failed to read media body")?;
            buffer.extend_from_slice(&chunk);
            if buffer.len() as u64 > self.max_bytes {
                return Ok(Download::TooLarge(buffer.len() as u64));
            }
        }
        Ok(Download::Complete(buffer.freeze()))
    }
}

fn preview(url: &str) -> &str {
    match url.char_indices().nth(50) {
        Some((idx, _)) => &url[..idx],
        None => url,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) const MIB: usize = 1024 * 1024;

    pub(crate) enum Script {
        Fail,
        Empty,
        Bytes(usize),
        Url(String),
        Hang,
    }

    pub(crate) struct ScriptedProvider {
        pub name: String,
        pub script: Script,
        pub calls: Arc<AtomicUsize>,
        pub seen: std::sync::Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        pub(crate) fn new(name: &str, script: Script) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                script,
                calls: Arc::new(AtomicUsize::new(0)),
                seen: std::sync::Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MediaProvider for ScriptedProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn resolve(&self, url: &str) -> Result<ProviderResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(url.to_string());
            match &self.script {
                Script::Fail => bail!("{} exploded", self.name),
                Script::Empty => Ok(ProviderResult::Empty),
                Script::Bytes(n) => Ok(ProviderResult::RawBytes(Bytes::from(vec![1u8; *n]))),
                Script::Url(u) => Ok(ProviderResult::RemoteUrl(u.clone())),
                Script::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(ProviderResult::Empty)
                }
            }
        }
    }

    pub(crate) fn engine(providers: Vec<Arc<ScriptedProvider>>) -> FallbackEngine {
        let providers = providers
            .into_iter()
            .map(|p| p as Arc<dyn MediaProvider>)
            .collect();
        FallbackEngine::new(
            providers,
            reqwest::Client::new(),
            Duration::from_millis(200),
            8 * MIB as u64,
        )
    }

    #[tokio::test]
    async fn test_first_success_wins_and_later_providers_are_skipped() {
        let p1 = ScriptedProvider::new("one", Script::Fail);
        let p2 = ScriptedProvider::new("two", Script::Empty);
        let p3 = ScriptedProvider::new("three", Script::Bytes(16));
        let p4 = ScriptedProvider::new("four", Script::Bytes(32));
        let engine = engine(vec![p1.clone(), p2.clone(), p3.clone(), p4.clone()]);

        let result = engine.resolve("https://www.tiktok.com/v/1").await;
        assert_eq!(result, Resolution::Media(Bytes::from(vec![1u8; 16])));
        assert_eq!((p1.calls(), p2.calls(), p3.calls(), p4.calls()), (1, 1, 1, 0));
    }

    #[tokio::test]
    async fn test_all_failing_providers_yield_not_found() {
        let engine = engine(vec![
            ScriptedProvider::new("a", Script::Fail),
            ScriptedProvider::new("b", Script::Empty),
            ScriptedProvider::new("c", Script::Bytes(0)),
            ScriptedProvider::new("d", Script::Url("file:///etc/passwd".into())),
        ]);
        assert_eq!(engine.resolve("https://x").await, Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_timed_out_provider_is_skipped() {
        let slow = ScriptedProvider::new("slow", Script::Hang);
        let fast = ScriptedProvider::new("fast", Script::Bytes(4));
        let engine = engine(vec![slow.clone(), fast.clone()]);
        assert!(matches!(engine.resolve("https://x").await, Resolution::Media(_)));
        assert_eq!(fast.calls(), 1);
    }

    #[tokio::test]
    async fn test_size_cap_boundary() {
        let exact = engine(vec![ScriptedProvider::new("exact", Script::Bytes(8 * MIB))]);
        assert!(matches!(exact.resolve("https://x").await, Resolution::Media(b) if b.len() == 8 * MIB));

        let over = engine(vec![ScriptedProvider::new("over", Script::Bytes(8 * MIB + 1))]);
        assert_eq!(
            over.resolve("https://x").await,
            Resolution::TooLarge(8 * MIB as u64 + 1)
        );
    }

    #[tokio::test]
    async fn test_rewrites_applied_before_providers() {
        let p = ScriptedProvider::new("p", Script::Empty);
        let engine = engine(vec![p.clone()])
            .with_rewrites(vec![("/reels/".to_string(), "/reel/".to_string())]);
        engine.resolve(" https://www.instagram.com/reels/abc/ ").await;
        assert_eq!(
            p.seen.lock().unwrap().as_slice(),
            ["https://www.instagram.com/reel/abc/".to_string()]
        );
    }

    async fn serve_media() -> String {
        use axum::{Router, http::StatusCode, routing::get};

        let app = Router::new()
            .route("/ok.mp4", get(|| async { vec![9u8; 64] }))
            .route("/missing.mp4", get(|| async { StatusCode::NOT_FOUND }))
            .route("/huge.mp4", get(|| async { vec![0u8; 8 * MIB + 1] }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_remote_url_is_downloaded_and_bad_status_falls_through() {
        let base = serve_media().await;
        let missing = ScriptedProvider::new("missing", Script::Url(format!("{base}/missing.mp4")));
        let ok = ScriptedProvider::new("ok", Script::Url(format!("{base}/ok.mp4")));
        let engine = engine(vec![missing.clone(), ok.clone()]);

        let result = engine.resolve("https://x").await;
        assert_eq!(result, Resolution::Media(Bytes::from(vec![9u8; 64])));
        assert_eq!((missing.calls(), ok.calls()), (1, 1));
    }

    #[tokio::test]
    async fn test_size_hint_rejects_before_get() {
        use axum::{Router, http::Method, routing::get};

        let gets = Arc::new(AtomicUsize::new(0));
        let counter = gets.clone();
        let app = Router::new().route(
            "/huge.mp4",
            get(move |method: Method| {
                let counter = counter.clone();
                async move {
                    if method == Method::GET {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                    vec![0u8; 8 * MIB + 1]
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let engine = engine(vec![ScriptedProvider::new(
            "huge",
            Script::Url(format!("http://{addr}/huge.mp4")),
        )]);
        assert_eq!(
            engine.resolve("https://x").await,
            Resolution::TooLarge(8 * MIB as u64 + 1)
        );
        assert_eq!(gets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_oversized_download_is_too_large() {
        let base = serve_media().await;
        let engine = engine(vec![ScriptedProvider::new(
            "huge",
            Script::Url(format!("{base}/huge.mp4")),
        )]);
        assert!(matches!(engine.resolve("https://x").await, Resolution::TooLarge(n) if n > 8 * MIB as u64));
    }
}
