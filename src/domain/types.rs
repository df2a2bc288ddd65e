//! # Domain Types
//!
//! Common data structures and enums used across the application logic.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Hosts the `download` command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaPlatform {
    TikTok,
    Instagram,
}

impl MediaPlatform {
    pub const ALL: [MediaPlatform; 2] = [MediaPlatform::TikTok, MediaPlatform::Instagram];

    /// Detects the platform from the URL host.
    pub fn detect(url: &str) -> Option<Self> {
        let parsed = reqwest::Url::parse(url.trim()).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return None;
        }
        let host = parsed.host_str()?.to_ascii_lowercase();
        let matches_domain = |domain: &str| host == domain || host.ends_with(&format!(".{domain}"));
        if matches_domain("tiktok.com") {
            Some(Self::TikTok)
        } else if matches_domain("instagram.com") {
            Some(Self::Instagram)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TikTok => "tiktok",
            Self::Instagram => "instagram",
        }
    }

    /// File name used for the uploaded attachment.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::TikTok => "tiktok.mp4",
            Self::Instagram => "reel.mp4",
        }
    }

    /// Path rewrites applied before any provider sees the URL.
    pub fn rewrites(&self) -> Vec<(String, String)> {
        match self {
            Self::TikTok => Vec::new(),
            Self::Instagram => vec![("/reels/".to_string(), "/reel/".to_string())],
        }
    }
}

/// Configurable media resolution strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "tikwm")]
    TikWm,
    #[serde(rename = "lovetik")]
    LoveTik,
    #[serde(rename = "cobalt")]
    Cobalt,
    #[serde(rename = "open_graph")]
    OpenGraph,
    #[serde(rename = "yt_dlp")]
    YtDlp,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TikWm => "TikWM",
            Self::LoveTik => "LoveTik",
            Self::Cobalt => "Cobalt",
            Self::OpenGraph => "OpenGraph",
            Self::YtDlp => "yt-dlp",
        }
    }
}

/// What a single provider strategy hands back.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResult {
    RawBytes(Bytes),
    RemoteUrl(String),
    Empty,
}

/// Outcome of running the whole fallback chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Media(Bytes),
    /// Size in bytes (or the size hint that triggered the rejection).
    TooLarge(u64),
    NotFound,
}

/// A binary file attached to a follow-up.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

/// The single message that finishes a deferred invocation.
#[derive(Debug, Clone, Default)]
pub struct FollowUp {
    pub content: String,
    pub embeds: Vec<Embed>,
    pub attachment: Option<Attachment>,
}

impl FollowUp {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ..Self::default()
        }
    }

    pub fn file(file_name: impl Into<String>, data: Bytes) -> Self {
        Self {
            attachment: Some(Attachment {
                file_name: file_name.into(),
                data,
            }),
            ..Self::default()
        }
    }
}
