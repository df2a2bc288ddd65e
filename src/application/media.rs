//! # Media Service
//!
//! One [`FallbackEngine`] per supported platform, and the mapping from a
//! [`Resolution`] to the follow-up the user sees.

use std::collections::HashMap;

use crate::application::fallback::FallbackEngine;
use crate::domain::types::{FollowUp, MediaPlatform, Resolution};
use crate::strings::messages;

pub struct MediaService {
    engines: HashMap<MediaPlatform, FallbackEngine>,
    max_bytes: u64,
}

impl MediaService {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            engines: HashMap::new(),
            max_bytes,
        }
    }

    pub fn with_engine(mut self, platform: MediaPlatform, engine: FallbackEngine) -> Self {
        self.engines.insert(platform, engine);
        self
    }

    /// Platform for `url` if it is supported and has an engine.
    pub fn supports(&self, url: &str) -> Option<MediaPlatform> {
        MediaPlatform::detect(url).filter(|p| self.engines.contains_key(p))
    }

    pub async fn fetch(&self, platform: MediaPlatform, url: &str) -> FollowUp {
        let Some(engine) = self.engines.get(&platform) else {
            return FollowUp::text(messages::UNSUPPORTED_URL);
        };
        match engine.resolve(url).await {
            Resolution::Media(data) => {
                tracing::info!(platform = platform.as_str(), bytes = data.len(), "Media resolved");
                FollowUp::file(platform.file_name(), data)
            }
            Resolution::TooLarge(size) => {
                FollowUp::text(messages::video_too_large(size, self.max_bytes))
            }
            Resolution::NotFound => FollowUp::text(messages::no_video_found(url)),
        }
    }
}
