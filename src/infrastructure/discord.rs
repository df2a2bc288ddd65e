//! # Discord REST Adapter
//!
//! Implements the `InteractionResponder` trait on top of the Discord HTTP API.
//! Follow-ups edit the deferred placeholder through the interaction webhook, which
//! needs no bot token; channel posts and command registration use `Bot` auth.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};

use crate::domain::interaction::CallbackHandle;
use crate::domain::traits::InteractionResponder;
use crate::domain::types::FollowUp;

#[derive(Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl DiscordClient {
    pub fn new(http: reqwest::Client, api_base: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
        }
    }

    fn auth(&self) -> String {
        format!("Bot {}", self.bot_token)
    }

    /// Replaces the full slash-command set, for one guild or globally.
    pub async fn register_commands(
        &self,
        application_id: &str,
        guild_id: Option<&str>,
        commands: &Value,
    ) -> Result<usize> {
        let url = match guild_id {
            Some(guild) => format!("{}/applications/{application_id}/guilds/{guild}/commands", self.api_base),
            None => format!("{}/applications/{application_id}/commands", self.api_base),
        };
        let res = self
            .http
            .put(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .json(commands)
            .send()
            .await
            .context("Failed to reach Discord")?;
        let registered: Vec<Value> = check(res, "register commands").await?.json().await?;
        Ok(registered.len())
    }
}

fn payload(message: &FollowUp) -> Value {
    let mut body = json!({ "content": message.content, "embeds": message.embeds });
    if let Some(attachment) = &message.attachment {
        body["attachments"] = json!([{ "id": 0, "filename": attachment.file_name }]);
    }
    body
}

async fn check(res: reqwest::Response, action: &str) -> Result<reqwest::Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let text = res.text().await.unwrap_or_default();
    tracing::error!(status = status.as_u16(), body = %text, "Discord API error during {}", action);
    Err(anyhow!("Discord API Error: {}", status.as_u16()))
}

#[async_trait]
impl InteractionResponder for DiscordClient {
    async fn edit_original(&self, handle: &CallbackHandle, message: &FollowUp) -> Result<()> {
        let url = format!(
            "{}/webhooks/{}/{}/messages/@original",
            self.api_base, handle.application_id, handle.token
        );
        let request = self.http.patch(&url);
        let request = match &message.attachment {
            Some(attachment) => {
                let file = Part::bytes(attachment.data.to_vec())
                    .file_name(attachment.file_name.clone())
                    .mime_str("video/mp4")?;
                let form = Form::new()
                    .text("payload_json", payload(message).to_string())
                    .part("files[0]", file);
                request.multipart(form)
            }
            None => request.json(&payload(message)),
        };

        let res = request.send().await.context("Failed to reach Discord")?;
        check(res, "follow-up").await?;
        Ok(())
    }

    async fn post_channel_message(&self, channel_id: &str, content: &str) -> Result<()> {
        let url = format!("{}/channels/{channel_id}/messages", self.api_base);
        let res = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .json(&json!({ "content": content }))
            .send()
            .await
            .context("Failed to reach Discord")?;
        check(res, "channel message").await?;
        Ok(())
    }
}
