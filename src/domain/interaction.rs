//! # Interaction Events
//!
//! Typed view of the signed JSON envelope Discord posts to the webhook, plus the
//! response bodies the webhook answers with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discord option type for user references.
const OPTION_TYPE_USER: u8 = 6;
const OPTION_TYPE_INTEGER: u8 = 4;

/// The capability needed to deliver the single follow-up of an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackHandle {
    pub application_id: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    User(String),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandOption {
    pub name: String,
    pub value: OptionValue,
}

#[derive(Debug, Clone)]
pub struct CommandInvocation {
    pub name: String,
    pub options: Vec<CommandOption>,
    /// Invoking user (guild member or DM user).
    pub user_id: Option<String>,
    pub callback: CallbackHandle,
}

impl CommandInvocation {
    fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .map(|o| &o.value)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.option(name)? {
            OptionValue::String(s) | OptionValue::User(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.option(name)? {
            OptionValue::Integer(i) => Some(*i),
            OptionValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Explicit `user` option, falling back to the invoking user.
    pub fn target_user(&self) -> Option<&str> {
        self.explicit_user().or(self.user_id.as_deref())
    }

    pub fn explicit_user(&self) -> Option<&str> {
        match self.option("user") {
            Some(OptionValue::User(id)) | Some(OptionValue::String(id)) => Some(id.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum InteractionEvent {
    Ping,
    Command(CommandInvocation),
    Unsupported(u8),
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default)]
    data: Option<RawCommandData>,
    #[serde(default)]
    member: Option<RawMember>,
    #[serde(default)]
    user: Option<RawUser>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    application_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCommandData {
    name: String,
    #[serde(default)]
    options: Vec<RawOption>,
}

#[derive(Debug, Deserialize)]
struct RawOption {
    name: String,
    #[serde(rename = "type", default)]
    kind: u8,
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct RawMember {
    user: Option<RawUser>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    id: String,
}

impl InteractionEvent {
    /// Parses an already verified request body.
    pub fn from_slice(body: &[u8]) -> anyhow::Result<Self> {
        let raw: RawEnvelope = serde_json::from_slice(body)?;
        match raw.kind {
            1 => Ok(Self::Ping),
            2 => {
                let data = raw
                    .data
                    .ok_or_else(|| anyhow::anyhow!("command interaction without data"))?;
                let token = raw
                    .token
                    .ok_or_else(|| anyhow::anyhow!("command interaction without token"))?;
                let application_id = raw
                    .application_id
                    .ok_or_else(|| anyhow::anyhow!("command interaction without application_id"))?;
                let user_id = raw
                    .member
                    .and_then(|m| m.user)
                    .or(raw.user)
                    .map(|u| u.id);

                Ok(Self::Command(CommandInvocation {
                    name: data.name,
                    options: data.options.into_iter().map(CommandOption::from).collect(),
                    user_id,
                    callback: CallbackHandle {
                        application_id,
                        token,
                    },
                }))
            }
            other => Ok(Self::Unsupported(other)),
        }
    }
}

impl From<RawOption> for CommandOption {
    fn from(raw: RawOption) -> Self {
        let value = match (raw.kind, raw.value) {
            (OPTION_TYPE_USER, Value::String(id)) => OptionValue::User(id),
            (OPTION_TYPE_INTEGER, Value::Number(n)) if n.is_i64() => {
                OptionValue::Integer(n.as_i64().unwrap_or_default())
            }
            (_, Value::String(s)) => OptionValue::String(s),
            (_, Value::Number(n)) if n.is_i64() => OptionValue::Integer(n.as_i64().unwrap_or_default()),
            (_, other) => OptionValue::Other(other),
        };
        Self {
            name: raw.name,
            value,
        }
    }
}

/// Body returned synchronously to the webhook caller.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResponseData {
    pub content: String,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self { kind: 1, data: None }
    }

    pub fn message(content: impl Into<String>) -> Self {
        Self {
            kind: 4,
            data: Some(ResponseData {
                content: content.into(),
            }),
        }
    }

    pub fn deferred() -> Self {
        Self { kind: 5, data: None }
    }
}
