//! # Webhook Endpoint
//!
//! HTTP surface of the bot. Every POST is verified against the raw body before it
//! is parsed; only then is the interaction routed. Deferred commands are handed to
//! the executor and acknowledged in the same request.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::json;
use std::sync::Arc;

use crate::application::deferred::{DeferredExecutor, Invocation};
use crate::application::router::{CommandRouter, RouteOutcome};
use crate::application::verifier::{SIGNATURE_HEADER, SignatureVerifier, TIMESTAMP_HEADER, Verification};
use crate::domain::interaction::{InteractionEvent, InteractionResponse};

pub struct AppState {
    pub verifier: SignatureVerifier,
    pub router: CommandRouter,
    pub executor: DeferredExecutor,
}

#[derive(Debug)]
pub enum WebhookReply {
    Unauthorized(&'static str),
    BadRequest(String),
    Respond(InteractionResponse),
}

impl IntoResponse for WebhookReply {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized(reason) => (StatusCode::UNAUTHORIZED, reason).into_response(),
            Self::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason).into_response(),
            Self::Respond(body) => Json(body).into_response(),
        }
    }
}

pub fn build_router(state: Arc<AppState>, path: &str) -> axum::Router {
    axum::Router::new()
        .route(path, post(interactions))
        .route("/health", get(health))
        .with_state(state)
}

async fn interactions(State(state): State<Arc<AppState>>, headers: HeaderMap, body: Bytes) -> WebhookReply {
    process(&state, &headers, &body)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "outstanding_tasks": state.executor.outstanding() }))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Verifies, parses and dispatches one webhook call.
pub fn process(state: &AppState, headers: &HeaderMap, body: &[u8]) -> WebhookReply {
    let verification = state.verifier.verify(
        header(headers, SIGNATURE_HEADER),
        header(headers, TIMESTAMP_HEADER),
        body,
    );
    if let Verification::Invalid(reason) = verification {
        tracing::warn!(reason, "Rejected webhook call");
        return WebhookReply::Unauthorized("invalid request signature");
    }

    let event = match InteractionEvent::from_slice(body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Malformed interaction payload: {:#}", e);
            return WebhookReply::BadRequest("malformed interaction".to_string());
        }
    };

    match event {
        InteractionEvent::Ping => WebhookReply::Respond(InteractionResponse::pong()),
        InteractionEvent::Command(cmd) => match state.router.route(&cmd) {
            RouteOutcome::Immediate(content) => WebhookReply::Respond(InteractionResponse::message(content)),
            RouteOutcome::Deferred(task) => {
                let mut invocation = Invocation::received(cmd.name.as_str(), cmd.callback.clone());
                invocation.acknowledge();
                state.executor.spawn(invocation, task);
                WebhookReply::Respond(InteractionResponse::deferred())
            }
        },
        InteractionEvent::Unsupported(kind) => {
            tracing::warn!(kind, "Unhandled interaction type");
            WebhookReply::BadRequest("Unhandled interaction".to_string())
        }
    }
}
