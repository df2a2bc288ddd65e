//! # Deferred Execution
//!
//! Runs the slow half of a deferred command after the webhook has already answered
//! with an acknowledgment. Every spawned task ends in exactly one delivery attempt
//! through the invocation's [`CallbackHandle`], whether the work succeeded, returned
//! an error, or panicked. Tasks are registered with a [`TaskTracker`] so shutdown
//! can wait for outstanding work instead of dropping follow-ups.

use futures::FutureExt;
use futures::future::BoxFuture;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio_util::task::TaskTracker;

use crate::domain::interaction::CallbackHandle;
use crate::domain::traits::InteractionResponder;
use crate::domain::types::FollowUp;
use crate::strings::messages;

/// The expensive part of a deferred command.
pub type BackgroundTask = BoxFuture<'static, anyhow::Result<FollowUp>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    Received,
    Acknowledged,
    Succeeded,
    Failed,
    Delivered,
}

/// Lifecycle of one deferred invocation.
#[derive(Debug)]
pub struct Invocation {
    command: String,
    handle: CallbackHandle,
    state: InvocationState,
}

impl Invocation {
    pub fn received(command: impl Into<String>, handle: CallbackHandle) -> Self {
        Self {
            command: command.into(),
            handle,
            state: InvocationState::Received,
        }
    }

    pub fn state(&self) -> InvocationState {
        self.state
    }

    pub fn acknowledge(&mut self) {
        debug_assert_eq!(self.state, InvocationState::Received);
        self.state = InvocationState::Acknowledged;
    }

    /// Turns the task outcome into the message to deliver.
    fn settle(&mut self, outcome: Result<anyhow::Result<FollowUp>, String>) -> FollowUp {
        debug_assert_eq!(self.state, InvocationState::Acknowledged);
        match outcome {
            Ok(Ok(message)) => {
                self.state = InvocationState::Succeeded;
                message
            }
            Ok(Err(e)) => {
                self.state = InvocationState::Failed;
                tracing::error!(command = %self.command, "Background task failed: {:#}", e);
                FollowUp::text(messages::task_failed(&format!("{e:#}")))
            }
            Err(panic) => {
                self.state = InvocationState::Failed;
                tracing::error!(command = %self.command, "Background task panicked: {}", panic);
                FollowUp::text(messages::task_failed(&panic))
            }
        }
    }

    /// Single delivery attempt. Consumes the invocation so it cannot run twice.
    async fn deliver(mut self, responder: &dyn InteractionResponder, message: FollowUp) {
        let succeeded = self.state == InvocationState::Succeeded;
        match responder.edit_original(&self.handle, &message).await {
            Ok(()) => {
                tracing::info!(command = %self.command, succeeded, "Follow-up delivered");
            }
            Err(e) => {
                // The platform accepts one edit per token; a retry could only be rejected.
                tracing::error!(command = %self.command, "Follow-up delivery failed: {:#}", e);
            }
        }
        self.state = InvocationState::Delivered;
    }
}

/// Fire-and-forget scheduler with "work outstanding" tracking.
#[derive(Clone)]
pub struct DeferredExecutor {
    responder: Arc<dyn InteractionResponder>,
    tracker: TaskTracker,
}

impl DeferredExecutor {
    pub fn new(responder: Arc<dyn InteractionResponder>) -> Self {
        Self {
            responder,
            tracker: TaskTracker::new(),
        }
    }

    /// Schedules `task` for an already acknowledged invocation. Never blocks.
    pub fn spawn(&self, mut invocation: Invocation, task: BackgroundTask) {
        if invocation.state() == InvocationState::Received {
            invocation.acknowledge();
        }
        let responder = self.responder.clone();

        self.tracker.spawn(async move {
            let outcome = AssertUnwindSafe(task)
                .catch_unwind()
                .await
                .map_err(panic_message);
            let message = invocation.settle(outcome);
            invocation.deliver(responder.as_ref(), message).await;
        });
    }

    /// Number of background tasks still running.
    pub fn outstanding(&self) -> usize {
        self.tracker.len()
    }

    /// Stops accepting work and waits for every outstanding task to finish.
    pub async fn shutdown(&self) {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending > 0 {
            tracing::info!("Waiting for {} background task(s) to finish...", pending);
        }
        self.tracker.wait().await;
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "background task panicked".to_string()
    }
}
