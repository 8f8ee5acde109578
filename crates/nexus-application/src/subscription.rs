//! Cancellable event subscriptions.
//!
//! A [`Subscription`] owns a listener task and the token that stops it.
//! Teardown happens exactly once: either through [`Subscription::teardown`]
//! or, failing that, when the value is dropped.

use std::future::Future;

use futures::future::join_all;
use nexus_core::event::{
    AUTOMATION_EVENT_CHANNEL, AutomationEvent, GLOBAL_SHORTCUT_CHANNEL, ShortcutNotification,
};
use nexus_core::error::Result;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::runtime::SessionHandle;
use crate::transport::EventHub;

pub struct Subscription {
    name: String,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Spawns `listener` with a token that is cancelled on teardown.
    pub fn spawn<F, Fut>(name: impl Into<String>, listener: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        let token = CancellationToken::new();
        let task = tokio::spawn(listener(token.clone()));
        tracing::debug!("[Subscription] '{}' established", name);
        Self {
            name,
            token,
            task: Some(task),
        }
    }

    /// True until teardown, even if the listener has already returned.
    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// Cancels the listener and waits for it to finish.
    pub async fn teardown(mut self) {
        if let Some(task) = self.task.take() {
            self.token.cancel();
            if let Err(e) = task.await {
                tracing::warn!("[Subscription] '{}' listener failed: {}", self.name, e);
            }
            tracing::debug!("[Subscription] '{}' torn down", self.name);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.task.take().is_some() {
            self.token.cancel();
            tracing::debug!("[Subscription] '{}' cancelled on drop", self.name);
        }
    }
}

/// Subscriptions established at startup, torn down together at shutdown.
#[derive(Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub async fn teardown_all(self) {
        join_all(self.subscriptions.into_iter().map(Subscription::teardown)).await;
    }
}

/// Receives the next payload, or `None` once cancelled or closed.
async fn next_payload(
    rx: &mut broadcast::Receiver<Value>,
    token: &CancellationToken,
    channel: &str,
) -> Option<Value> {
    loop {
        tokio::select! {
            _ = token.cancelled() => return None,
            received = rx.recv() => match received {
                Ok(payload) => return Some(payload),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Subscription] '{}' lagged, {} payloads skipped", channel, skipped);
                }
                Err(RecvError::Closed) => return None,
            },
        }
    }
}

/// Listens on `automation-event` and forwards decoded events to the session.
/// Undecodable payloads are logged and dropped.
pub fn listen_automation_events(hub: &EventHub, session: SessionHandle) -> Result<Subscription> {
    let mut rx = hub.subscribe(AUTOMATION_EVENT_CHANNEL)?;
    Ok(Subscription::spawn(AUTOMATION_EVENT_CHANNEL, move |token| async move {
        while let Some(payload) = next_payload(&mut rx, &token, AUTOMATION_EVENT_CHANNEL).await {
            let event = match AutomationEvent::decode(payload) {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("[Subscription] Dropping malformed automation event: {}", e);
                    continue;
                }
            };
            if session.ingest(event).is_err() {
                break;
            }
        }
    }))
}

/// Listens on `global-shortcut` and forwards notifications to the session.
pub fn listen_shortcuts(hub: &EventHub, session: SessionHandle) -> Result<Subscription> {
    let mut rx = hub.subscribe(GLOBAL_SHORTCUT_CHANNEL)?;
    Ok(Subscription::spawn(GLOBAL_SHORTCUT_CHANNEL, move |token| async move {
        while let Some(payload) = next_payload(&mut rx, &token, GLOBAL_SHORTCUT_CHANNEL).await {
            let Some(notification) = ShortcutNotification::from_payload(&payload) else {
                tracing::warn!("[Subscription] Ignoring unknown shortcut payload: {}", payload);
                continue;
            };
            if session.notify_shortcut(notification).is_err() {
                break;
            }
        }
    }))
}
