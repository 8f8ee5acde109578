//! Single-owner session runtime.
//!
//! The [`AutomationStore`] lives inside one tokio task. Every write reaches
//! it as a [`SessionMessage`] through an unbounded mailbox and is applied in
//! arrival order. After each message the task publishes an immutable
//! snapshot on a `watch` channel, so readers never block the writer and
//! never see a half-applied transition.

use std::sync::Arc;

use nexus_core::action::AutomationStats;
use nexus_core::backend::StatsProvider;
use nexus_core::error::{NexusError, Result};
use nexus_core::event::{AutomationEvent, ShortcutNotification};
use nexus_core::store::{AutomationStore, SessionState};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::command_service::spawn_stats_refresh;
use crate::ingestion::EventIngestion;

/// A write request for the session runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionMessage {
    /// Lifecycle event decoded from the automation channel.
    Automation(AutomationEvent),
    /// Notification decoded from the global shortcut channel.
    Shortcut(ShortcutNotification),
    /// Result of a stats fetch.
    UpdateStats(AutomationStats),
    SetCommandPaletteOpen(bool),
    ClearHistory,
    /// Stops the runtime after everything queued before it.
    Shutdown,
}

/// Cloneable handle for reading snapshots and sending messages.
#[derive(Clone)]
pub struct SessionHandle {
    mailbox: mpsc::UnboundedSender<SessionMessage>,
    snapshots: watch::Receiver<Arc<SessionState>>,
}

impl SessionHandle {
    /// Latest published state.
    pub fn snapshot(&self) -> Arc<SessionState> {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified whenever a new snapshot is published.
    pub fn watch(&self) -> watch::Receiver<Arc<SessionState>> {
        self.snapshots.clone()
    }

    /// Queues a message. Fails only when the runtime has stopped.
    pub fn send(&self, message: SessionMessage) -> Result<()> {
        self.mailbox
            .send(message)
            .map_err(|_| NexusError::transport("session runtime has stopped"))
    }

    pub fn ingest(&self, event: AutomationEvent) -> Result<()> {
        self.send(SessionMessage::Automation(event))
    }

    pub fn notify_shortcut(&self, notification: ShortcutNotification) -> Result<()> {
        self.send(SessionMessage::Shortcut(notification))
    }

    pub fn update_stats(&self, stats: AutomationStats) -> Result<()> {
        self.send(SessionMessage::UpdateStats(stats))
    }

    pub fn set_command_palette_open(&self, open: bool) -> Result<()> {
        self.send(SessionMessage::SetCommandPaletteOpen(open))
    }

    pub fn clear_history(&self) -> Result<()> {
        self.send(SessionMessage::ClearHistory)
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(SessionMessage::Shutdown)
    }

    pub fn is_closed(&self) -> bool {
        self.mailbox.is_closed()
    }
}

pub struct SessionRuntime {
    store: AutomationStore,
    ingestion: EventIngestion,
    mailbox: mpsc::UnboundedReceiver<SessionMessage>,
    loopback: mpsc::WeakUnboundedSender<SessionMessage>,
    snapshots: watch::Sender<Arc<SessionState>>,
    stats: Option<Arc<dyn StatsProvider>>,
}

impl SessionRuntime {
    /// Creates the runtime around `store` together with its first handle.
    ///
    /// The runtime keeps only a weak reference to its own mailbox; it stops
    /// on [`SessionMessage::Shutdown`] or once every handle is dropped.
    pub fn new(store: AutomationStore) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(Arc::new(store.snapshot()));

        let runtime = Self {
            store,
            ingestion: EventIngestion::new(),
            mailbox: rx,
            loopback: tx.downgrade(),
            snapshots,
            stats: None,
        };
        let handle = SessionHandle {
            mailbox: tx,
            snapshots: snapshot_rx,
        };
        (runtime, handle)
    }

    /// Provider used for the refetch that follows every completed run.
    pub fn with_stats_provider(mut self, stats: Arc<dyn StatsProvider>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn spawn(self) -> JoinHandle<AutomationStore> {
        tokio::spawn(self.run())
    }

    /// Processes messages until shutdown and hands the store back.
    pub async fn run(mut self) -> AutomationStore {
        tracing::info!("[Runtime] Session runtime started");

        while let Some(message) = self.mailbox.recv().await {
            if message == SessionMessage::Shutdown {
                tracing::info!("[Runtime] Shutdown requested");
                break;
            }
            self.apply(message);
            self.publish();
        }

        self.mailbox.close();
        tracing::info!("[Runtime] Session runtime stopped");
        self.store
    }

    fn apply(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::Automation(event) => {
                let reaction = self.ingestion.apply(event, &mut self.store);
                if reaction.refresh_stats {
                    self.request_stats_refresh();
                }
            }
            SessionMessage::Shortcut(notification) => {
                self.ingestion.apply_shortcut(notification, &mut self.store);
            }
            SessionMessage::UpdateStats(stats) => self.store.update_stats(stats),
            SessionMessage::SetCommandPaletteOpen(open) => {
                self.store.set_command_palette_open(open)
            }
            SessionMessage::ClearHistory => {
                tracing::info!("[Runtime] Clearing history");
                self.store.clear_history();
            }
            SessionMessage::Shutdown => {}
        }
    }

    fn request_stats_refresh(&self) {
        let Some(stats) = self.stats.clone() else {
            tracing::debug!("[Runtime] No stats provider, skipping refetch");
            return;
        };
        let Some(mailbox) = self.loopback.upgrade() else {
            return;
        };
        let handle = SessionHandle {
            mailbox,
            snapshots: self.snapshots.subscribe(),
        };
        spawn_stats_refresh(stats, handle);
    }

    fn publish(&self) {
        let state = self.store.state();
        self.snapshots.send_if_modified(|current| {
            if current.as_ref() == state {
                false
            } else {
                *current = Arc::new(state.clone());
                true
            }
        });
    }
}
