use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use nexus_application::{
    BackgroundHistoryWriter, CommandService, EventHub, SessionRuntime, SubscriptionSet,
    listen_automation_events, listen_shortcuts,
};
use nexus_core::backend::ShortcutRegistrar;
use nexus_core::config::AppConfig;
use nexus_core::history::PersistenceBridge;
use nexus_core::store::AutomationStore;
use nexus_execution::SimulatedBackend;
use nexus_infrastructure::storage::SlotStore;
use nexus_infrastructure::{FileHistoryRepository, NexusPaths};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::app::AppState;
use crate::terminal::shortcut::TerminalShortcutRegistrar;
use crate::terminal::window::TerminalWindow;

/// Everything started at launch, plus what shutdown has to undo.
pub struct AppBootstrap {
    pub app_state: Arc<AppState>,
    /// Cancelled when the window closes.
    pub closed: CancellationToken,
    subscriptions: SubscriptionSet,
    runtime: JoinHandle<AutomationStore>,
    history_writer: BackgroundHistoryWriter,
}

impl AppBootstrap {
    /// Tears down subscriptions and shortcuts, stops the session runtime
    /// after it has drained its mailbox, then waits for pending history writes.
    pub async fn shutdown(self) -> AutomationStore {
        tracing::info!("[Bootstrap] Shutting down");
        self.subscriptions.teardown_all().await;

        if let Err(e) = self.app_state.shortcuts.unregister_all().await {
            tracing::warn!("[Bootstrap] Failed to unregister shortcuts: {}", e);
        }
        if let Err(e) = self.app_state.session.shutdown() {
            tracing::debug!("[Bootstrap] Runtime already stopped: {}", e);
        }

        let store = match self.runtime.await {
            Ok(store) => store,
            Err(e) => {
                tracing::error!("[Bootstrap] Session runtime failed: {}", e);
                AutomationStore::new()
            }
        };

        if let Err(e) = self.history_writer.flush().await {
            tracing::warn!("[Bootstrap] Failed to flush history: {}", e);
        }
        store
    }
}

fn history_repository(config: &AppConfig, paths: &NexusPaths) -> Result<FileHistoryRepository> {
    match &config.storage.slot_dir {
        Some(dir) => Ok(FileHistoryRepository::with_slot_store(SlotStore::new(
            PathBuf::from(dir),
        ))),
        None => FileHistoryRepository::new(paths).context("Failed to resolve the slot directory"),
    }
}

/// Composition root: restores history, starts the session runtime and the
/// backend, and wires the event subscriptions and the global shortcut.
pub async fn bootstrap(config: AppConfig, paths: &NexusPaths) -> Result<AppBootstrap> {
    let repository = Arc::new(history_repository(&config, paths)?);
    let (history_writer, _) = BackgroundHistoryWriter::spawn(repository);
    let bridge = PersistenceBridge::new(Arc::new(history_writer.clone()));
    let restored = bridge.restore();
    tracing::info!("[Bootstrap] Restored {} history entries", restored.len());

    let store = AutomationStore::new()
        .with_history(restored)
        .with_observer(Arc::new(bridge));

    let events = EventHub::default();
    let backend = Arc::new(SimulatedBackend::new(config.simulation.clone(), events.clone()));

    let (runtime, session) = SessionRuntime::new(store);
    let runtime = runtime.with_stats_provider(backend.clone()).spawn();

    // Subscriptions that fail to start are skipped; the rest still tear down.
    let mut subscriptions = SubscriptionSet::new();
    for subscription in [
        listen_automation_events(&events, session.clone()),
        listen_shortcuts(&events, session.clone()),
    ] {
        match subscription {
            Ok(subscription) => subscriptions.push(subscription),
            Err(e) => tracing::error!("[Bootstrap] Failed to subscribe: {}", e),
        }
    }

    let shortcuts = Arc::new(TerminalShortcutRegistrar::new());
    if let Err(e) = shortcuts.register(&config.shortcut.accelerator).await {
        tracing::warn!("[Bootstrap] Failed to register global shortcut: {}", e);
    }

    let commands = CommandService::new(backend.clone(), backend.clone(), session.clone())
        .with_history_provider(backend);
    commands.refresh_stats();

    let closed = CancellationToken::new();
    let window = Arc::new(TerminalWindow::new(closed.clone()));

    tracing::info!("[Bootstrap] Application ready");

    Ok(AppBootstrap {
        app_state: Arc::new(AppState {
            config,
            session,
            commands,
            events,
            shortcuts,
            window,
        }),
        closed,
        subscriptions,
        runtime,
        history_writer,
    })
}
