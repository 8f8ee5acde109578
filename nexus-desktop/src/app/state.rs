use std::sync::Arc;

use nexus_application::{CommandService, EventHub, SessionHandle};
use nexus_core::backend::WindowControls;
use nexus_core::config::AppConfig;

use crate::terminal::shortcut::TerminalShortcutRegistrar;
use crate::terminal::window::TerminalWindow;

/// Application state shared by the terminal front end and the commands.
pub struct AppState {
    pub config: AppConfig,
    pub session: SessionHandle,
    pub commands: CommandService,
    pub events: EventHub,
    pub shortcuts: Arc<TerminalShortcutRegistrar>,
    pub window: Arc<TerminalWindow>,
}

impl AppState {
    pub fn window_controls(&self) -> Arc<dyn WindowControls> {
        self.window.clone()
    }
}
