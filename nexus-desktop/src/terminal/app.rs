//! Front-end state: the palette controller, the latest session snapshot and
//! the reaction to each key press. Terminal I/O lives in the parent module.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use crossterm::event::KeyEvent;
use nexus_core::event::ShortcutNotification;
use nexus_core::palette::{PaletteController, PaletteOutcome};
use nexus_core::store::{HISTORY_CAPACITY, SessionState};

use super::keymap::{Intent, map_key};
use crate::app::AppState;
use crate::commands;
use crate::view;

const COMPACT_HISTORY_ENTRIES: usize = 5;
const HELP_LINE: &str =
    "Ctrl+K palette  Ctrl+L clear  Ctrl+E maximize  Ctrl+N minimize  Ctrl+T on top  Ctrl+Q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct FrontEnd {
    state: Arc<AppState>,
    palette: PaletteController,
    snapshot: Arc<SessionState>,
    /// Set after a local close until the store reports the palette closed.
    awaiting_close: bool,
}

impl FrontEnd {
    pub fn new(state: Arc<AppState>) -> Self {
        let snapshot = state.session.snapshot();
        let mut front = Self {
            state,
            palette: PaletteController::default(),
            snapshot: Arc::new(SessionState::default()),
            awaiting_close: false,
        };
        front.on_snapshot(snapshot);
        front
    }

    pub fn palette(&self) -> &PaletteController {
        &self.palette
    }

    pub fn snapshot(&self) -> &SessionState {
        &self.snapshot
    }

    /// Takes a new snapshot and reconciles the local palette with the store
    /// flag. Snapshots published before a local close reached the store are
    /// not allowed to reopen it.
    pub fn on_snapshot(&mut self, snapshot: Arc<SessionState>) {
        if !snapshot.is_command_palette_open {
            self.awaiting_close = false;
        }
        self.snapshot = snapshot;
        self.reconcile_palette();
    }

    fn reconcile_palette(&mut self) {
        if self.awaiting_close || !self.snapshot.is_command_palette_open {
            return;
        }
        if self.palette.open() {
            self.palette.take_focus_request();
            tracing::debug!("[FrontEnd] Command palette opened");
        }
    }

    /// An open request supersedes a pending close.
    fn request_open(&mut self) {
        self.awaiting_close = false;
        self.reconcile_palette();
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> Flow {
        let accelerator = self.state.shortcuts.current();
        let intent = map_key(event, self.palette.is_open(), accelerator.as_ref());

        if intent != Intent::Quit && self.state.window.restore() {
            return Flow::Continue;
        }

        match intent {
            Intent::GlobalShortcut => {
                if let Err(e) = self
                    .state
                    .events
                    .emit_shortcut(ShortcutNotification::OpenCommandPalette)
                {
                    tracing::error!("[FrontEnd] Failed to publish shortcut: {}", e);
                }
                self.request_open();
            }
            Intent::OpenPalette => {
                self.set_palette_flag(true);
                self.request_open();
            }
            Intent::Palette(key) => {
                let outcome = self.palette.handle_key(key);
                self.apply_outcome(outcome);
            }
            Intent::Type(c) => {
                self.palette.push_char(c);
            }
            Intent::Backspace => {
                self.palette.backspace();
            }
            Intent::SelectSuggestion => {
                if let Some(index) = self.palette.session().map(|s| s.selected_index()) {
                    self.palette.select_suggestion(index);
                }
            }
            Intent::ActivateSuggestion(index) => {
                let outcome = self.palette.activate_suggestion(index);
                self.apply_outcome(outcome);
            }
            Intent::ClearHistory => {
                commands::clear_automation_history(&self.state);
            }
            Intent::ToggleMaximize => {
                commands::maximize_window(self.state.window_controls());
            }
            Intent::Minimize => {
                commands::minimize_window(self.state.window_controls());
            }
            Intent::ToggleAlwaysOnTop => {
                commands::toggle_always_on_top(self.state.window_controls());
            }
            Intent::Quit => {
                commands::close_window(self.state.window_controls());
                return Flow::Quit;
            }
            Intent::Ignore => {}
        }
        Flow::Continue
    }

    fn apply_outcome(&mut self, outcome: PaletteOutcome) {
        match outcome {
            PaletteOutcome::Dispatch(command) => {
                self.close_palette();
                if let Err(e) = commands::execute_automation(&self.state, &command) {
                    tracing::error!("[FrontEnd] Failed to execute command: {}", e);
                }
            }
            PaletteOutcome::Dismissed => self.close_palette(),
            PaletteOutcome::Updated | PaletteOutcome::Ignored => {}
        }
    }

    fn close_palette(&mut self) {
        self.awaiting_close = true;
        self.set_palette_flag(false);
    }

    fn set_palette_flag(&self, open: bool) {
        if let Err(e) = self.state.session.set_command_palette_open(open) {
            tracing::error!("[FrontEnd] Failed to update palette state: {}", e);
        }
    }

    pub fn render(&self, now: DateTime<Utc>) -> Vec<String> {
        let flags = self.state.window.flags();
        if flags.minimized {
            return vec![format!("Nexus (minimized)  {}", view::status_line(&self.snapshot))];
        }

        let mut title = "Nexus".to_string();
        if flags.maximized {
            title.push_str("  [maximized]");
        }
        if flags.always_on_top {
            title.push_str("  [on top]");
        }

        let mut lines = vec![title, view::status_bar(&self.snapshot), String::new()];
        lines.extend(view::stats_panel(&self.snapshot.stats));
        lines.push(String::new());
        lines.push("History".to_string());

        let limit = if flags.maximized {
            HISTORY_CAPACITY
        } else {
            COMPACT_HISTORY_ENTRIES
        };
        lines.extend(view::history_list(&self.snapshot.history, limit, now));

        if let Some(session) = self.palette.session() {
            lines.push(String::new());
            lines.push("Command Palette".to_string());
            lines.extend(view::palette_lines(session));
        }

        lines.push(String::new());
        lines.push(HELP_LINE.to_string());
        lines
    }
}
