//! Terminal front end: raw-mode key loop, redraws on every snapshot change.

pub mod app;
pub mod keymap;
pub mod shortcut;
pub mod window;

use std::io::{Write, stdout};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{cursor, execute, queue, style::Print};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::app::AppState;
use app::{Flow, FrontEnd};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Relative timestamps in the history list age without new snapshots.
const TICK_INTERVAL: Duration = Duration::from_secs(30);

/// Leaves raw mode and the alternate screen when dropped.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(stdout(), EnterAlternateScreen, cursor::Hide) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Forwards key presses from the blocking crossterm reader until `running`
/// clears or the receiver goes away.
fn spawn_key_reader(
    running: Arc<AtomicBool>,
) -> (mpsc::UnboundedReceiver<KeyEvent>, tokio::task::JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::task::spawn_blocking(move || {
        while running.load(Ordering::SeqCst) {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if tx.send(key).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!("[Terminal] Failed to read event: {}", e);
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    tracing::error!("[Terminal] Failed to poll events: {}", e);
                    break;
                }
            }
        }
    });
    (rx, handle)
}

fn draw(front: &FrontEnd) -> Result<()> {
    let lines = front.render(Utc::now());
    let mut out = stdout();
    queue!(
        out,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::All)
    )?;
    for (i, line) in lines.iter().enumerate() {
        let text = if i == 0 {
            line.bold().cyan().to_string()
        } else {
            line.clone()
        };
        queue!(out, Print(text), Print("\r\n"))?;
    }
    out.flush()?;
    Ok(())
}

/// Runs the front end until the window closes or the session stops.
pub async fn run(state: Arc<AppState>, closed: CancellationToken) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let running = Arc::new(AtomicBool::new(true));
    let (mut keys, reader) = spawn_key_reader(running.clone());

    let mut snapshots = state.session.watch();
    let mut front = FrontEnd::new(state);
    let mut tick = tokio::time::interval(TICK_INTERVAL);

    draw(&front)?;

    loop {
        tokio::select! {
            _ = closed.cancelled() => break,
            key = keys.recv() => {
                let Some(key) = key else { break };
                if front.handle_key(&key) == Flow::Quit {
                    break;
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    tracing::warn!("[Terminal] Session runtime stopped");
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                front.on_snapshot(snapshot);
            }
            _ = tick.tick() => {}
        }
        draw(&front)?;
    }

    running.store(false, Ordering::SeqCst);
    if let Err(e) = reader.await {
        tracing::warn!("[Terminal] Key reader failed: {}", e);
    }
    Ok(())
}
