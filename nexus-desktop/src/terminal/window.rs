//! Window chrome for the terminal front end.

use std::sync::Mutex;

use async_trait::async_trait;
use nexus_core::backend::WindowControls;
use nexus_core::error::Result;
use tokio_util::sync::CancellationToken;

/// Chrome flags read by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowFlags {
    pub minimized: bool,
    pub maximized: bool,
    pub always_on_top: bool,
}

/// Terminal stand-in for the desktop window.
///
/// Minimized collapses the view to one line, maximized shows the whole
/// history, and closing cancels the token the key loop waits on.
#[derive(Debug)]
pub struct TerminalWindow {
    flags: Mutex<WindowFlags>,
    closed: CancellationToken,
}

impl TerminalWindow {
    pub fn new(closed: CancellationToken) -> Self {
        Self {
            flags: Mutex::new(WindowFlags::default()),
            closed,
        }
    }

    pub fn flags(&self) -> WindowFlags {
        *self.flags.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Brings a minimized window back. Returns whether it was minimized.
    pub fn restore(&self) -> bool {
        let mut flags = self.flags.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut flags.minimized, false)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    fn update<T>(&self, f: impl FnOnce(&mut WindowFlags) -> T) -> T {
        let mut flags = self.flags.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut flags)
    }
}

#[async_trait]
impl WindowControls for TerminalWindow {
    async fn minimize(&self) -> Result<()> {
        self.update(|flags| flags.minimized = true);
        tracing::debug!("[Window] Minimized");
        Ok(())
    }

    async fn toggle_maximize(&self) -> Result<bool> {
        let maximized = self.update(|flags| {
            flags.maximized = !flags.maximized;
            flags.maximized
        });
        tracing::debug!("[Window] Maximized: {}", maximized);
        Ok(maximized)
    }

    async fn close(&self) -> Result<()> {
        tracing::info!("[Window] Close requested");
        self.closed.cancel();
        Ok(())
    }

    async fn toggle_always_on_top(&self) -> Result<bool> {
        let on_top = self.update(|flags| {
            flags.always_on_top = !flags.always_on_top;
            flags.always_on_top
        });
        tracing::debug!("[Window] Always on top: {}", on_top);
        Ok(on_top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_toggles() {
        let window = TerminalWindow::new(CancellationToken::new());

        assert!(window.toggle_maximize().await.unwrap());
        assert!(!window.toggle_maximize().await.unwrap());
        assert!(window.toggle_always_on_top().await.unwrap());
        assert_eq!(
            window.flags(),
            WindowFlags {
                minimized: false,
                maximized: false,
                always_on_top: true,
            }
        );
    }

    #[tokio::test]
    async fn test_minimize_and_restore() {
        let window = TerminalWindow::new(CancellationToken::new());
        window.minimize().await.unwrap();
        assert!(window.flags().minimized);

        assert!(window.restore());
        assert!(!window.restore());
        assert!(!window.flags().minimized);
    }

    #[tokio::test]
    async fn test_close_cancels_token() {
        let token = CancellationToken::new();
        let window = TerminalWindow::new(token.clone());

        window.close().await.unwrap();
        assert!(window.is_closed());
        assert!(token.is_cancelled());
    }
}
