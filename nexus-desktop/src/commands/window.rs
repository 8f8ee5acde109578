//! Window chrome commands.
//!
//! Each call runs on its own task so the key loop never waits on the window;
//! failures are only logged.

use std::future::Future;
use std::sync::Arc;

use nexus_core::backend::WindowControls;
use nexus_core::error::Result;
use tokio::task::JoinHandle;

fn spawn_window_command<F, Fut, T>(
    name: &'static str,
    controls: Arc<dyn WindowControls>,
    f: F,
) -> JoinHandle<()>
where
    F: FnOnce(Arc<dyn WindowControls>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: std::fmt::Debug + Send + 'static,
{
    tokio::spawn(async move {
        match f(controls).await {
            Ok(value) => tracing::debug!("[Window] {} -> {:?}", name, value),
            Err(e) => tracing::error!("[Window] {} failed: {}", name, e),
        }
    })
}

pub fn minimize_window(controls: Arc<dyn WindowControls>) -> JoinHandle<()> {
    spawn_window_command("minimize", controls, |c| async move { c.minimize().await })
}

pub fn maximize_window(controls: Arc<dyn WindowControls>) -> JoinHandle<()> {
    spawn_window_command("toggle_maximize", controls, |c| async move {
        c.toggle_maximize().await
    })
}

pub fn close_window(controls: Arc<dyn WindowControls>) -> JoinHandle<()> {
    spawn_window_command("close", controls, |c| async move { c.close().await })
}

pub fn toggle_always_on_top(controls: Arc<dyn WindowControls>) -> JoinHandle<()> {
    spawn_window_command("toggle_always_on_top", controls, |c| async move {
        c.toggle_always_on_top().await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nexus_core::error::NexusError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct BrokenWindow {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WindowControls for BrokenWindow {
        async fn minimize(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(NexusError::transport("no window"))
        }

        async fn toggle_maximize(&self) -> Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(NexusError::transport("no window"))
        }

        async fn close(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(NexusError::transport("no window"))
        }

        async fn toggle_always_on_top(&self) -> Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(NexusError::transport("no window"))
        }
    }

    #[tokio::test]
    async fn test_failures_are_contained() {
        let window = Arc::new(BrokenWindow::default());
        let controls: Arc<dyn WindowControls> = window.clone();

        minimize_window(controls.clone()).await.unwrap();
        maximize_window(controls.clone()).await.unwrap();
        toggle_always_on_top(controls.clone()).await.unwrap();
        close_window(controls).await.unwrap();

        assert_eq!(window.calls.load(Ordering::SeqCst), 4);
    }
}
