//! Background history writer.
//!
//! The persistence hook runs inside the session runtime task, but the file
//! repository locks, fsyncs and renames. [`BackgroundHistoryWriter`] takes
//! the save off the runtime: `save` only queues the records, and a worker
//! task writes the latest queued history on the blocking pool.

use std::sync::Arc;

use nexus_core::action::ActionRecord;
use nexus_core::error::{NexusError, Result};
use nexus_core::history::HistoryRepository;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

enum WriteRequest {
    Save(Vec<ActionRecord>),
    Flush(oneshot::Sender<()>),
}

/// [`HistoryRepository`] that defers writes to a worker task.
///
/// Loads go straight to the wrapped repository; they only happen once at
/// startup, before the runtime exists. Saves queued while a write is in
/// progress collapse into one write of the newest history.
#[derive(Clone)]
pub struct BackgroundHistoryWriter {
    inner: Arc<dyn HistoryRepository>,
    requests: mpsc::UnboundedSender<WriteRequest>,
}

impl BackgroundHistoryWriter {
    /// Starts the worker. It stops once every writer clone is dropped.
    pub fn spawn(inner: Arc<dyn HistoryRepository>) -> (Self, JoinHandle<()>) {
        let (requests, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(inner.clone(), rx));
        (Self { inner, requests }, worker)
    }

    /// Waits until every save queued before this call has been written.
    pub async fn flush(&self) -> Result<()> {
        let (done, wait) = oneshot::channel();
        self.requests
            .send(WriteRequest::Flush(done))
            .map_err(|_| NexusError::transport("history writer has stopped"))?;
        wait.await
            .map_err(|_| NexusError::transport("history writer has stopped"))
    }
}

impl HistoryRepository for BackgroundHistoryWriter {
    fn load(&self) -> Result<Vec<ActionRecord>> {
        self.inner.load()
    }

    fn save(&self, records: &[ActionRecord]) -> Result<()> {
        self.requests
            .send(WriteRequest::Save(records.to_vec()))
            .map_err(|_| NexusError::transport("history writer has stopped"))
    }
}

async fn run_worker(
    inner: Arc<dyn HistoryRepository>,
    mut requests: mpsc::UnboundedReceiver<WriteRequest>,
) {
    while let Some(first) = requests.recv().await {
        let mut latest = None;
        let mut waiters = Vec::new();
        let mut next = Some(first);
        while let Some(request) = next {
            match request {
                WriteRequest::Save(records) => latest = Some(records),
                WriteRequest::Flush(done) => waiters.push(done),
            }
            next = requests.try_recv().ok();
        }

        if let Some(records) = latest {
            write(inner.clone(), records).await;
        }
        for done in waiters {
            let _ = done.send(());
        }
    }
    tracing::debug!("[Persistence] History writer stopped");
}

async fn write(inner: Arc<dyn HistoryRepository>, records: Vec<ActionRecord>) {
    let count = records.len();
    match tokio::task::spawn_blocking(move || inner.save(&records)).await {
        Ok(Ok(())) => tracing::debug!("[Persistence] Wrote {} history entries", count),
        Ok(Err(e)) => {
            tracing::warn!("[Persistence] Failed to persist automation history: {}", e)
        }
        Err(e) => tracing::error!("[Persistence] History write task failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::mpsc as std_mpsc;

    /// Repository whose saves block until the test releases them.
    struct GatedRepository {
        gate: Mutex<std_mpsc::Receiver<()>>,
        saved: Mutex<Vec<Vec<ActionRecord>>>,
        fail: bool,
    }

    impl GatedRepository {
        fn new(fail: bool) -> (Arc<Self>, std_mpsc::Sender<()>) {
            let (release, gate) = std_mpsc::channel();
            let repository = Arc::new(Self {
                gate: Mutex::new(gate),
                saved: Mutex::new(Vec::new()),
                fail,
            });
            (repository, release)
        }
    }

    impl HistoryRepository for GatedRepository {
        fn load(&self) -> Result<Vec<ActionRecord>> {
            Ok(self.saved.lock().unwrap().last().cloned().unwrap_or_default())
        }

        fn save(&self, records: &[ActionRecord]) -> Result<()> {
            let _ = self.gate.lock().unwrap().recv();
            if self.fail {
                return Err(NexusError::config("disk full"));
            }
            self.saved.lock().unwrap().push(records.to_vec());
            Ok(())
        }
    }

    fn record(id: &str) -> ActionRecord {
        ActionRecord {
            id: id.to_string(),
            prompt: "Open Chrome".to_string(),
            actions: vec!["Launched application".to_string()],
            success: true,
            duration_ms: 210.0,
            timestamp: "2026-10-18T11:00:00Z".to_string(),
            screenshots: None,
        }
    }

    #[tokio::test]
    async fn test_save_returns_before_the_write() {
        let (repository, release) = GatedRepository::new(false);
        let (writer, _worker) = BackgroundHistoryWriter::spawn(repository.clone());

        writer.save(&[record("a")]).unwrap();
        writer.save(&[record("b"), record("a")]).unwrap();
        assert!(repository.saved.lock().unwrap().is_empty());

        for _ in 0..2 {
            release.send(()).unwrap();
        }
        writer.flush().await.unwrap();

        let saved = repository.saved.lock().unwrap();
        let last = saved.last().unwrap();
        assert_eq!(last.len(), 2);
        assert_eq!(last[0].id, "b");
    }

    #[tokio::test]
    async fn test_load_reads_through() {
        let (repository, release) = GatedRepository::new(false);
        let (writer, _worker) = BackgroundHistoryWriter::spawn(repository);

        release.send(()).unwrap();
        writer.save(&[record("a")]).unwrap();
        writer.flush().await.unwrap();

        assert_eq!(writer.load().unwrap(), vec![record("a")]);
    }

    #[tokio::test]
    async fn test_failed_write_does_not_stop_worker() {
        let (repository, release) = GatedRepository::new(true);
        let (writer, _worker) = BackgroundHistoryWriter::spawn(repository);

        for _ in 0..2 {
            release.send(()).unwrap();
        }
        writer.save(&[record("a")]).unwrap();
        writer.flush().await.unwrap();
        writer.save(&[record("b")]).unwrap();
        writer.flush().await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_stops_when_writers_drop() {
        let (repository, _release) = GatedRepository::new(false);
        let (writer, worker) = BackgroundHistoryWriter::spawn(repository);

        writer.flush().await.unwrap();
        drop(writer);
        worker.await.unwrap();
    }
}
