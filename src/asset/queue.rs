//! Background model loading
//!
//! Decoding runs on tokio's blocking pool so the frame loop never stalls.
//! Only the most recent request is delivered; a completion for an older
//! ticket is dropped when it arrives.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::core::{Error, Result};

use super::loader::LoaderRegistry;
use super::source::ModelSource;
use super::tree::ModelTree;

/// Identifies one load request. Later requests have larger tickets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(pub u64);

/// Outcome of a finished load.
#[derive(Debug)]
pub struct LoadCompletion {
    pub ticket: LoadTicket,
    /// File name of the source, for notifications
    pub source_name: String,
    pub result: Result<ModelTree>,
    pub load_time: Duration,
}

/// Queue of in-flight loads where the last request wins.
pub struct LoadQueue {
    runtime: Handle,
    registry: Arc<LoaderRegistry>,
    result_tx: mpsc::UnboundedSender<LoadCompletion>,
    result_rx: mpsc::UnboundedReceiver<LoadCompletion>,
    next_ticket: u64,
    /// Ticket whose completion will be delivered, if still pending
    latest: Option<LoadTicket>,
    in_flight: usize,
}

impl LoadQueue {
    pub fn new(runtime: Handle, registry: Arc<LoaderRegistry>) -> Self {
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            registry,
            result_tx,
            result_rx,
            next_ticket: 0,
            latest: None,
            in_flight: 0,
        }
    }

    /// Create a queue on the tokio runtime the caller is running in.
    pub fn with_current_runtime(registry: Arc<LoaderRegistry>) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| Error::LoaderUnavailable)?;
        Ok(Self::new(runtime, registry))
    }

    /// Start loading `source`. Any request still pending is superseded.
    pub fn submit(&mut self, source: ModelSource) -> LoadTicket {
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;

        if let Some(previous) = self.latest.replace(ticket) {
            log::debug!("Load {:?} superseded by {:?}", previous, ticket);
        }
        self.in_flight += 1;

        let registry = Arc::clone(&self.registry);
        let result_tx = self.result_tx.clone();
        let source_name = source.file_name();

        self.runtime.spawn(async move {
            let start = Instant::now();
            let task_name = source_name.clone();
            let result = tokio::task::spawn_blocking(move || registry.load(&source))
                .await
                .unwrap_or_else(|e| {
                    log::error!("Loader task for '{}' failed: {}", task_name, e);
                    Err(Error::Load(format!("loader task failed: {}", e)))
                });

            // Receiver gone means the queue was dropped; nothing to report to
            let _ = result_tx.send(LoadCompletion {
                ticket,
                source_name,
                result,
                load_time: start.elapsed(),
            });
        });

        ticket
    }

    /// Drain finished loads without blocking and return the current one, if it finished.
    pub fn poll(&mut self) -> Option<LoadCompletion> {
        let mut delivered = None;
        while let Ok(completion) = self.result_rx.try_recv() {
            if let Some(current) = self.accept(completion) {
                delivered = Some(current);
            }
        }
        delivered
    }

    /// Wait for the current request to finish.
    ///
    /// Returns `None` once nothing is in flight, including when the only
    /// remaining loads were superseded.
    pub async fn next_completed(&mut self) -> Option<LoadCompletion> {
        while self.in_flight > 0 {
            let completion = self.result_rx.recv().await?;
            if let Some(current) = self.accept(completion) {
                return Some(current);
            }
        }
        None
    }

    fn accept(&mut self, completion: LoadCompletion) -> Option<LoadCompletion> {
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.latest != Some(completion.ticket) {
            log::debug!(
                "Discarding superseded load {:?} ('{}')",
                completion.ticket,
                completion.source_name
            );
            return None;
        }

        self.latest = None;
        Some(completion)
    }

    /// Whether the most recent request has not been delivered yet.
    pub fn is_loading(&self) -> bool {
        self.latest.is_some()
    }

    /// Loads still running, superseded ones included.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn registry(&self) -> &LoaderRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(name: &str) -> ModelSource {
        ModelSource::memory(name, b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n".to_vec())
    }

    fn queue() -> LoadQueue {
        LoadQueue::with_current_runtime(Arc::new(LoaderRegistry::default()))
            .expect("inside a runtime")
    }

    #[tokio::test]
    async fn test_load_completes() {
        let mut queue = queue();
        let ticket = queue.submit(triangle("tri.obj"));
        assert!(queue.is_loading());

        let completion = queue.next_completed().await.expect("completion");
        assert_eq!(completion.ticket, ticket);
        assert_eq!(completion.source_name, "tri.obj");
        assert_eq!(completion.result.unwrap().triangle_count(), 1);
        assert!(!queue.is_loading());
        assert_eq!(queue.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_last_request_wins() {
        let mut queue = queue();
        let first = queue.submit(triangle("first.obj"));
        let second = queue.submit(triangle("second.obj"));
        assert!(second > first);

        let completion = queue.next_completed().await.expect("completion");
        assert_eq!(completion.ticket, second);
        assert_eq!(completion.source_name, "second.obj");

        // The first load is dropped whenever it lands
        assert!(queue.next_completed().await.is_none());
        assert_eq!(queue.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_failure_is_delivered() {
        let mut queue = queue();
        queue.submit(ModelSource::memory("car.fbx", vec![0u8; 4]));

        let completion = queue.next_completed().await.expect("completion");
        assert!(matches!(completion.result, Err(Error::Load(_))));
    }

    #[tokio::test]
    async fn test_idle_queue() {
        let mut queue = queue();
        assert!(queue.poll().is_none());
        assert!(queue.next_completed().await.is_none());
        assert!(!queue.is_loading());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_poll_eventually_delivers() {
        let mut queue = queue();
        queue.submit(triangle("tri.obj"));

        let mut delivered = None;
        for _ in 0..200 {
            if let Some(completion) = queue.poll() {
                delivered = Some(completion);
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(delivered.expect("load never finished").result.is_ok());
    }

    #[test]
    fn test_requires_runtime() {
        let result = LoadQueue::with_current_runtime(Arc::new(LoaderRegistry::default()));
        assert!(matches!(result, Err(Error::LoaderUnavailable)));
    }
}
