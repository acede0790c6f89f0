//! Fetch orchestration: debounced, cancellable monitor requests.
//!
//! The UI loop is synchronous; fetches run on a tokio runtime and report back
//! through a channel. Each request carries a generation number and only the
//! completion of the most recent generation is committed, so a slow response
//! can never overwrite the result of a request started after it.
//!
//! ```text
//!  request(q1) ──▶ gen 1 ──▶ spawn ──┐
//!  request(q2) ──▶ cancel gen 1      │ Completion { generation, result }
//!              ──▶ gen 2 ──▶ spawn ──┤
//!                                    ▼
//!  poll() ── commits gen 2, drops gen 1
//! ```

mod debounce;

pub use debounce::Debouncer;

use std::sync::Arc;
use std::time::SystemTime;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::data::Monitor;
use crate::source::{FetchError, MonitorQuery, MonitorSource};

/// What the views know about the monitor list.
#[derive(Debug, Clone, Default)]
pub struct FetchState {
    /// Last successfully fetched list; kept across failures.
    pub monitors: Vec<Monitor>,
    /// Message of the last failure, cleared on the next success.
    pub error: Option<String>,
    /// True while a request is outstanding.
    pub loading: bool,
    pub last_updated: Option<SystemTime>,
}

#[derive(Debug)]
struct Completion {
    generation: u64,
    result: Result<Vec<Monitor>, FetchError>,
}

/// Issues monitor requests and commits only the latest result.
#[derive(Debug)]
pub struct Fetcher {
    source: Arc<dyn MonitorSource>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    generation: u64,
    in_flight: Option<CancellationToken>,
    lifetime: CancellationToken,
    state: FetchState,
}

impl Fetcher {
    pub fn new(source: Arc<dyn MonitorSource>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            runtime,
            tx,
            rx,
            generation: 0,
            in_flight: None,
            lifetime: CancellationToken::new(),
            state: FetchState::default(),
        }
    }

    /// Start a request, superseding any request still in flight.
    ///
    /// Returns the generation assigned to the new request.
    pub fn request(&mut self, query: MonitorQuery, reason: &str) -> u64 {
        if self.lifetime.is_cancelled() {
            return self.generation;
        }

        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        self.generation += 1;
        let generation = self.generation;
        let token = self.lifetime.child_token();
        self.in_flight = Some(token.clone());
        self.state.loading = true;

        tracing::debug!(generation, reason, name = %query.name, tags = %query.tags, "fetch started");

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => Err(FetchError::Cancelled),
                result = source.fetch(&query) => result,
            };
            // The receiver is gone once the fetcher is dropped
            let _ = tx.send(Completion { generation, result });
        });

        generation
    }

    /// Drain finished requests without blocking.
    ///
    /// Returns true when the committed state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        while let Ok(completion) = self.rx.try_recv() {
            if completion.generation != self.generation {
                tracing::debug!(
                    generation = completion.generation,
                    current = self.generation,
                    "discarding superseded fetch"
                );
                continue;
            }

            self.in_flight = None;
            self.state.loading = false;

            match completion.result {
                Ok(monitors) => {
                    tracing::debug!(
                        generation = completion.generation,
                        count = monitors.len(),
                        "fetch committed"
                    );
                    self.state.monitors = monitors;
                    self.state.error = None;
                    self.state.last_updated = Some(SystemTime::now());
                }
                Err(FetchError::Cancelled) => {
                    tracing::debug!(generation = completion.generation, "fetch cancelled");
                }
                Err(e) => {
                    tracing::warn!(generation = completion.generation, "fetch failed: {}", e);
                    self.state.error = Some(e.to_string());
                }
            }
            changed = true;
        }

        changed
    }

    /// Cancel everything. Results arriving afterwards are ignored.
    pub fn shutdown(&mut self) {
        self.lifetime.cancel();
        self.in_flight = None;
        self.generation += 1;
        self.state.loading = false;
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn description(&self) -> &str {
        self.source.description()
    }
}

impl Drop for Fetcher {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
