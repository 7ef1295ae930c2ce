//! View state machine and stale-fetch guarding
//!
//! Every view starts in `Loading` and moves once to `Ready` or `Failed`.
//! Starting a new fetch re-enters `Loading` and supersedes the previous one:
//! the controller bumps a generation counter on a `watch` channel, and a
//! result is only applied if its ticket still carries the current generation.

use std::future::Future;

use tokio::sync::watch;

/// What a view is showing
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Failed(ViewError),
}

/// Why a view failed to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The requested document does not exist
    NotFound,
    /// The fetch failed; carries the message shown to the visitor
    Fetch(String),
}

impl ViewError {
    /// Message shown on the failure page
    pub fn message(&self) -> &str {
        match self {
            ViewError::NotFound => "The post you're looking for doesn't exist.",
            ViewError::Fetch(message) => message,
        }
    }
}

/// Owns a view's state and the generation of its active fetch
#[derive(Debug)]
pub struct ViewController<T> {
    state: ViewState<T>,
    generation: watch::Sender<u64>,
}

impl<T> ViewController<T> {
    pub fn new() -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            state: ViewState::Loading,
            generation,
        }
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// Start a fetch: enter `Loading` and invalidate any earlier ticket
    pub fn begin(&mut self) -> FetchTicket {
        self.generation.send_modify(|g| *g += 1);
        self.state = ViewState::Loading;
        FetchTicket {
            generation: *self.generation.borrow(),
            watch: self.generation.subscribe(),
        }
    }

    /// Apply a fetch outcome.
    ///
    /// Returns `false` and leaves the state untouched when the ticket was
    /// superseded, or when the view already left `Loading`.
    pub fn resolve(&mut self, ticket: &FetchTicket, outcome: Result<T, ViewError>) -> bool {
        if ticket.generation != *self.generation.borrow() {
            tracing::debug!(
                "Discarding stale fetch result (generation {}, current {})",
                ticket.generation,
                *self.generation.borrow()
            );
            return false;
        }
        if !matches!(self.state, ViewState::Loading) {
            tracing::debug!("View already settled, ignoring duplicate result");
            return false;
        }

        self.state = match outcome {
            Ok(value) => ViewState::Ready(value),
            Err(e) => ViewState::Failed(e),
        };
        true
    }
}

impl<T> Default for ViewController<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for one in-flight fetch
#[derive(Debug)]
pub struct FetchTicket {
    generation: u64,
    watch: watch::Receiver<u64>,
}

impl FetchTicket {
    /// Whether this ticket is still the controller's active fetch
    #[cfg(test)]
    fn is_current(&self) -> bool {
        self.watch.has_changed().is_ok() && *self.watch.borrow() == self.generation
    }

    /// Completes once the ticket is superseded or its controller is dropped
    pub async fn superseded(&mut self) {
        loop {
            if *self.watch.borrow_and_update() != self.generation {
                return;
            }
            if self.watch.changed().await.is_err() {
                return;
            }
        }
    }

    /// Drive `fetch` unless the ticket is superseded first.
    ///
    /// Returns `None` when the fetch was abandoned; the fetch future is
    /// dropped at that point.
    pub async fn run<F: Future>(&mut self, fetch: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.superseded() => None,
            output = fetch => Some(output),
        }
    }
}
