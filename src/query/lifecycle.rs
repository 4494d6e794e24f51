//! Request lifecycle
//!
//! Owns the single `RequestState` and the generation counter:
//!
//! ```text
//! Idle ──submit──▶ Loading ──completion──▶ Success | Error
//!   ▲                 │                         │
//!   └────abandon──────┘◀────────submit──────────┘
//! ```
//!
//! Each accepted submit spawns exactly one outbound call on the tokio runtime.
//! The call reports back over a channel tagged with the generation it was
//! issued under; a completion whose generation is not the current one is
//! dropped, so the visible state always belongs to the most recently issued
//! submit. In-flight requests are never cancelled, only ignored.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::query::classify::{judge, QueryFailure};
use crate::query::model::{BackendResponse, QueryRequest, QueryResult};
use crate::query::transport_types::{QueryTransport, TransportError};

/// Current phase of a submission
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(QueryResult),
    Error(QueryFailure),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    /// Short name for logs and the status line
    pub fn name(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Loading => "loading",
            RequestState::Success(_) => "success",
            RequestState::Error(_) => "error",
        }
    }
}

/// Resolved outbound call, tagged with the generation that issued it
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub generation: u64,
    pub outcome: Result<QueryResult, QueryFailure>,
}

/// Callback notified after every applied transition
pub type StateObserver = Box<dyn FnMut(&RequestState) + Send>;

/// Request lifecycle manager
pub struct RequestLifecycle {
    transport: Arc<dyn QueryTransport>,
    runtime: Handle,
    max_rows: Option<u32>,
    state: RequestState,
    generation: u64,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    observers: Vec<StateObserver>,
}

impl RequestLifecycle {
    /// Create an idle lifecycle that spawns its calls on `runtime`
    pub fn new(transport: Arc<dyn QueryTransport>, runtime: Handle) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            transport,
            runtime,
            max_rows: None,
            state: RequestState::Idle,
            generation: 0,
            completions_tx,
            completions_rx,
            observers: Vec::new(),
        }
    }

    /// Forward a row cap with every request
    pub fn with_max_rows(mut self, max_rows: Option<u32>) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Generation of the most recently issued submit (0 before the first)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Register an observer; it sees every later transition
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&RequestState) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Submit a query
    ///
    /// Inert (returns `None`, no state change, no call) when the trimmed
    /// query is empty or a request is already loading. Otherwise enters
    /// `Loading`, issues one call with the trimmed text and returns the new
    /// generation.
    pub fn submit(&mut self, query: &str) -> Option<u64> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            debug!("ignoring empty query");
            return None;
        }
        if self.is_loading() {
            debug!(generation = self.generation, "ignoring submit while loading");
            return None;
        }

        self.generation += 1;
        let generation = self.generation;
        self.transition(RequestState::Loading);

        let request = QueryRequest::new(trimmed, self.max_rows);
        let transport = Arc::clone(&self.transport);
        let tx = self.completions_tx.clone();
        info!(generation, query = %request.query, "submitting query");

        let call = self
            .runtime
            .spawn(async move { execute(transport.as_ref(), &request).await });

        // Every accepted submit reports back, even when the call task dies
        self.runtime.spawn(async move {
            let outcome = match call.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!(generation, error = %err, "query task ended without a result");
                    Err(QueryFailure::transport(&TransportError::Network(format!(
                        "query task failed: {}",
                        err
                    ))))
                }
            };
            // The receiver lives in the lifecycle; if it is gone nobody is listening
            let _ = tx.send(Completion {
                generation,
                outcome,
            });
        });

        Some(generation)
    }

    /// Stop waiting for the in-flight request
    ///
    /// From `Loading` returns to `Idle` and advances the generation so the
    /// pending completion is discarded when it arrives. No-op otherwise.
    pub fn abandon(&mut self) -> bool {
        if !self.is_loading() {
            return false;
        }
        info!(generation = self.generation, "abandoning in-flight query");
        self.generation += 1;
        self.transition(RequestState::Idle);
        true
    }

    /// Apply one completion; returns false when it was stale and dropped
    pub fn apply(&mut self, completion: Completion) -> bool {
        if completion.generation != self.generation || !self.is_loading() {
            debug!(
                stale = completion.generation,
                current = self.generation,
                "discarding stale completion"
            );
            return false;
        }

        let next = match completion.outcome {
            Ok(result) => {
                info!(
                    generation = completion.generation,
                    rows = result.rows().len(),
                    "query succeeded"
                );
                RequestState::Success(result)
            }
            Err(failure) => {
                info!(
                    generation = completion.generation,
                    kind = ?failure.kind,
                    "query failed"
                );
                RequestState::Error(failure)
            }
        };
        self.transition(next);
        true
    }

    /// Apply every completion that has already arrived, without blocking
    ///
    /// Returns the number of transitions applied.
    pub fn process_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next completion and apply it
    pub async fn next_event(&mut self) -> bool {
        match self.completions_rx.recv().await {
            Some(completion) => self.apply(completion),
            None => false,
        }
    }

    /// Wait until the current submission has resolved
    pub async fn settle(&mut self) {
        while self.is_loading() {
            self.next_event().await;
        }
    }

    fn transition(&mut self, next: RequestState) {
        debug!(from = self.state.name(), to = next.name(), "state transition");
        self.state = next;
        for observer in &mut self.observers {
            observer(&self.state);
        }
    }
}

impl std::fmt::Debug for RequestLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLifecycle")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("max_rows", &self.max_rows)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Perform one outbound call and classify its outcome
pub async fn execute(
    transport: &dyn QueryTransport,
    request: &QueryRequest,
) -> Result<QueryResult, QueryFailure> {
    let reply = transport.post_query(request).await.map_err(|err| {
        warn!(error = %err, "query transport failed");
        QueryFailure::transport(&err)
    })?;

    let response = BackendResponse::parse(reply.status, &reply.body).map_err(|err| {
        warn!(status = reply.status, error = %err, "unusable query response");
        QueryFailure::transport(&err)
    })?;

    judge(response)
}
