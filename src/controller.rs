use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::data_models::{Query, SearchResponse};
use crate::search_client::{SearchBackend, SearchError};

/// Lifecycle state of the current submission. `Ready` and `Failed` are
/// terminal per request; the controller accepts a new submission from any
/// state.
#[derive(Debug)]
pub enum SearchState {
    Idle,
    Loading,
    Ready(SearchResponse),
    Failed(SearchError),
}

/// One resolved search, tagged with the sequence number of the submission
/// it belongs to.
#[derive(Debug)]
pub struct OutcomeEnvelope {
    pub seq: u64,
    pub outcome: Result<SearchResponse, SearchError>,
}

/// The search-request state machine. Owns all lifecycle state: the current
/// `SearchState`, the submission sequence counter, and the cancellation
/// token of the in-flight request. Resolved outcomes come back over the
/// channel returned by `new`; the event loop feeds them into `apply`.
pub struct SearchController {
    backend: Arc<dyn SearchBackend>,
    timeout: Duration,
    state: SearchState,
    seq: u64,
    inflight: Option<CancellationToken>,
    outcome_tx: mpsc::UnboundedSender<OutcomeEnvelope>,
}

impl SearchController {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        timeout: Duration,
    ) -> (SearchController, mpsc::UnboundedReceiver<OutcomeEnvelope>) {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        (
            SearchController {
                backend,
                timeout,
                state: SearchState::Idle,
                seq: 0,
                inflight: None,
                outcome_tx,
            },
            outcome_rx,
        )
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Sequence number of the latest submission.
    pub fn current_seq(&self) -> u64 {
        self.seq
    }

    /// Submit a raw input line. Input that trims to empty is a no-op: no
    /// request is issued and the state keeps its current value. Submitting
    /// while a request is in flight is always allowed and supersedes it.
    pub fn submit(&mut self, raw: &str) -> bool {
        let Some(query) = Query::parse(raw) else {
            log::debug!("ignoring blank query");
            return false;
        };

        // Cancel the previous in-flight task before arming a new one.
        // Dropping that future drops its deadline timer with it, so at
        // most one timer is live per controller.
        self.cancel_inflight();

        self.seq += 1;
        self.state = SearchState::Loading;

        let seq = self.seq;
        let token = CancellationToken::new();
        self.inflight = Some(token.clone());

        log::info!("submitting search {seq}: {query}");
        let fut = self.backend.search(query, self.timeout);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => return, // superseded; report nothing
                outcome = fut => outcome,
            };
            // Send fails only when the controller is gone.
            let _ = tx.send(OutcomeEnvelope { seq, outcome });
        });
        true
    }

    /// Apply a resolved outcome. An envelope whose sequence number is not
    /// the latest, or that arrives after the current request already
    /// settled, is dropped: last-submitted-wins, never last-resolved-wins.
    pub fn apply(&mut self, envelope: OutcomeEnvelope) -> bool {
        if envelope.seq != self.seq || !matches!(self.state, SearchState::Loading) {
            log::debug!("dropping stale outcome for search {}", envelope.seq);
            return false;
        }

        self.inflight = None;
        self.state = match envelope.outcome {
            Ok(response) => {
                log::info!(
                    "search {} returned {} results",
                    envelope.seq,
                    response.results.len()
                );
                SearchState::Ready(response)
            }
            Err(err) => {
                log::error!("search {} failed: {err}", envelope.seq);
                SearchState::Failed(err)
            }
        };
        true
    }

    pub fn shutdown(&mut self) {
        self.cancel_inflight();
        self.state = SearchState::Idle;
    }

    fn cancel_inflight(&mut self) {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.cancel_inflight();
    }
}
