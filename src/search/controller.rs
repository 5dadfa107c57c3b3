//! Debounced search-as-you-type controller.
//!
//! The controller owns the [`SearchState`] and is driven from a single UI
//! thread. Keystrokes update the query immediately and (re)arm a trailing
//! debounce timer; when it fires a request is dispatched. Timers and requests
//! run as tokio tasks that report back over a channel; the owner applies those
//! events with [`SearchController::pump`] (non-blocking, once per UI tick) or
//! [`SearchController::process_next`] (awaiting).
//!
//! Ordering: every dispatch is stamped with a sequence number and carries a
//! [`CancellationToken`]. A newer dispatch, a reset, or dropping the
//! controller cancels the older request; a response that still arrives with a
//! stale stamp is discarded. The state therefore always reflects the most
//! recently *issued* query, regardless of completion order.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::state::{SearchState, SearchStatus};
use crate::api::{ApiError, ContentSource};
use crate::model::types::ContentItem;

pub const DEBOUNCE: Duration = Duration::from_millis(300);
/// Queries shorter than this (in characters) are never sent.
pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_RESULTS: usize = 5;

const ERROR_PREFIX: &str = "An error occurred while searching";

#[derive(Debug)]
pub enum ControllerEvent {
    DebounceElapsed {
        generation: u64,
        query: String,
    },
    Resolved {
        seq: u64,
        query: String,
        outcome: Result<Vec<ContentItem>, ApiError>,
    },
}

pub struct SearchController<C: ContentSource> {
    source: Arc<C>,
    state: SearchState,
    debounce: Duration,
    max_results: usize,
    tx: mpsc::UnboundedSender<ControllerEvent>,
    rx: mpsc::UnboundedReceiver<ControllerEvent>,
    debounce_generation: u64,
    pending_debounce: Option<CancellationToken>,
    issued_seq: u64,
    in_flight: Option<CancellationToken>,
}

impl<C: ContentSource> SearchController<C> {
    pub fn new(source: Arc<C>) -> Self {
        Self::with_settings(source, DEBOUNCE, MAX_RESULTS)
    }

    pub fn with_settings(source: Arc<C>, debounce: Duration, max_results: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            state: SearchState::default(),
            debounce,
            max_results: max_results.clamp(1, MAX_RESULTS),
            tx,
            rx,
            debounce_generation: 0,
            pending_debounce: None,
            issued_seq: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// True while a debounce timer is armed or a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.pending_debounce.is_some() || self.in_flight.is_some()
    }

    /// Record a keystroke and (re)schedule the trailing dispatch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_input_change(&mut self, text: impl Into<String>) {
        let query = text.into();
        self.state.query = query.clone();

        self.cancel_debounce();
        self.debounce_generation += 1;
        let generation = self.debounce_generation;
        let token = CancellationToken::new();
        self.pending_debounce = Some(token.clone());

        let tx = self.tx.clone();
        let delay = self.debounce;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(ControllerEvent::DebounceElapsed { generation, query });
                }
            }
        });
    }

    /// Dispatch `query` now, bypassing the debounce. The query is recorded in
    /// the state so one-shot callers see the same view as the dialog.
    ///
    /// Short queries reset to `Idle` without touching the network. Anything
    /// else moves to `Loading` (keeping the previous results on screen) and
    /// supersedes whatever request was outstanding.
    pub fn fetch_results(&mut self, query: String) {
        self.supersede_in_flight();
        self.state.query.clone_from(&query);

        if query.chars().count() < MIN_QUERY_CHARS {
            self.state.results.clear();
            self.state.error_message = None;
            self.state.status = SearchStatus::Idle;
            return;
        }

        self.state.status = SearchStatus::Loading;
        let seq = self.issued_seq;
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        debug!(seq, query = %query, "search_dispatch");
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let per_page = self.max_results;
        tokio::spawn(async move {
            let request = query.clone();
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(seq, query = %request, "search request cancelled");
                }
                outcome = source.search_posts(&request, per_page) => {
                    let _ = tx.send(ControllerEvent::Resolved { seq, query, outcome });
                }
            }
        });
    }

    /// Apply one event to the state.
    pub fn handle(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::DebounceElapsed { generation, query } => {
                if generation != self.debounce_generation {
                    return;
                }
                self.pending_debounce = None;
                self.fetch_results(query);
            }
            ControllerEvent::Resolved {
                seq,
                query,
                outcome,
            } => {
                if seq != self.issued_seq || self.in_flight.is_none() {
                    debug!(seq, latest = self.issued_seq, query = %query, "discarding stale search response");
                    return;
                }
                self.in_flight = None;
                match outcome {
                    Ok(mut items) => {
                        items.truncate(self.max_results);
                        debug!(seq, query = %query, hits = items.len(), "search_applied");
                        self.state.results = items;
                        self.state.status = SearchStatus::Success;
                        self.state.error_message = None;
                        self.state.is_open = true;
                    }
                    Err(err) => {
                        warn!(query = %query, error = %err, "search error");
                        self.state.status = SearchStatus::Error;
                        self.state.results.clear();
                        self.state.error_message = Some(format!("{ERROR_PREFIX}: {err}"));
                    }
                }
            }
        }
    }

    /// Apply every event already delivered. Returns true if any was applied.
    pub fn pump(&mut self) -> bool {
        let mut applied = false;
        while let Ok(event) = self.rx.try_recv() {
            self.handle(event);
            applied = true;
        }
        applied
    }

    /// Wait for the next event and apply it.
    pub async fn process_next(&mut self) {
        if let Some(event) = self.rx.recv().await {
            self.handle(event);
        }
    }

    /// Back to the initial state: timer cleared, outstanding request aborted.
    /// `is_open` survives; it records that a search has succeeded this session.
    pub fn reset(&mut self) {
        self.cancel_debounce();
        self.debounce_generation += 1;
        self.supersede_in_flight();
        self.state = SearchState {
            is_open: self.state.is_open,
            ..SearchState::default()
        };
    }

    fn cancel_debounce(&mut self) {
        if let Some(token) = self.pending_debounce.take() {
            token.cancel();
        }
    }

    fn supersede_in_flight(&mut self) {
        self.issued_seq += 1;
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}

impl<C: ContentSource> Drop for SearchController<C> {
    fn drop(&mut self) {
        self.cancel_debounce();
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}
