//! Search orchestration
//!
//! Turns query edits into geocoding requests and geocoding responses into
//! suggestions and marker moves. The orchestrator is the only writer of the
//! search state and the marker store; network calls run as tokio tasks and
//! report back through a channel, tagged with a sequence number so a slow,
//! superseded response can never overwrite a newer one.

use super::events::{EventOutcome, GeoEvent, GeoEventKind};
use super::location::LocationProvider;
use super::request_sequencer::{RequestKind, RequestSequencer};
use crate::api::Geocoder;
use crate::config::Config;
use crate::core::{Coordinate, GeoError, Marker, MarkerStore, SearchPhase, SearchState};
use crate::utils::debouncer::Debouncer;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn, Level};

/// Constructor-time defaults
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Quiet period before a keystroke turns into a request; zero disables
    pub debounce: Duration,
    /// Pin shown until a location fix or a selection replaces it
    pub default_marker: Marker,
}

impl OrchestratorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: config.search.debounce(),
            default_marker: config.marker.default_marker(),
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Result of the one-shot location lookup at mount
#[derive(Debug, Clone, PartialEq)]
pub enum MountOutcome {
    Located(Coordinate),
    KeptDefault(GeoError),
    AlreadyMounted,
}

pub struct SearchOrchestrator {
    geocoder: Arc<dyn Geocoder>,
    runtime: Handle,
    state: SearchState,
    markers: MarkerStore,
    sequencer: RequestSequencer,
    debouncer: Debouncer,
    events_tx: UnboundedSender<GeoEvent>,
    events_rx: UnboundedReceiver<GeoEvent>,
    mounted: bool,
}

impl SearchOrchestrator {
    pub fn new(geocoder: Arc<dyn Geocoder>, settings: OrchestratorSettings, runtime: Handle) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            geocoder,
            runtime,
            state: SearchState::new(),
            markers: MarkerStore::new(settings.default_marker),
            sequencer: RequestSequencer::new(),
            debouncer: Debouncer::new(settings.debounce),
            events_tx,
            events_rx,
            mounted: false,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn query(&self) -> &str {
        &self.state.query
    }

    pub fn suggestions(&self) -> &[String] {
        &self.state.suggestions
    }

    pub fn phase(&self) -> SearchPhase {
        self.state.phase
    }

    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    /// A keystroke is waiting on the debouncer or a search is in flight
    pub fn is_search_pending(&self) -> bool {
        self.debouncer.is_pending() || self.sequencer.in_flight(RequestKind::Search)
    }

    /// Ask the location provider for the device position, once.
    ///
    /// On success the default marker moves there; any failure leaves it in
    /// place.
    pub async fn mount(&mut self, provider: &dyn LocationProvider) -> MountOutcome {
        if self.mounted {
            debug!(target: "location", "Mount already ran, skipping location request");
            return MountOutcome::AlreadyMounted;
        }
        self.mounted = true;

        match provider.request_current_location().await {
            Ok(position) => {
                let marker = self.markers.primary().moved_to(position);
                self.markers.replace(marker);
                info!(target: "location", "Marker placed at device location {}", position);
                MountOutcome::Located(position)
            }
            Err(err) => {
                info!(
                    target: "location",
                    "Keeping default marker ({}): {}",
                    err.kind(),
                    err
                );
                MountOutcome::KeptDefault(err)
            }
        }
    }

    /// The search box text changed
    pub fn on_query_changed(&mut self, text: &str, now: Instant) {
        self.state.set_query(text);

        if self.state.query_is_blank() {
            self.debouncer.reset();
            self.sequencer.invalidate(RequestKind::Search);
            self.state.clear_suggestions();
            return;
        }

        self.state.phase = SearchPhase::Typing;
        self.debouncer.trigger(now);
        if self.debouncer.is_immediate() {
            self.tick(now);
        }
    }

    /// Issue the debounced search if its quiet period is over.
    /// Returns true when a request went out.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.debouncer.should_execute(now) || self.state.query_is_blank() {
            return false;
        }
        let query = self.state.query.clone();
        self.dispatch_search(query);
        true
    }

    /// Clear the search box and drop anything pending
    pub fn clear_query(&mut self) {
        self.on_query_changed("", Instant::now());
    }

    /// Pick the suggestion at `index`; false when there is none
    pub fn select_index(&mut self, index: usize) -> bool {
        match self.state.suggestion(index).map(str::to_string) {
            Some(suggestion) => {
                self.select_suggestion(&suggestion);
                true
            }
            None => false,
        }
    }

    /// Pick `suggestion`: it becomes the query, the list closes and the
    /// text is resolved to a coordinate.
    pub fn select_suggestion(&mut self, suggestion: &str) {
        info!(target: "search", "Selected suggestion {:?}", suggestion);

        self.state.set_query(suggestion);
        self.state.suggestions.clear();
        self.state.phase = SearchPhase::Selected;

        // late answers to earlier keystrokes must not reopen the list
        self.debouncer.reset();
        self.sequencer.invalidate(RequestKind::Search);

        self.dispatch_resolve(suggestion.to_string());
    }

    fn dispatch_search(&mut self, query: String) {
        let seq = self.sequencer.issue(RequestKind::Search);
        debug!(target: "search", "Search #{} for {:?}", seq, query);

        let geocoder = Arc::clone(&self.geocoder);
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let result = geocoder.search(&query).await;
            let _ = tx.send(GeoEvent {
                seq,
                kind: GeoEventKind::Suggestions { query, result },
            });
        });
    }

    fn dispatch_resolve(&mut self, query: String) {
        let seq = self.sequencer.issue(RequestKind::Resolve);
        debug!(target: "search", "Resolve #{} for {:?}", seq, query);

        let geocoder = Arc::clone(&self.geocoder);
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let result = geocoder.resolve_first(&query).await;
            let _ = tx.send(GeoEvent {
                seq,
                kind: GeoEventKind::Resolved { query, result },
            });
        });
    }

    /// Apply a completed request to session state, unless superseded
    pub fn apply(&mut self, event: GeoEvent) -> EventOutcome {
        let kind = event.request_kind();
        if !self.sequencer.is_current(kind, event.seq) {
            debug!(target: "search", "Dropping stale {:?} response #{}", kind, event.seq);
            return EventOutcome::Stale;
        }
        self.sequencer.complete(kind, event.seq);

        match event.kind {
            GeoEventKind::Suggestions { query, result } => {
                match result {
                    Ok(results) => {
                        if results.is_empty() {
                            info!(target: "search", "No results found for {:?}", query);
                        }
                        let suggestions = results.into_iter().map(|r| r.formatted_address).collect();
                        self.state.show_suggestions(suggestions);
                    }
                    Err(err) => {
                        log_failure(&err, &query);
                        self.state.clear_suggestions();
                    }
                }
                EventOutcome::SuggestionsUpdated
            }
            GeoEventKind::Resolved { query, result } => {
                if self.state.phase == SearchPhase::Selected {
                    self.state.phase = SearchPhase::Idle;
                }

                match result {
                    Ok(found) => {
                        let marker = self.markers.primary().moved_to(found.coordinate());
                        if self.markers.replace(marker) {
                            info!(
                                target: "marker",
                                "Marker moved to {} for {:?}",
                                found.coordinate(),
                                query
                            );
                            EventOutcome::MarkerMoved
                        } else {
                            EventOutcome::MarkerUnchanged
                        }
                    }
                    Err(err) => {
                        log_failure(&err, &query);
                        EventOutcome::MarkerUnchanged
                    }
                }
            }
        }
    }

    /// Apply every response that has already arrived, without waiting
    pub fn pump(&mut self) -> Vec<EventOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            outcomes.push(self.apply(event));
        }
        outcomes
    }

    /// Wait for the next response and apply it
    pub async fn next_event(&mut self) -> Option<EventOutcome> {
        let event = self.events_rx.recv().await?;
        Some(self.apply(event))
    }
}

/// A miss is routine; anything else is worth a warning
fn failure_level(err: &GeoError) -> Level {
    match err {
        GeoError::NotFound { .. } => Level::INFO,
        _ => Level::WARN,
    }
}

fn log_failure(err: &GeoError, query: &str) {
    if failure_level(err) == Level::INFO {
        info!(target: "search", "No results found for {:?}", query);
    } else {
        warn!(
            target: "search",
            "Lookup for {:?} failed ({}): {}",
            query,
            err.kind(),
            err
        );
    }
}
