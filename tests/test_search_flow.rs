//! End-to-end behaviour of the search orchestrator against fake geocoders

mod common;

use common::{place, GatedGeocoder, ScriptedGeocoder};
use geo_pin::core::{Coordinate, GeoError, SearchPhase};
use geo_pin::services::{EventOutcome, OrchestratorSettings, SearchOrchestrator};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;

fn settings(debounce_ms: u64) -> OrchestratorSettings {
    OrchestratorSettings {
        debounce: Duration::from_millis(debounce_ms),
        ..OrchestratorSettings::default()
    }
}

fn default_position() -> Coordinate {
    Coordinate::new(-8.664, -36.006)
}

#[tokio::test]
async fn test_paris_scenario() {
    let geocoder = Arc::new(
        ScriptedGeocoder::new().answer("Paris", vec![place("Paris, France", 48.8566, 2.3522)]).answer(
            "Paris, France",
            vec![place("Paris, France", 48.8566, 2.3522)],
        ),
    );
    let mut orchestrator = SearchOrchestrator::new(geocoder.clone(), settings(0), Handle::current());

    orchestrator.on_query_changed("Paris", Instant::now());
    assert_eq!(
        orchestrator.next_event().await,
        Some(EventOutcome::SuggestionsUpdated)
    );
    assert_eq!(orchestrator.suggestions(), ["Paris, France".to_string()]);
    assert_eq!(orchestrator.phase(), SearchPhase::Suggesting);

    assert!(orchestrator.select_index(0));
    assert_eq!(orchestrator.query(), "Paris, France");
    assert!(orchestrator.suggestions().is_empty());
    assert_eq!(orchestrator.phase(), SearchPhase::Selected);

    assert_eq!(orchestrator.next_event().await, Some(EventOutcome::MarkerMoved));
    let markers = orchestrator.markers().current();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].position, Coordinate::new(48.8566, 2.3522));
    assert_eq!(markers[0].id, "marker1");
    assert!(orchestrator.suggestions().is_empty());
    assert_eq!(orchestrator.phase(), SearchPhase::Idle);

    assert_eq!(geocoder.calls(), vec!["Paris", "Paris, France"]);
}

#[tokio::test]
async fn test_suggestions_follow_response_order() {
    let geocoder = Arc::new(ScriptedGeocoder::new().answer(
        "Spring",
        vec![
            place("Springfield, IL, United States", 39.78, -89.65),
            place("Springfield, MA, United States", 42.10, -72.59),
            place("Spring, TX, United States", 30.08, -95.42),
        ],
    ));
    let mut orchestrator = SearchOrchestrator::new(geocoder, settings(0), Handle::current());

    orchestrator.on_query_changed("Spring", Instant::now());
    orchestrator.next_event().await;

    assert_eq!(
        orchestrator.suggestions(),
        [
            "Springfield, IL, United States".to_string(),
            "Springfield, MA, United States".to_string(),
            "Spring, TX, United States".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_zero_results_clear_suggestions_and_keep_marker() {
    let geocoder = Arc::new(
        ScriptedGeocoder::new().answer("Par", vec![place("Paraguay", -23.44, -58.44)]),
    );
    let mut orchestrator = SearchOrchestrator::new(geocoder, settings(0), Handle::current());

    orchestrator.on_query_changed("Par", Instant::now());
    orchestrator.next_event().await;
    assert_eq!(orchestrator.suggestions().len(), 1);

    orchestrator.on_query_changed("Parxq", Instant::now());
    assert_eq!(
        orchestrator.next_event().await,
        Some(EventOutcome::SuggestionsUpdated)
    );
    assert!(orchestrator.suggestions().is_empty());
    assert_eq!(orchestrator.phase(), SearchPhase::Idle);
    assert_eq!(orchestrator.markers().primary().position, default_position());
}

#[tokio::test]
async fn test_network_error_clears_suggestions_and_keeps_marker() {
    let geocoder = Arc::new(
        ScriptedGeocoder::new()
            .answer("Lon", vec![place("London, United Kingdom", 51.50, -0.12)])
            .fail("Lond", GeoError::Network("HTTP 503".to_string())),
    );
    let mut orchestrator = SearchOrchestrator::new(geocoder, settings(0), Handle::current());

    orchestrator.on_query_changed("Lon", Instant::now());
    orchestrator.next_event().await;
    assert!(!orchestrator.suggestions().is_empty());

    orchestrator.on_query_changed("Lond", Instant::now());
    orchestrator.next_event().await;
    assert!(orchestrator.suggestions().is_empty());
    assert_eq!(orchestrator.markers().primary().position, default_position());
    assert_eq!(orchestrator.markers().revision(), 0);
}

#[tokio::test]
async fn test_unresolvable_selection_keeps_marker() {
    // the suggestion itself resolves to nothing
    let geocoder = Arc::new(
        ScriptedGeocoder::new().answer("Atlan", vec![place("Atlantis", 0.0, 0.0)]),
    );
    let mut orchestrator = SearchOrchestrator::new(geocoder, settings(0), Handle::current());

    orchestrator.on_query_changed("Atlan", Instant::now());
    orchestrator.next_event().await;
    orchestrator.select_suggestion("Atlantis");

    assert_eq!(
        orchestrator.next_event().await,
        Some(EventOutcome::MarkerUnchanged)
    );
    assert_eq!(orchestrator.markers().primary().position, default_position());
    assert_eq!(orchestrator.query(), "Atlantis");
    assert_eq!(orchestrator.phase(), SearchPhase::Idle);
}

#[tokio::test]
async fn test_network_error_on_selection_keeps_marker() {
    let geocoder = Arc::new(
        ScriptedGeocoder::new()
            .answer("Ber", vec![place("Berlin, Germany", 52.52, 13.40)])
            .fail("Berlin, Germany", GeoError::Network("HTTP 503".to_string())),
    );
    let mut orchestrator = SearchOrchestrator::new(geocoder.clone(), settings(0), Handle::current());

    orchestrator.on_query_changed("Ber", Instant::now());
    orchestrator.next_event().await;
    assert!(orchestrator.select_index(0));

    assert_eq!(
        orchestrator.next_event().await,
        Some(EventOutcome::MarkerUnchanged)
    );
    assert_eq!(orchestrator.phase(), SearchPhase::Idle);
    assert_eq!(orchestrator.query(), "Berlin, Germany");
    assert_eq!(orchestrator.markers().primary().position, default_position());
    assert_eq!(orchestrator.markers().revision(), 0);
    assert_eq!(geocoder.calls(), vec!["Ber", "Berlin, Germany"]);
}

#[tokio::test]
async fn test_slow_older_response_is_dropped() {
    let geocoder = Arc::new(GatedGeocoder::new());
    let slow = geocoder.gate("Par");
    let fast = geocoder.gate("Paris");
    let mut orchestrator = SearchOrchestrator::new(geocoder.clone(), settings(0), Handle::current());

    orchestrator.on_query_changed("Par", Instant::now());
    orchestrator.on_query_changed("Paris", Instant::now());

    fast.send(vec![place("Paris, France", 48.8566, 2.3522)]).unwrap();
    assert_eq!(
        orchestrator.next_event().await,
        Some(EventOutcome::SuggestionsUpdated)
    );

    slow.send(vec![place("Paraguay", -23.44, -58.44)]).unwrap();
    assert_eq!(orchestrator.next_event().await, Some(EventOutcome::Stale));

    assert_eq!(orchestrator.suggestions(), ["Paris, France".to_string()]);
}

#[tokio::test]
async fn test_late_search_does_not_reopen_list_after_selection() {
    let geocoder = Arc::new(GatedGeocoder::new());
    let first = geocoder.gate("Ber");
    let pending = geocoder.gate("Berl");
    let resolve = geocoder.gate("Berlin, Germany");
    let mut orchestrator = SearchOrchestrator::new(geocoder.clone(), settings(0), Handle::current());

    orchestrator.on_query_changed("Ber", Instant::now());
    first
        .send(vec![place("Berlin, Germany", 52.52, 13.40)])
        .unwrap();
    orchestrator.next_event().await;

    orchestrator.on_query_changed("Berl", Instant::now());
    orchestrator.select_index(0);

    pending
        .send(vec![place("Berlin, Germany", 52.52, 13.40)])
        .unwrap();
    assert_eq!(orchestrator.next_event().await, Some(EventOutcome::Stale));
    assert!(orchestrator.suggestions().is_empty());

    resolve
        .send(vec![place("Berlin, Germany", 52.52, 13.40)])
        .unwrap();
    assert_eq!(orchestrator.next_event().await, Some(EventOutcome::MarkerMoved));
    assert_eq!(
        orchestrator.markers().primary().position,
        Coordinate::new(52.52, 13.40)
    );
}

#[tokio::test]
async fn test_newer_selection_wins() {
    let geocoder = Arc::new(GatedGeocoder::new());
    let rome = geocoder.gate("Rome, Italy");
    let oslo = geocoder.gate("Oslo, Norway");
    let mut orchestrator = SearchOrchestrator::new(geocoder.clone(), settings(0), Handle::current());

    orchestrator.select_suggestion("Rome, Italy");
    orchestrator.select_suggestion("Oslo, Norway");

    oslo.send(vec![place("Oslo, Norway", 59.91, 10.75)]).unwrap();
    assert_eq!(orchestrator.next_event().await, Some(EventOutcome::MarkerMoved));

    rome.send(vec![place("Rome, Italy", 41.90, 12.50)]).unwrap();
    assert_eq!(orchestrator.next_event().await, Some(EventOutcome::Stale));

    assert_eq!(
        orchestrator.markers().primary().position,
        Coordinate::new(59.91, 10.75)
    );
}

#[tokio::test]
async fn test_keystroke_burst_is_coalesced() {
    let geocoder = Arc::new(
        ScriptedGeocoder::new().answer("Lisbon", vec![place("Lisbon, Portugal", 38.72, -9.14)]),
    );
    let mut orchestrator = SearchOrchestrator::new(geocoder.clone(), settings(300), Handle::current());

    let start = Instant::now();
    for (i, text) in ["L", "Li", "Lis", "Lisb", "Lisbo", "Lisbon"].iter().enumerate() {
        let at = start + Duration::from_millis(50 * i as u64);
        orchestrator.on_query_changed(text, at);
        assert!(!orchestrator.tick(at));
    }
    assert!(orchestrator.is_search_pending());

    // 300ms after the last keystroke (at 250ms)
    assert!(!orchestrator.tick(start + Duration::from_millis(500)));
    assert!(orchestrator.tick(start + Duration::from_millis(550)));
    assert!(!orchestrator.tick(start + Duration::from_millis(900)));

    orchestrator.next_event().await;
    assert_eq!(geocoder.calls(), vec!["Lisbon"]);
    assert_eq!(orchestrator.suggestions(), ["Lisbon, Portugal".to_string()]);
}

#[tokio::test]
async fn test_whitespace_query_issues_no_request() {
    let geocoder = Arc::new(ScriptedGeocoder::new());
    let mut orchestrator = SearchOrchestrator::new(geocoder.clone(), settings(0), Handle::current());

    orchestrator.on_query_changed("  ", Instant::now());
    orchestrator.on_query_changed("", Instant::now());
    tokio::task::yield_now().await;

    assert!(orchestrator.pump().is_empty());
    assert!(geocoder.calls().is_empty());
    assert_eq!(orchestrator.phase(), SearchPhase::Idle);
}

#[tokio::test]
async fn test_clearing_query_drops_in_flight_search() {
    let geocoder = Arc::new(GatedGeocoder::new());
    let gate = geocoder.gate("Madrid");
    let mut orchestrator = SearchOrchestrator::new(geocoder.clone(), settings(0), Handle::current());

    orchestrator.on_query_changed("Madrid", Instant::now());
    orchestrator.clear_query();

    gate.send(vec![place("Madrid, Spain", 40.41, -3.70)]).unwrap();
    assert_eq!(orchestrator.next_event().await, Some(EventOutcome::Stale));
    assert!(orchestrator.suggestions().is_empty());
    assert_eq!(orchestrator.phase(), SearchPhase::Idle);
}
