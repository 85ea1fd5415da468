//! Tests for the exposure tracker.

use super::*;
use crate::model::{CardKind, FeedEntry, ImageSource, LayoutSpan};
use crate::state::item_store::ItemStore;

// ===== Test Helpers =====

fn id(raw: &str) -> ItemId {
    ItemId::new(raw).expect("valid id")
}

fn store_with(ids: &[&str]) -> ItemStore {
    let mut store = ItemStore::new();
    store.append(
        ids.iter()
            .map(|raw| {
                FeedEntry::new(
                    id(raw),
                    CardKind::Text,
                    LayoutSpan::Single,
                    *raw,
                    "",
                    ImageSource::None,
                )
            })
            .collect(),
    );
    store
}

fn sample(raw: &str, position: usize, ratio: f32) -> ViewportSample {
    ViewportSample::new(id(raw), position, ratio)
}

fn at(millis: u64) -> Timestamp {
    Timestamp::from_millis(millis)
}

fn exposed(raw: &str, position: usize, ratio: f32) -> ExposureEvent {
    ExposureEvent::Exposed {
        id: id(raw),
        position,
        ratio,
    }
}

fn full(raw: &str, position: usize) -> ExposureEvent {
    ExposureEvent::FullyVisible {
        id: id(raw),
        position,
    }
}

fn hidden(raw: &str, position: usize, last_ratio: f32, total: u64) -> ExposureEvent {
    ExposureEvent::Hidden {
        id: id(raw),
        position,
        last_ratio,
        total_visible_ms: total,
    }
}

// ===== Scenarios =====

#[test]
fn fully_visible_on_first_sight_fires_exposed_then_full() {
    let store = store_with(&["A"]);
    let mut tracker = ExposureTracker::new();

    let events = tracker.evaluate(&[sample("A", 0, 1.0)], at(0), &store);
    assert_eq!(events, vec![exposed("A", 0, 1.0), full("A", 0)]);

    let events = tracker.evaluate(&[], at(500), &store);
    assert_eq!(events, vec![hidden("A", 0, 1.0, 500)]);
}

#[test]
fn partial_then_full_then_hidden() {
    let store = store_with(&["A"]);
    let mut tracker = ExposureTracker::new();

    let events = tracker.evaluate(&[sample("A", 0, 0.3)], at(0), &store);
    assert_eq!(events, vec![exposed("A", 0, 0.3)]);

    let events = tracker.evaluate(&[sample("A", 0, 1.0)], at(200), &store);
    assert_eq!(events, vec![full("A", 0)]);

    let events = tracker.evaluate(&[], at(700), &store);
    assert_eq!(events, vec![hidden("A", 0, 1.0, 700)]);
}

#[test]
fn identical_snapshot_twice_emits_nothing_second_time() {
    let store = store_with(&["A", "B"]);
    let mut tracker = ExposureTracker::new();
    let snapshot = vec![sample("A", 0, 1.0), sample("B", 1, 0.4)];

    let first = tracker.evaluate(&snapshot, at(100), &store);
    assert_eq!(first.len(), 3);

    let second = tracker.evaluate(&snapshot, at(100), &store);
    assert!(second.is_empty(), "got {second:?}");
}

#[test]
fn exposed_fires_once_across_visibility_cycles() {
    let store = store_with(&["A"]);
    let mut tracker = ExposureTracker::new();

    tracker.evaluate(&[sample("A", 0, 0.5)], at(0), &store);
    tracker.evaluate(&[], at(100), &store);
    let events = tracker.evaluate(&[sample("A", 0, 0.5)], at(300), &store);

    assert!(events.is_empty(), "re-entering must not re-expose: {events:?}");
    assert!(tracker.state(&id("A")).unwrap().is_visible());
}

#[test]
fn fully_visible_fires_once_despite_flicker() {
    let store = store_with(&["A"]);
    let mut tracker = ExposureTracker::new();

    tracker.evaluate(&[sample("A", 0, 1.0)], at(0), &store);
    tracker.evaluate(&[sample("A", 0, 0.6)], at(10), &store);
    let events = tracker.evaluate(&[sample("A", 0, 1.0)], at(20), &store);

    assert!(events.is_empty());
}

#[test]
fn dwell_time_accumulates_across_periods() {
    let store = store_with(&["A"]);
    let mut tracker = ExposureTracker::new();

    tracker.evaluate(&[sample("A", 0, 0.5)], at(0), &store);
    let first = tracker.evaluate(&[], at(300), &store);
    assert_eq!(first, vec![hidden("A", 0, 0.5, 300)]);

    tracker.evaluate(&[sample("A", 0, 0.8)], at(1_000), &store);
    let second = tracker.evaluate(&[], at(1_250), &store);
    assert_eq!(second, vec![hidden("A", 0, 0.8, 550)]);
}

#[test]
fn dwell_time_is_not_accumulated_while_visible() {
    let store = store_with(&["A"]);
    let mut tracker = ExposureTracker::new();

    tracker.evaluate(&[sample("A", 0, 0.5)], at(0), &store);
    tracker.evaluate(&[sample("A", 0, 0.7)], at(400), &store);

    let state = tracker.state(&id("A")).unwrap();
    assert_eq!(state.total_visible_ms(), 0);
    assert_eq!(state.visible_since(), Some(at(0)));
}

#[test]
fn hidden_reports_last_known_position() {
    let store = store_with(&["A", "B", "C"]);
    let mut tracker = ExposureTracker::new();

    tracker.evaluate(&[sample("C", 2, 0.2)], at(0), &store);
    let events = tracker.evaluate(&[sample("A", 0, 1.0)], at(50), &store);

    assert_eq!(
        events,
        vec![exposed("A", 0, 1.0), full("A", 0), hidden("C", 2, 0.2, 50)]
    );
}

#[test]
fn hidden_events_follow_exposed_events() {
    let store = store_with(&["A", "B", "C", "D"]);
    let mut tracker = ExposureTracker::new();

    tracker.evaluate(&[sample("A", 0, 1.0), sample("B", 1, 1.0)], at(0), &store);
    let events = tracker.evaluate(&[sample("C", 2, 0.5), sample("D", 3, 0.5)], at(10), &store);

    assert_eq!(events.len(), 4);
    assert_eq!(events[0], exposed("C", 2, 0.5));
    assert_eq!(events[1], exposed("D", 3, 0.5));
    assert!(
        events[2..]
            .iter()
            .all(|e| matches!(e, ExposureEvent::Hidden { .. }))
    );
}

#[test]
fn invariant_visible_since_iff_ratio_positive() {
    let store = store_with(&["A"]);
    let mut tracker = ExposureTracker::new();

    tracker.evaluate(&[sample("A", 0, 0.5)], at(0), &store);
    let state = tracker.state(&id("A")).unwrap();
    assert!(state.last_ratio() > 0.0);
    assert!(state.visible_since().is_some());

    tracker.evaluate(&[], at(10), &store);
    let state = tracker.state(&id("A")).unwrap();
    assert_eq!(state.last_ratio(), 0.0);
    assert!(state.visible_since().is_none());
}

// ===== Lenience =====

#[test]
fn ratio_above_one_is_clamped() {
    let store = store_with(&["A"]);
    let mut tracker = ExposureTracker::new();

    let events = tracker.evaluate(&[sample("A", 0, 1.7)], at(0), &store);
    assert_eq!(events, vec![exposed("A", 0, 1.0), full("A", 0)]);
}

#[test]
fn negative_and_nan_ratios_count_as_absent() {
    let store = store_with(&["A", "B"]);
    let mut tracker = ExposureTracker::new();

    let events = tracker.evaluate(
        &[sample("A", 0, -0.5), sample("B", 1, f32::NAN)],
        at(0),
        &store,
    );
    assert!(events.is_empty());
    assert_eq!(tracker.tracked_len(), 0);
}

#[test]
fn zero_ratio_hides_previously_visible_item() {
    let store = store_with(&["A"]);
    let mut tracker = ExposureTracker::new();

    tracker.evaluate(&[sample("A", 0, 0.5)], at(0), &store);
    let events = tracker.evaluate(&[sample("A", 0, 0.0)], at(90), &store);

    assert_eq!(events, vec![hidden("A", 0, 0.5, 90)]);
}

#[test]
fn duplicate_id_in_snapshot_keeps_first_sample() {
    let store = store_with(&["A"]);
    let mut tracker = ExposureTracker::new();

    let events = tracker.evaluate(&[sample("A", 0, 0.4), sample("A", 0, 1.0)], at(0), &store);

    assert_eq!(events, vec![exposed("A", 0, 0.4)]);
    assert_eq!(tracker.state(&id("A")).unwrap().last_ratio(), 0.4);
}

#[test]
fn sample_for_footer_position_is_skipped() {
    let store = store_with(&["A"]);
    let mut tracker = ExposureTracker::new();

    // Position 1 is where the footer would sit.
    let events = tracker.evaluate(&[sample("footer", 1, 1.0)], at(0), &store);
    assert!(events.is_empty());
    assert_eq!(tracker.tracked_len(), 0);
}

#[test]
fn sample_with_mismatched_id_is_skipped() {
    let store = store_with(&["A", "B"]);
    let mut tracker = ExposureTracker::new();

    let events = tracker.evaluate(&[sample("B", 0, 1.0)], at(0), &store);
    assert!(events.is_empty());
}

#[test]
fn removed_item_is_hidden_on_next_pass() {
    let mut store = store_with(&["A", "B"]);
    let mut tracker = ExposureTracker::new();

    tracker.evaluate(&[sample("A", 0, 1.0), sample("B", 1, 1.0)], at(0), &store);
    store.remove_at(0);

    // The stale sample for A no longer matches the store and is dropped.
    let events = tracker.evaluate(&[sample("A", 0, 1.0), sample("B", 0, 1.0)], at(40), &store);

    assert_eq!(events, vec![hidden("A", 0, 1.0, 40)]);
    assert_eq!(tracker.state(&id("B")).unwrap().last_position(), 0);
}

// ===== Reset =====

#[test]
fn reset_discards_state_so_ids_expose_again() {
    let store = store_with(&["A"]);
    let mut tracker = ExposureTracker::new();

    tracker.evaluate(&[sample("A", 0, 1.0)], at(0), &store);
    tracker.reset();
    assert_eq!(tracker.tracked_len(), 0);

    let events = tracker.evaluate(&[sample("A", 0, 1.0)], at(10), &store);
    assert_eq!(events, vec![exposed("A", 0, 1.0), full("A", 0)]);
}

#[test]
fn visible_len_counts_only_visible_states() {
    let store = store_with(&["A", "B"]);
    let mut tracker = ExposureTracker::new();

    tracker.evaluate(&[sample("A", 0, 1.0), sample("B", 1, 1.0)], at(0), &store);
    tracker.evaluate(&[sample("B", 1, 1.0)], at(5), &store);

    assert_eq!(tracker.tracked_len(), 2);
    assert_eq!(tracker.visible_len(), 1);
}
