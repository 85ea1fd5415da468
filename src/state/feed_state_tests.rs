//! Tests for the feed state aggregate.

use super::*;
use crate::model::ItemId;
use crate::source::{MockFeed, MockFeedConfig, PageFetcher};
use crate::state::event_log::EventLog;

// ===== Test Helpers =====

fn at(millis: u64) -> Timestamp {
    Timestamp::from_millis(millis)
}

fn feed() -> FeedState {
    FeedState::new(FeedSettings::default(), EventLog::shared(200))
}

fn mock(total_items: Option<usize>) -> MockFeed {
    MockFeed::new(MockFeedConfig {
        page_size: 10,
        total_items,
        fail_every: None,
    })
}

fn failing() -> MockFeed {
    MockFeed::new(MockFeedConfig {
        fail_every: Some(1),
        ..MockFeedConfig::default()
    })
}

fn run(fetcher: &mut impl PageFetcher, ticket: FetchTicket) -> FetchCompletion {
    FetchCompletion::run(fetcher, ticket)
}

fn sample(state: &FeedState, position: usize, ratio: f32) -> ViewportSample {
    let id = state.store().get(position).expect("entry").id().clone();
    ViewportSample::new(id, position, ratio)
}

// ===== Pagination flow =====

#[test]
fn refresh_with_full_page_populates_store() {
    let mut state = feed();
    let mut source = mock(None);

    let ticket = state.refresh(at(0));
    assert_eq!(state.footer(), FooterStatus::Hidden);

    let effect = state.apply_completion(run(&mut source, ticket), at(10));

    assert_eq!(effect, CompletionEffect::Replaced { inserted: 10 });
    assert_eq!(state.store().len(), 10);
    assert_eq!(state.footer(), FooterStatus::Hidden);
    assert!(state.pagination().has_more());
}

#[test]
fn short_page_ends_feed_and_blocks_load_more() {
    let mut state = feed();
    let mut source = mock(Some(14));

    let t = state.refresh(at(0));
    state.apply_completion(run(&mut source, t), at(1));
    let t = state.load_more(at(2)).expect("fetch issued");
    let effect = state.apply_completion(run(&mut source, t), at(3));

    assert_eq!(effect, CompletionEffect::Appended { inserted: 4 });
    assert_eq!(state.footer(), FooterStatus::NoMore);
    assert!(!state.pagination().has_more());
    assert!(state.load_more(at(4)).is_none());
    assert!(state.load_more(at(5)).is_none());
}

#[test]
fn double_load_more_issues_exactly_one_fetch() {
    let mut state = feed();
    let mut source = mock(None);
    let t = state.refresh(at(0));
    state.apply_completion(run(&mut source, t), at(1));
    let calls_before = source.calls();

    let tickets: Vec<_> = [state.load_more(at(2)), state.load_more(at(3))]
        .into_iter()
        .flatten()
        .collect();
    for ticket in &tickets {
        state.apply_completion(run(&mut source, *ticket), at(4));
    }

    assert_eq!(tickets.len(), 1);
    assert_eq!(source.calls() - calls_before, 1);
    assert_eq!(state.store().len(), 20);
}

#[test]
fn failed_load_more_shows_error_and_footer_retry_recovers() {
    let mut state = feed();
    let mut good = mock(None);
    let mut bad = failing();

    let t = state.refresh(at(0));
    state.apply_completion(run(&mut good, t), at(1));

    let t = state.load_more(at(2)).unwrap();
    let effect = state.apply_completion(run(&mut bad, t), at(3));
    assert!(matches!(effect, CompletionEffect::LoadMoreFailed(_)));
    assert_eq!(state.footer(), FooterStatus::Error);
    assert_eq!(state.store().len(), 10, "loaded pages are kept");

    let retry = state.retry_footer(at(4)).expect("retry issues load-more");
    assert_eq!(retry.kind, FetchKind::LoadMore);
    assert_eq!(state.footer(), FooterStatus::Loading);
    state.apply_completion(run(&mut good, retry), at(5));
    assert_eq!(state.store().len(), 20);
    assert_eq!(state.footer(), FooterStatus::Hidden);
}

#[test]
fn retry_footer_is_noop_without_error() {
    let mut state = feed();
    assert!(state.retry_footer(at(0)).is_none());
}

#[test]
fn failed_refresh_keeps_store_and_raises_notice() {
    let mut state = feed();
    let mut good = mock(None);
    let mut bad = failing();

    let t = state.refresh(at(0));
    state.apply_completion(run(&mut good, t), at(1));

    let t = state.refresh(at(100));
    let effect = state.apply_completion(run(&mut bad, t), at(200));

    assert!(matches!(effect, CompletionEffect::RefreshFailed(_)));
    assert_eq!(state.store().len(), 10);
    let notice = state.notice(at(201)).expect("notice visible");
    assert!(notice.contains("Refresh failed"));
    assert!(state.notice(at(200 + 3_000)).is_none(), "notice expires");
}

#[test]
fn stale_load_more_after_refresh_is_discarded() {
    let mut state = feed();
    let mut source = mock(None);
    let t = state.refresh(at(0));
    state.apply_completion(run(&mut source, t), at(1));

    let load_more = state.load_more(at(2)).unwrap();
    let refresh = state.refresh(at(3));

    let stale = state.apply_completion(run(&mut source, load_more), at(4));
    assert_eq!(stale, CompletionEffect::Stale);
    assert_eq!(state.store().len(), 10, "stale page not appended");

    let effect = state.apply_completion(run(&mut source, refresh), at(5));
    assert_eq!(effect, CompletionEffect::Replaced { inserted: 10 });
    assert!(
        state.log().lines().iter().any(|l| l.contains("STALE")),
        "stale discard is logged"
    );
}

#[test]
fn watchdog_unfreezes_stuck_load_more() {
    let mut state = feed();
    let mut source = mock(None);
    let t = state.refresh(at(0));
    state.apply_completion(run(&mut source, t), at(1));

    let stuck = state.load_more(at(10)).unwrap();
    assert!(state.check_watchdog(at(5_000)).is_none());

    let effect = state.check_watchdog(at(10_010)).expect("timed out");
    assert!(matches!(
        effect,
        CompletionEffect::LoadMoreFailed(FetchError::TimedOut { .. })
    ));
    assert_eq!(state.footer(), FooterStatus::Error);

    let late = state.apply_completion(run(&mut source, stuck), at(10_020));
    assert_eq!(late, CompletionEffect::Stale);
    assert!(state.retry_footer(at(10_030)).is_some());
}

// ===== Scroll trigger =====

#[test]
fn on_scrolled_near_end_loads_more() {
    let mut state = feed();
    let mut source = mock(None);
    let t = state.refresh(at(0));
    state.apply_completion(run(&mut source, t), at(1));

    assert!(state.on_scrolled(5, 3, at(2)).is_none(), "far from end");
    let ticket = state.on_scrolled(5, 7, at(3)).expect("within threshold");
    assert_eq!(ticket.page, 1);
}

#[test]
fn on_scrolled_upward_never_loads() {
    let mut state = feed();
    let mut source = mock(None);
    let t = state.refresh(at(0));
    state.apply_completion(run(&mut source, t), at(1));

    assert!(state.on_scrolled(-3, 9, at(2)).is_none());
}

// ===== Exposure flow =====

#[test]
fn observe_logs_each_event() {
    let mut state = feed();
    let mut source = mock(None);
    let t = state.refresh(at(0));
    state.apply_completion(run(&mut source, t), at(1));

    let snapshot = vec![sample(&state, 0, 1.0)];
    let events = state.observe(&snapshot, at(10));
    state.observe(&[], at(510));

    assert_eq!(events.len(), 2);
    let lines = state.log().lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("HIDDEN   id=id_0 pos=0 lastRatio=1.00 total=500ms"));
    assert!(lines[1].contains("FULL     id=id_0"));
    assert!(lines[2].contains("EXPOSED  id=id_0"));
}

#[test]
fn refresh_keeps_exposure_state_for_reused_ids() {
    let mut state = feed();
    let mut source = mock(None);
    let t = state.refresh(at(0));
    state.apply_completion(run(&mut source, t), at(1));
    let snapshot = vec![sample(&state, 0, 1.0)];
    state.observe(&snapshot, at(2));

    let t = state.refresh(at(3));
    state.apply_completion(run(&mut source, t), at(4));
    let events = state.observe(&snapshot, at(5));

    assert!(events.is_empty(), "id_0 was already exposed this session");
}

#[test]
fn clear_discards_exposure_state() {
    let mut state = feed();
    let mut source = mock(None);
    let t = state.refresh(at(0));
    state.apply_completion(run(&mut source, t), at(1));
    let snapshot = vec![sample(&state, 0, 1.0)];
    state.observe(&snapshot, at(2));

    state.clear();
    assert!(state.store().is_empty());
    assert_eq!(state.tracker().tracked_len(), 0);

    let t = state.refresh(at(3));
    state.apply_completion(run(&mut source, t), at(4));
    let events = state.observe(&snapshot, at(5));
    assert_eq!(events.len(), 2, "exposed and fully visible again");
}

#[test]
fn remove_at_hides_visible_entry_on_next_pass() {
    let mut state = feed();
    let mut source = mock(None);
    let t = state.refresh(at(0));
    state.apply_completion(run(&mut source, t), at(1));
    state.observe(&[sample(&state, 0, 1.0)], at(2));

    let removed = state.remove_at(0).expect("entry removed");
    assert_eq!(removed.id(), &ItemId::new("id_0").unwrap());

    let events = state.observe(&[sample(&state, 0, 1.0)], at(52));
    assert!(events.iter().any(|e| matches!(
        e,
        ExposureEvent::Hidden { id, total_visible_ms: 50, .. } if id.as_str() == "id_0"
    )));
    assert!(state.log().lines().iter().any(|l| l.contains("DELETED  id=id_0")));
}
