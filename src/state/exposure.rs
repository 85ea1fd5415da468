//! Per-item exposure tracking.
//!
//! The tracker turns a stream of viewport snapshots into three kinds of
//! events: first partial visibility, first full visibility, and end of
//! visibility with accumulated dwell time.
//!
//! # Evaluation
//!
//! Each call to [`ExposureTracker::evaluate`] runs two passes:
//!
//! 1. Samples in snapshot order. Samples that point at the footer, at a
//!    missing item, or at a position now holding a different id are skipped.
//!    An invisible→visible transition starts the dwell clock and fires
//!    `Exposed` the first time; reaching ratio 1.0 fires `FullyVisible` once.
//! 2. Every tracked id that was visible last pass and is absent from this
//!    one is hidden: its dwell period is added to the total and `Hidden` is
//!    emitted. Hidden events follow all exposed/full events; their relative
//!    order is unspecified.
//!
//! # Lenience
//!
//! Snapshots come from the renderer and are instrumentation input, so the
//! tracker never rejects them. Ratios are clamped to `[0, 1]` (NaN counts as
//! 0), a sample with ratio 0 counts as absent, and a repeated id within one
//! snapshot keeps only its first sample.

use super::item_store::ItemLookup;
use crate::model::{ExposureEvent, ItemId, Timestamp, ViewportSample};
use std::collections::{HashMap, HashSet};

#[cfg(test)]
#[path = "exposure_tests.rs"]
mod tests;

/// Visibility bookkeeping for one item id.
///
/// # Invariants
/// - `visible_since.is_some()` iff `last_ratio > 0`
/// - `total_visible_ms` only grows, and only on a visible→hidden transition
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureState {
    last_ratio: f32,
    last_position: usize,
    visible_since: Option<Timestamp>,
    total_visible_ms: u64,
    exposed: bool,
    fully_visible: bool,
}

impl ExposureState {
    fn new(position: usize) -> Self {
        Self {
            last_ratio: 0.0,
            last_position: position,
            visible_since: None,
            total_visible_ms: 0,
            exposed: false,
            fully_visible: false,
        }
    }

    /// Visible ratio from the latest pass the item appeared in (0 once hidden).
    pub fn last_ratio(&self) -> f32 {
        self.last_ratio
    }

    /// Position the item was last seen at.
    pub fn last_position(&self) -> usize {
        self.last_position
    }

    /// Start of the current visible period, if visible.
    pub fn visible_since(&self) -> Option<Timestamp> {
        self.visible_since
    }

    /// Dwell time accumulated over completed visible periods.
    pub fn total_visible_ms(&self) -> u64 {
        self.total_visible_ms
    }

    /// Whether `Exposed` has fired for this item.
    pub fn has_fired_exposed(&self) -> bool {
        self.exposed
    }

    /// Whether `FullyVisible` has fired for this item.
    pub fn has_fired_fully_visible(&self) -> bool {
        self.fully_visible
    }

    /// Whether the item counted as visible in the latest pass.
    pub fn is_visible(&self) -> bool {
        self.last_ratio > 0.0
    }
}

/// Exposure state machine keyed by item identity.
///
/// Owns all per-item state; entries in the store never point back into it.
#[derive(Debug, Default)]
pub struct ExposureTracker {
    states: HashMap<ItemId, ExposureState>,
}

impl ExposureTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one viewport snapshot taken at `now`.
    ///
    /// Returns the events produced by this pass. Calling again with an
    /// identical snapshot and `now` returns no events.
    pub fn evaluate<L: ItemLookup + ?Sized>(
        &mut self,
        snapshot: &[ViewportSample],
        now: Timestamp,
        items: &L,
    ) -> Vec<ExposureEvent> {
        let mut events = Vec::new();
        let mut present: HashSet<&ItemId> = HashSet::with_capacity(snapshot.len());

        for sample in snapshot {
            let ratio = normalize_ratio(sample.ratio);
            if ratio <= 0.0 {
                continue;
            }

            // Footer positions and items removed since layout resolve to no
            // entry, or to an entry with another id.
            match items.entry_at(sample.position) {
                Some(entry) if entry.id() == &sample.id => {}
                _ => {
                    tracing::trace!(
                        id = %sample.id,
                        position = sample.position,
                        "Skipping sample without a matching item"
                    );
                    continue;
                }
            }

            if !present.insert(&sample.id) {
                continue;
            }

            let state = self
                .states
                .entry(sample.id.clone())
                .or_insert_with(|| ExposureState::new(sample.position));

            if state.last_ratio == 0.0 {
                state.visible_since = Some(now);
                if !state.exposed {
                    state.exposed = true;
                    events.push(ExposureEvent::Exposed {
                        id: sample.id.clone(),
                        position: sample.position,
                        ratio,
                    });
                }
            }

            if !state.fully_visible && ratio >= 1.0 {
                state.fully_visible = true;
                events.push(ExposureEvent::FullyVisible {
                    id: sample.id.clone(),
                    position: sample.position,
                });
            }

            state.last_ratio = ratio;
            state.last_position = sample.position;
        }

        for (id, state) in self.states.iter_mut() {
            if !state.is_visible() || present.contains(id) {
                continue;
            }

            if let Some(since) = state.visible_since.take() {
                state.total_visible_ms = state
                    .total_visible_ms
                    .saturating_add(now.millis_since(since));
            }

            events.push(ExposureEvent::Hidden {
                id: id.clone(),
                position: state.last_position,
                last_ratio: state.last_ratio,
                total_visible_ms: state.total_visible_ms,
            });

            state.last_ratio = 0.0;
        }

        events
    }

    /// Discard all per-item state.
    ///
    /// Used when the store is cleared; ids seen afterwards start fresh.
    pub fn reset(&mut self) {
        self.states.clear();
    }

    /// Read-only view of one item's state.
    pub fn state(&self, id: &ItemId) -> Option<&ExposureState> {
        self.states.get(id)
    }

    /// Number of ids with tracked state.
    pub fn tracked_len(&self) -> usize {
        self.states.len()
    }

    /// Number of ids currently counted as visible.
    pub fn visible_len(&self) -> usize {
        self.states.values().filter(|s| s.is_visible()).count()
    }
}

/// Clamp a renderer-supplied ratio into `[0, 1]`, mapping NaN to 0.
fn normalize_ratio(ratio: f32) -> f32 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}
