//! Exposure events and viewport samples exchanged with the renderer.

use super::identifiers::ItemId;
use serde::Serialize;
use std::fmt;

/// One laid-out, non-footer item as seen by the renderer in a single pass.
///
/// `ratio` is `overlap / item_height`; the tracker clamps it to `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportSample {
    /// Identity of the item at `position`.
    pub id: ItemId,
    /// Adapter position (0-based, entries only).
    pub position: usize,
    /// Visible fraction of the item's rendered height.
    pub ratio: f32,
}

impl ViewportSample {
    /// Create a new sample.
    pub fn new(id: ItemId, position: usize, ratio: f32) -> Self {
        Self { id, position, ratio }
    }
}

/// Visibility transition reported by the exposure tracker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExposureEvent {
    /// First transition from invisible to partially visible.
    Exposed {
        /// Item identity.
        id: ItemId,
        /// Position at the time of exposure.
        position: usize,
        /// Visible ratio at the time of exposure.
        ratio: f32,
    },
    /// First time the item was entirely inside the viewport.
    FullyVisible {
        /// Item identity.
        id: ItemId,
        /// Position at the time it became fully visible.
        position: usize,
    },
    /// Item left the viewport.
    Hidden {
        /// Item identity.
        id: ItemId,
        /// Last position the item was seen at.
        position: usize,
        /// Visible ratio from the last pass it was visible in.
        last_ratio: f32,
        /// Cumulative dwell time across every visible period so far.
        total_visible_ms: u64,
    },
}

impl ExposureEvent {
    /// Identity of the item this event is about.
    pub fn id(&self) -> &ItemId {
        match self {
            ExposureEvent::Exposed { id, .. }
            | ExposureEvent::FullyVisible { id, .. }
            | ExposureEvent::Hidden { id, .. } => id,
        }
    }

    /// Position reported with the event.
    pub fn position(&self) -> usize {
        match self {
            ExposureEvent::Exposed { position, .. }
            | ExposureEvent::FullyVisible { position, .. }
            | ExposureEvent::Hidden { position, .. } => *position,
        }
    }
}

impl fmt::Display for ExposureEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExposureEvent::Exposed {
                id,
                position,
                ratio,
            } => write!(f, "EXPOSED  id={id} pos={position} ratio={ratio:.2}"),
            ExposureEvent::FullyVisible { id, position } => {
                write!(f, "FULL     id={id} pos={position}")
            }
            ExposureEvent::Hidden {
                id,
                position,
                last_ratio,
                total_visible_ms,
            } => write!(
                f,
                "HIDDEN   id={id} pos={position} lastRatio={last_ratio:.2} total={total_visible_ms}ms"
            ),
        }
    }
}
