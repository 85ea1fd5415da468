//! Viewport over the feed layout.
//!
//! Holds the scroll offset and turns the current layout into the snapshot
//! the exposure tracker consumes.

use super::layout::{FeedLayout, SlotKind};
use crate::model::ViewportSample;
use crate::state::ItemLookup;

/// What is on screen right now.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportProjection {
    /// One sample per entry with any visible lines, in position order.
    pub samples: Vec<ViewportSample>,
    /// First display position on screen, footer included.
    pub first_visible: Option<usize>,
    /// Last display position on screen, footer included.
    pub last_visible: Option<usize>,
}

/// Scrollable window of `height` lines starting at `offset`.
///
/// The offset is always clamped to `[0, max(0, total_height - height)]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedViewport {
    offset: usize,
    height: u16,
}

impl FeedViewport {
    /// Viewport of `height` lines at the top of the feed.
    pub fn new(height: u16) -> Self {
        Self { offset: 0, height }
    }

    /// First content line shown.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Visible lines.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize and re-clamp.
    pub fn set_height(&mut self, height: u16, layout: &FeedLayout) {
        self.height = height;
        self.clamp(layout);
    }

    /// Largest valid offset for `layout`.
    pub fn max_offset(&self, layout: &FeedLayout) -> usize {
        layout
            .total_height()
            .saturating_sub(usize::from(self.height))
    }

    /// Pull the offset back into range after the layout changed.
    pub fn clamp(&mut self, layout: &FeedLayout) {
        self.offset = self.offset.min(self.max_offset(layout));
    }

    /// Scroll by `delta` lines (positive = down). Returns the lines moved.
    pub fn scroll_by(&mut self, delta: isize, layout: &FeedLayout) -> isize {
        let before = self.offset;
        let target = if delta >= 0 {
            before.saturating_add(delta.unsigned_abs())
        } else {
            before.saturating_sub(delta.unsigned_abs())
        };
        self.offset = target.min(self.max_offset(layout));
        self.offset as isize - before as isize
    }

    /// Jump to the first line.
    pub fn scroll_to_top(&mut self) -> isize {
        let before = self.offset;
        self.offset = 0;
        -(before as isize)
    }

    /// Jump so the last line is at the bottom edge.
    pub fn scroll_to_bottom(&mut self, layout: &FeedLayout) -> isize {
        let before = self.offset;
        self.offset = self.max_offset(layout);
        self.offset as isize - before as isize
    }

    /// Visibility snapshot for the current offset.
    ///
    /// Entry slots whose id no longer matches the store are left out.
    pub fn project<L: ItemLookup + ?Sized>(
        &self,
        layout: &FeedLayout,
        items: &L,
    ) -> ViewportProjection {
        let height = usize::from(self.height);
        let mut projection = ViewportProjection::default();

        for slot in layout.visible_slots(self.offset, height) {
            projection.first_visible.get_or_insert(slot.position);
            projection.last_visible = Some(
                projection
                    .last_visible
                    .map_or(slot.position, |last| last.max(slot.position)),
            );

            if slot.kind != SlotKind::Entry {
                continue;
            }
            let Some(entry) = items.entry_at(slot.position) else {
                continue;
            };
            let visible = slot.overlap(self.offset, height);
            let ratio = visible as f32 / f32::from(slot.height.max(1));
            projection.samples.push(ViewportSample::new(
                entry.id().clone(),
                slot.position,
                ratio,
            ));
        }

        projection
    }

    /// Entry the user is acting on: the first one fully on screen, else the
    /// first one partly on screen.
    pub fn focused(&self, layout: &FeedLayout) -> Option<usize> {
        let height = usize::from(self.height);
        let mut entries = layout
            .visible_slots(self.offset, height)
            .filter(|slot| slot.kind == SlotKind::Entry);
        let first = entries.next()?;
        if first.top >= self.offset {
            return Some(first.position);
        }
        entries
            .find(|slot| slot.top >= self.offset)
            .map_or(Some(first.position), |slot| Some(slot.position))
    }
}

#[cfg(test)]
#[path = "viewport_tests.rs"]
mod tests;
