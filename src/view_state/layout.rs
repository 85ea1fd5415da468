//! Two-column grid layout of feed cards.
//!
//! Cards fill rows left to right. A full-width card always starts a new row;
//! a half-width card shares its row with the next half-width card. Each card
//! keeps its own height, so in a mixed row the shorter card leaves a gap
//! below it. The footer, when visible, gets its own full-width row.

use crate::model::{CardKind, FooterStatus, LayoutSpan};
use crate::state::ItemStore;

/// Rendered height of a text card in lines (borders included).
pub const TEXT_CARD_HEIGHT: u16 = 4;
/// Rendered height of an image card in lines (borders included).
pub const IMAGE_CARD_HEIGHT: u16 = 7;
/// Rendered height of the footer row.
pub const FOOTER_HEIGHT: u16 = 3;

const GRID_COLUMNS: u16 = 2;

/// Height of a card of the given kind.
pub fn card_height(kind: CardKind) -> u16 {
    match kind {
        CardKind::Text => TEXT_CARD_HEIGHT,
        CardKind::Image => IMAGE_CARD_HEIGHT,
    }
}

/// What a laid-out slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// A feed entry.
    Entry,
    /// The footer row.
    Footer,
}

/// Placement of one display slot in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRect {
    /// Display position (entries first, footer last).
    pub position: usize,
    /// Entry or footer.
    pub kind: SlotKind,
    /// First grid column (0 or 1).
    pub column: u16,
    /// Columns spanned (1 or 2).
    pub span: u16,
    /// Absolute top line.
    pub top: usize,
    /// Height in lines (always >= 1).
    pub height: u16,
}

impl SlotRect {
    /// Absolute line just past the bottom edge.
    pub fn bottom(&self) -> usize {
        self.top + usize::from(self.height)
    }

    /// Lines of this slot inside `[view_top, view_top + view_height)`.
    pub fn overlap(&self, view_top: usize, view_height: usize) -> usize {
        let start = self.top.max(view_top);
        let end = self.bottom().min(view_top.saturating_add(view_height));
        end.saturating_sub(start)
    }
}

/// Computed layout for the whole feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedLayout {
    slots: Vec<SlotRect>,
    total_height: usize,
}

impl FeedLayout {
    /// Lay out every entry in `store`, plus the footer when visible.
    pub fn compute(store: &ItemStore, footer: FooterStatus) -> Self {
        let mut slots = Vec::with_capacity(store.display_count(footer));
        let mut row_top = 0usize;
        let mut row_height = 0u16;
        let mut column = 0u16;

        for (position, entry) in store.iter().enumerate() {
            let span = match entry.layout_span() {
                LayoutSpan::Single => GRID_COLUMNS,
                LayoutSpan::Double => 1,
            };
            if column + span > GRID_COLUMNS {
                row_top += usize::from(row_height);
                row_height = 0;
                column = 0;
            }
            let height = card_height(entry.card_kind());
            slots.push(SlotRect {
                position,
                kind: SlotKind::Entry,
                column,
                span,
                top: row_top,
                height,
            });
            row_height = row_height.max(height);
            column += span;
            if column == GRID_COLUMNS {
                row_top += usize::from(row_height);
                row_height = 0;
                column = 0;
            }
        }
        row_top += usize::from(row_height);

        if footer.is_visible() {
            slots.push(SlotRect {
                position: store.len(),
                kind: SlotKind::Footer,
                column: 0,
                span: GRID_COLUMNS,
                top: row_top,
                height: FOOTER_HEIGHT,
            });
            row_top += usize::from(FOOTER_HEIGHT);
        }

        Self {
            slots,
            total_height: row_top,
        }
    }

    /// All slots in position order.
    pub fn slots(&self) -> &[SlotRect] {
        &self.slots
    }

    /// Slot at display `position`.
    pub fn slot(&self, position: usize) -> Option<&SlotRect> {
        self.slots.get(position)
    }

    /// Total content height in lines.
    pub fn total_height(&self) -> usize {
        self.total_height
    }

    /// Slots intersecting `[view_top, view_top + view_height)`, in order.
    pub fn visible_slots(
        &self,
        view_top: usize,
        view_height: usize,
    ) -> impl Iterator<Item = &SlotRect> {
        self.slots
            .iter()
            .filter(move |slot| slot.overlap(view_top, view_height) > 0)
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
