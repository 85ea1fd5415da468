//! Card and footer rendering.
//!
//! Each slot is drawn at full size into its own buffer, then the rows that
//! fall inside the viewport are copied into the frame. That keeps partially
//! scrolled cards looking like cards cut by the screen edge.

use super::styles::FeedStyles;
use crate::model::{CardKind, FeedEntry, FooterStatus, ImageSource};
use crate::state::{ItemStore, Slot};
use crate::view_state::{FeedLayout, SlotRect};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};
use std::borrow::Cow;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Cut `text` to at most `max_width` terminal columns, ending in `…` when
/// anything was dropped. Wide (CJK) characters count as two columns.
pub fn truncate_to_width(text: &str, max_width: usize) -> Cow<'_, str> {
    if text.width() <= max_width {
        return Cow::Borrowed(text);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::with_capacity(max_width + 2);
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

fn image_label(source: &ImageSource) -> String {
    match source {
        ImageSource::LocalRef(name) => format!("[local: {name}]"),
        ImageSource::RemoteUrl(url) => format!("[remote: {url}]"),
        ImageSource::None => "[no image]".to_string(),
    }
}

/// Draw one card filling `area`.
pub fn render_card(
    entry: &FeedEntry,
    area: Rect,
    buf: &mut Buffer,
    focused: bool,
    styles: &FeedStyles,
) {
    let block = Block::bordered()
        .border_style(styles.card_border(focused))
        .title(Span::styled(format!(" {} ", entry.id()), styles.dim()));
    let inner = block.inner(area);
    block.render(area, buf);

    let width = usize::from(inner.width);
    let mut lines = vec![Line::styled(
        truncate_to_width(entry.title(), width).into_owned(),
        styles.title(),
    )];

    if entry.card_kind() == CardKind::Image {
        let label = truncate_to_width(&image_label(entry.image_source()), width).into_owned();
        let fill = "░".repeat(width);
        lines.push(Line::styled(fill.clone(), styles.image()));
        lines.push(Line::styled(label, styles.image()).alignment(Alignment::Center));
        lines.push(Line::styled(fill, styles.image()));
    }

    lines.push(Line::styled(
        truncate_to_width(entry.body(), width).into_owned(),
        styles.dim(),
    ));

    Paragraph::new(lines).render(inner, buf);
}

/// Draw the footer row filling `area`.
pub fn render_footer(status: FooterStatus, area: Rect, buf: &mut Buffer, styles: &FeedStyles) {
    let block = Block::bordered().border_style(styles.footer(status));
    let inner = block.inner(area);
    block.render(area, buf);

    let label = truncate_to_width(status.label(), usize::from(inner.width)).into_owned();
    Paragraph::new(Line::styled(label, styles.footer(status)))
        .alignment(Alignment::Center)
        .render(inner, buf);
}

/// The scrolled feed: every visible slot, clipped to the area.
pub struct FeedView<'a> {
    layout: &'a FeedLayout,
    store: &'a ItemStore,
    footer: FooterStatus,
    offset: usize,
    focused: Option<usize>,
    styles: &'a FeedStyles,
}

impl<'a> FeedView<'a> {
    /// Widget over `layout` scrolled to `offset`.
    pub fn new(
        layout: &'a FeedLayout,
        store: &'a ItemStore,
        footer: FooterStatus,
        offset: usize,
        styles: &'a FeedStyles,
    ) -> Self {
        Self {
            layout,
            store,
            footer,
            offset,
            focused: None,
            styles,
        }
    }

    /// Highlight the card at `position`.
    pub fn focused(mut self, position: Option<usize>) -> Self {
        self.focused = position;
        self
    }

    fn columns(area: Rect, slot: &SlotRect) -> (u16, u16) {
        let half = area.width / 2;
        match (slot.column, slot.span) {
            (_, 2) => (0, area.width),
            (0, _) => (0, half),
            _ => (half, area.width - half),
        }
    }

    fn render_slot(&self, slot: &SlotRect, area: Rect, buf: &mut Buffer) {
        let (x_offset, width) = Self::columns(area, slot);
        if width == 0 {
            return;
        }
        let full = Rect::new(0, 0, width, slot.height);
        let mut scratch = Buffer::empty(full);
        match self.store.slot_at(slot.position, self.footer) {
            Slot::Entry(entry) => {
                let focused = self.focused == Some(slot.position);
                render_card(entry, full, &mut scratch, focused, self.styles);
            }
            Slot::Footer => render_footer(self.footer, full, &mut scratch, self.styles),
            // Layout is stale relative to the store.
            Slot::Missing => return,
        }

        let view_end = self.offset + usize::from(area.height);
        for row in 0..slot.height {
            let line = slot.top + usize::from(row);
            if line < self.offset || line >= view_end {
                continue;
            }
            // Bounded by area.height, which is a u16.
            let y = area.y + (line - self.offset) as u16;
            for x in 0..width {
                if let (Some(src), Some(dst)) = (
                    scratch.cell((x, row)),
                    buf.cell_mut((area.x + x_offset + x, y)),
                ) {
                    *dst = src.clone();
                }
            }
        }
    }
}

impl Widget for FeedView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for slot in self
            .layout
            .visible_slots(self.offset, usize::from(area.height))
        {
            self.render_slot(slot, area, buf);
        }
    }
}

#[cfg(test)]
#[path = "card_tests.rs"]
mod tests;
