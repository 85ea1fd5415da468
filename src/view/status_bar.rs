//! Bottom status line: counts, pagination state, prompts and notices.

use super::card::truncate_to_width;
use super::styles::FeedStyles;
use crate::state::PaginationState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Paragraph, Widget},
};

const HINTS: &str = "j/k scroll  r refresh  x delete  l log  q quit";

/// What the status line should say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    /// Normal summary.
    Summary {
        /// Entries in the store.
        items: usize,
        /// Entries the exposure tracker currently counts as on screen.
        visible: usize,
        /// Pagination state.
        state: PaginationState,
    },
    /// Pending delete confirmation for the named card.
    ConfirmDelete(String),
    /// Transient notice.
    Notice(String),
}

fn describe(state: &PaginationState) -> &'static str {
    match state {
        PaginationState::Idle { failed: true, .. } => "load failed",
        PaginationState::Idle { .. } => "idle",
        PaginationState::Refreshing { .. } => "refreshing",
        PaginationState::LoadingMore { .. } => "loading more",
        PaginationState::Settled => "end of feed",
    }
}

/// One-line status widget.
pub struct StatusBar<'a> {
    message: &'a StatusMessage,
    styles: &'a FeedStyles,
}

impl<'a> StatusBar<'a> {
    /// Status bar showing `message`.
    pub fn new(message: &'a StatusMessage, styles: &'a FeedStyles) -> Self {
        Self { message, styles }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = usize::from(area.width);
        let (text, style) = match self.message {
            StatusMessage::Summary {
                items,
                visible,
                state,
            } => (
                format!(
                    " feedscope | {items} items | {visible} visible | {} | {HINTS}",
                    describe(state)
                ),
                self.styles.status_bar(),
            ),
            StatusMessage::ConfirmDelete(title) => (
                format!(" Delete \"{title}\"? y confirm / n cancel"),
                self.styles.alert(),
            ),
            StatusMessage::Notice(notice) => (format!(" {notice}"), self.styles.alert()),
        };
        let text = truncate_to_width(&text, width).into_owned();
        Paragraph::new(Line::from(text))
            .style(style)
            .render(area, buf);
    }
}
