//! Deterministic mock feed.
//!
//! Entry `i` (global index) gets id `id_<i>`; even indices are text cards,
//! odd ones image cards; every third index is a full-width card. Failures
//! and feed length are configurable so every footer state is reachable.

use super::PageFetcher;
use crate::model::{CardKind, FeedEntry, FetchError, ImageSource, ItemId, LayoutSpan};

/// Knobs for [`MockFeed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockFeedConfig {
    /// Entries per page.
    pub page_size: usize,
    /// Total feed length; `None` means endless.
    pub total_items: Option<usize>,
    /// Fail every n-th call (1 fails every call); `None` never fails.
    pub fail_every: Option<u32>,
}

impl Default for MockFeedConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            total_items: None,
            fail_every: None,
        }
    }
}

/// Generator of mock pages.
#[derive(Debug, Clone)]
pub struct MockFeed {
    config: MockFeedConfig,
    calls: u32,
}

impl MockFeed {
    /// Create a mock feed.
    pub fn new(config: MockFeedConfig) -> Self {
        Self { config, calls: 0 }
    }

    /// Number of `fetch_page` calls served so far.
    pub fn calls(&self) -> u32 {
        self.calls
    }

    /// Build the entry at global index `index`.
    pub fn entry(index: usize) -> Option<FeedEntry> {
        let id = ItemId::new(format!("id_{index}")).ok()?;
        let card_kind = if index % 2 == 0 {
            CardKind::Text
        } else {
            CardKind::Image
        };
        let layout_span = if index % 3 == 0 {
            LayoutSpan::Single
        } else {
            LayoutSpan::Double
        };
        let image_source = match card_kind {
            CardKind::Text => ImageSource::None,
            CardKind::Image => ImageSource::RemoteUrl(format!("https://example.com/{index}")),
        };
        Some(FeedEntry::new(
            id,
            card_kind,
            layout_span,
            format!("Title {index}"),
            format!("This is test entry number {index}"),
            image_source,
        ))
    }

    fn should_fail(&self) -> bool {
        match self.config.fail_every {
            Some(0) | None => false,
            Some(n) => self.calls % n == 0,
        }
    }
}

impl PageFetcher for MockFeed {
    fn fetch_page(&mut self, page: u32) -> Result<Vec<FeedEntry>, FetchError> {
        self.calls = self.calls.saturating_add(1);
        if self.should_fail() {
            return Err(FetchError::Unavailable {
                page,
                reason: format!("injected failure on call {}", self.calls),
            });
        }

        let size = self.config.page_size;
        let start = (page as usize).saturating_mul(size);
        let end = match self.config.total_items {
            Some(total) => start.saturating_add(size).min(total),
            None => start.saturating_add(size),
        };
        Ok((start..end).filter_map(Self::entry).collect())
    }
}
