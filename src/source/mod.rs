//! Page sources.
//!
//! This module provides the fetch side of pagination:
//! - [`PageFetcher`], the collaborator contract
//! - [`MockFeed`], a deterministic generator used by the binary and tests
//! - [`FetchWorker`], which runs fetches off the UI thread with a simulated
//!   latency and hands completions back over a channel

use crate::model::{FeedEntry, FetchError};
use crate::state::FetchTicket;

pub mod mock;
pub mod worker;

pub use mock::{MockFeed, MockFeedConfig};
pub use worker::FetchWorker;

/// Produces pages of feed entries.
///
/// Implementations may block; callers that must not block run them on a
/// [`FetchWorker`]. The caller guarantees at most one outstanding call.
pub trait PageFetcher: Send {
    /// Fetch page `page` (0-based).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the page cannot be produced.
    fn fetch_page(&mut self, page: u32) -> Result<Vec<FeedEntry>, FetchError>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for Box<F> {
    fn fetch_page(&mut self, page: u32) -> Result<Vec<FeedEntry>, FetchError> {
        (**self).fetch_page(page)
    }
}

/// Result of one issued fetch, tagged with its ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchCompletion {
    /// Ticket the fetch was issued with.
    pub ticket: FetchTicket,
    /// Page contents or failure.
    pub result: Result<Vec<FeedEntry>, FetchError>,
}

impl FetchCompletion {
    /// Run `fetcher` for `ticket` synchronously.
    pub fn run<F: PageFetcher + ?Sized>(fetcher: &mut F, ticket: FetchTicket) -> Self {
        Self {
            ticket,
            result: fetcher.fetch_page(ticket.page),
        }
    }
}
