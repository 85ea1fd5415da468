//! Feed state: the single timeline tying store, pagination and exposure.
//!
//! Every transition the host loop triggers goes through [`FeedState`]:
//! viewport snapshots, scroll signals, refresh/load-more requests, fetch
//! completions, watchdog ticks and deletions. Methods that start a fetch
//! return the [`FetchTicket`] the host must hand to its fetcher.

use super::event_log::SharedEventLog;
use super::exposure::ExposureTracker;
use super::item_store::ItemStore;
use super::pagination::{FetchKind, FetchTicket, PageOutcome, Pagination, Settlement};
use crate::model::{ExposureEvent, FeedEntry, FetchError, FooterStatus, Timestamp, ViewportSample};
use crate::source::FetchCompletion;
use tracing::{debug, info, warn};

#[cfg(test)]
#[path = "feed_state_tests.rs"]
mod tests;

/// Tunables for [`FeedState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSettings {
    /// Page size; shorter pages end the feed.
    pub page_size: usize,
    /// Load more when the last visible slot is this close to the end.
    pub load_more_threshold: usize,
    /// Fail a fetch still in flight after this long.
    pub fetch_timeout_ms: u64,
    /// How long a refresh-failure notice stays up.
    pub notice_ms: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            load_more_threshold: 3,
            fetch_timeout_ms: 10_000,
            notice_ms: 3_000,
        }
    }
}

/// Transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Message text.
    pub message: String,
    /// When the notice stops showing.
    pub expires_at: Timestamp,
}

/// What applying a completion did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionEffect {
    /// Store replaced by a refreshed page 0.
    Replaced {
        /// Entries now in the store.
        inserted: usize,
    },
    /// Page appended to the store.
    Appended {
        /// Entries actually inserted (duplicates dropped).
        inserted: usize,
    },
    /// Refresh failed; store untouched, notice raised.
    RefreshFailed(FetchError),
    /// Load-more failed; footer shows retry.
    LoadMoreFailed(FetchError),
    /// Completion did not match the fetch in flight and was dropped.
    Stale,
}

/// Aggregate feed state.
#[derive(Debug)]
pub struct FeedState {
    store: ItemStore,
    pagination: Pagination,
    tracker: ExposureTracker,
    log: SharedEventLog,
    settings: FeedSettings,
    notice: Option<Notice>,
}

impl FeedState {
    /// Create an empty feed writing exposure lines to `log`.
    pub fn new(settings: FeedSettings, log: SharedEventLog) -> Self {
        Self {
            store: ItemStore::new(),
            pagination: Pagination::new(settings.page_size),
            tracker: ExposureTracker::new(),
            log,
            settings,
            notice: None,
        }
    }

    /// Entries in display order.
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    /// Pagination machine.
    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Exposure tracker.
    pub fn tracker(&self) -> &ExposureTracker {
        &self.tracker
    }

    /// Shared exposure log.
    pub fn log(&self) -> &SharedEventLog {
        &self.log
    }

    /// Settings in effect.
    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    /// Footer status for the renderer.
    pub fn footer(&self) -> FooterStatus {
        self.pagination.footer()
    }

    /// Display slots including the footer.
    pub fn display_count(&self) -> usize {
        self.store.display_count(self.footer())
    }

    /// Feed a viewport snapshot to the tracker and log the resulting events.
    pub fn observe(&mut self, snapshot: &[ViewportSample], now: Timestamp) -> Vec<ExposureEvent> {
        let events = self.tracker.evaluate(snapshot, now, &self.store);
        for event in &events {
            self.log.append(event.to_string());
        }
        events
    }

    /// Pull-to-refresh.
    pub fn refresh(&mut self, now: Timestamp) -> FetchTicket {
        let ticket = self.pagination.refresh(now);
        info!(generation = ticket.generation, "Refresh requested");
        ticket
    }

    /// Request the next page; `None` if a fetch is in flight or the feed ended.
    pub fn load_more(&mut self, now: Timestamp) -> Option<FetchTicket> {
        let ticket = self.pagination.load_more(now);
        match ticket {
            Some(t) => debug!(generation = t.generation, page = t.page, "Load more issued"),
            None => debug!(state = ?self.pagination.state(), "Load more ignored"),
        }
        ticket
    }

    /// Footer retry affordance: re-issues load-more after a failure.
    pub fn retry_footer(&mut self, now: Timestamp) -> Option<FetchTicket> {
        if self.footer() != FooterStatus::Error {
            return None;
        }
        self.load_more(now)
    }

    /// Scroll signal from the host.
    ///
    /// `dy` is the scroll delta (positive = downward) and `last_visible` the
    /// last display position on screen, footer included.
    pub fn on_scrolled(
        &mut self,
        dy: i32,
        last_visible: usize,
        now: Timestamp,
    ) -> Option<FetchTicket> {
        if !Pagination::near_end(
            dy,
            last_visible,
            self.display_count(),
            self.settings.load_more_threshold,
        ) {
            return None;
        }
        self.load_more(now)
    }

    /// Apply a finished fetch.
    pub fn apply_completion(
        &mut self,
        completion: FetchCompletion,
        now: Timestamp,
    ) -> CompletionEffect {
        let FetchCompletion { ticket, result } = completion;
        let outcome = match &result {
            Ok(page) => PageOutcome::Loaded { len: page.len() },
            Err(_) => PageOutcome::Failed,
        };

        let settlement = match self.pagination.complete(ticket, outcome) {
            Ok(settlement) => settlement,
            Err(stale) => {
                debug!(%stale, "Discarding completion");
                self.log.append(format!(
                    "STALE    page={} gen={} discarded",
                    ticket.page, ticket.generation
                ));
                return CompletionEffect::Stale;
            }
        };

        match (settlement, result) {
            (Settlement::Replace { has_more }, Ok(page)) => {
                self.store.replace_all(page);
                self.notice = None;
                info!(entries = self.store.len(), has_more, "Feed refreshed");
                CompletionEffect::Replaced {
                    inserted: self.store.len(),
                }
            }
            (Settlement::Append { has_more }, Ok(page)) => {
                let inserted = self.store.append(page);
                info!(
                    page = ticket.page,
                    inserted,
                    has_more,
                    "Page appended"
                );
                CompletionEffect::Appended { inserted }
            }
            (Settlement::RefreshFailed, Err(error)) => self.refresh_failed(error, now),
            (Settlement::LoadMoreFailed, Err(error)) => self.load_more_failed(ticket, error),
            // Pagination derives the settlement from the result, so success
            // and failure always pair up.
            (settlement, result) => {
                warn!(?settlement, ok = result.is_ok(), "Mismatched settlement");
                CompletionEffect::Stale
            }
        }
    }

    /// Fail a fetch that has been in flight longer than the timeout.
    pub fn check_watchdog(&mut self, now: Timestamp) -> Option<CompletionEffect> {
        let (ticket, settlement, error) = self
            .pagination
            .expire(now, self.settings.fetch_timeout_ms)?;
        warn!(generation = ticket.generation, page = ticket.page, "Fetch timed out");
        let effect = match settlement {
            Settlement::RefreshFailed => self.refresh_failed(error, now),
            _ => self.load_more_failed(ticket, error),
        };
        Some(effect)
    }

    /// Delete the entry at `position`.
    pub fn remove_at(&mut self, position: usize) -> Option<FeedEntry> {
        let removed = self.store.remove_at(position)?;
        info!(id = %removed.id(), position, "Entry deleted");
        self.log
            .append(format!("DELETED  id={} pos={position}", removed.id()));
        Some(removed)
    }

    /// Empty the store and discard all exposure state.
    pub fn clear(&mut self) {
        self.store.clear();
        self.tracker.reset();
    }

    /// Current notice, if it has not expired.
    pub fn notice(&self, now: Timestamp) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|n| now < n.expires_at)
            .map(|n| n.message.as_str())
    }

    fn refresh_failed(&mut self, error: FetchError, now: Timestamp) -> CompletionEffect {
        warn!(%error, "Refresh failed; keeping current feed");
        self.log.append(format!("FETCH    refresh failed: {error}"));
        self.notice = Some(Notice {
            message: format!("Refresh failed: {error}"),
            expires_at: now.saturating_add_millis(self.settings.notice_ms),
        });
        CompletionEffect::RefreshFailed(error)
    }

    fn load_more_failed(&mut self, ticket: FetchTicket, error: FetchError) -> CompletionEffect {
        debug_assert_eq!(ticket.kind, FetchKind::LoadMore);
        warn!(%error, page = ticket.page, "Load more failed");
        self.log
            .append(format!("FETCH    page={} failed: {error}", ticket.page));
        CompletionEffect::LoadMoreFailed(error)
    }
}
