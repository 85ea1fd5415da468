//! Pagination lifecycle and footer projection.
//!
//! One tagged enum replaces the usual `is_loading_more` / `has_more` / footer
//! flag trio, so only intended combinations are representable:
//!
//! | State         | Footer            | `has_more` |
//! |---------------|-------------------|------------|
//! | `Idle`        | `Hidden`/`Error`  | true       |
//! | `Refreshing`  | `Hidden`          | true       |
//! | `LoadingMore` | `Loading`         | true       |
//! | `Settled`     | `NoMore`          | false      |
//!
//! Every fetch is issued as a [`FetchTicket`] carrying a fresh generation.
//! Only the completion whose generation matches the fetch in flight is
//! applied; anything else is stale and rejected. A refresh issued while a
//! load-more is pending therefore supersedes it instead of racing it.

use crate::model::{FetchError, FooterStatus, Timestamp};

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;

/// Why a fetch was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    /// Reload page 0 and replace the store.
    Refresh,
    /// Fetch the next page and append it.
    LoadMore,
}

/// Handle for one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    /// Monotonically increasing tag; unique per issued fetch.
    pub generation: u64,
    /// Page index requested.
    pub page: u32,
    /// Refresh or load-more.
    pub kind: FetchKind,
}

/// Where pagination resumes if a refresh fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resume {
    Idle { next_page: u32, failed: bool },
    Settled,
}

/// Pagination lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    /// Nothing in flight; more pages may exist.
    Idle {
        /// Page the next load-more will request.
        next_page: u32,
        /// Whether the last load-more failed (footer shows retry).
        failed: bool,
    },
    /// Page 0 is being reloaded.
    Refreshing {
        /// Ticket of the refresh in flight.
        ticket: FetchTicket,
        /// When it was issued.
        issued_at: Timestamp,
        /// Where to return if the refresh fails.
        resume: ResumePoint,
    },
    /// The next page is being fetched.
    LoadingMore {
        /// Ticket of the load-more in flight.
        ticket: FetchTicket,
        /// When it was issued.
        issued_at: Timestamp,
    },
    /// A short page was received; no further pages.
    Settled,
}

/// Opaque snapshot of the state a refresh started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumePoint(Resume);

/// Result of a fetch as seen by pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page arrived with `len` entries.
    Loaded {
        /// Number of entries in the page.
        len: usize,
    },
    /// The fetch failed.
    Failed,
}

/// What the caller must do with an accepted completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Replace the store with the page.
    Replace {
        /// Whether further pages may exist.
        has_more: bool,
    },
    /// Append the page to the store.
    Append {
        /// Whether further pages may exist.
        has_more: bool,
    },
    /// Refresh failed; keep the store and show a notice.
    RefreshFailed,
    /// Load-more failed; the footer now offers a retry.
    LoadMoreFailed,
}

/// Rejection of a completion that no longer matches the fetch in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Stale completion for generation {generation} (in flight: {in_flight:?})")]
pub struct StaleCompletion {
    /// Generation of the rejected completion.
    pub generation: u64,
    /// Generation currently in flight, if any.
    pub in_flight: Option<u64>,
}

/// Pagination state machine.
#[derive(Debug, Clone)]
pub struct Pagination {
    state: PaginationState,
    page_size: usize,
    last_generation: u64,
}

impl Pagination {
    /// Create a machine that treats pages shorter than `page_size` as the end.
    pub fn new(page_size: usize) -> Self {
        Self {
            state: PaginationState::Idle {
                next_page: 0,
                failed: false,
            },
            page_size: page_size.max(1),
            last_generation: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> PaginationState {
        self.state
    }

    /// Configured page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Footer status projected from the current state.
    pub fn footer(&self) -> FooterStatus {
        match self.state {
            PaginationState::Idle { failed: true, .. } => FooterStatus::Error,
            PaginationState::Idle { failed: false, .. } => FooterStatus::Hidden,
            PaginationState::Refreshing { .. } => FooterStatus::Hidden,
            PaginationState::LoadingMore { .. } => FooterStatus::Loading,
            PaginationState::Settled => FooterStatus::NoMore,
        }
    }

    /// Whether further pages may exist.
    pub fn has_more(&self) -> bool {
        !matches!(self.state, PaginationState::Settled)
    }

    /// Ticket of the fetch in flight, if any.
    pub fn in_flight(&self) -> Option<FetchTicket> {
        match self.state {
            PaginationState::Refreshing { ticket, .. }
            | PaginationState::LoadingMore { ticket, .. } => Some(ticket),
            PaginationState::Idle { .. } | PaginationState::Settled => None,
        }
    }

    /// Start a refresh of page 0. Valid from any state.
    ///
    /// Any fetch already in flight is superseded: its completion will be
    /// rejected as stale.
    pub fn refresh(&mut self, now: Timestamp) -> FetchTicket {
        let resume = match self.state {
            PaginationState::Idle { next_page, failed } => Resume::Idle { next_page, failed },
            PaginationState::Refreshing { resume, .. } => resume.0,
            PaginationState::LoadingMore { ticket, .. } => Resume::Idle {
                next_page: ticket.page,
                failed: false,
            },
            PaginationState::Settled => Resume::Settled,
        };
        let ticket = self.issue(0, FetchKind::Refresh);
        self.state = PaginationState::Refreshing {
            ticket,
            issued_at: now,
            resume: ResumePoint(resume),
        };
        ticket
    }

    /// Start fetching the next page.
    ///
    /// Returns `None` (and changes nothing) while any fetch is in flight or
    /// once the feed is settled. This guard keeps at most one fetch
    /// outstanding.
    pub fn load_more(&mut self, now: Timestamp) -> Option<FetchTicket> {
        let PaginationState::Idle { next_page, .. } = self.state else {
            return None;
        };
        let ticket = self.issue(next_page, FetchKind::LoadMore);
        self.state = PaginationState::LoadingMore {
            ticket,
            issued_at: now,
        };
        Some(ticket)
    }

    /// Apply the completion of `ticket`.
    ///
    /// # Errors
    ///
    /// Returns [`StaleCompletion`] when `ticket` is not the fetch in flight;
    /// the state is left untouched.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        outcome: PageOutcome,
    ) -> Result<Settlement, StaleCompletion> {
        let current = self.in_flight();
        if current != Some(ticket) {
            return Err(StaleCompletion {
                generation: ticket.generation,
                in_flight: current.map(|t| t.generation),
            });
        }

        let settlement = match (ticket.kind, outcome) {
            (FetchKind::Refresh, PageOutcome::Loaded { len }) => {
                let has_more = self.settle_page(ticket.page, len);
                Settlement::Replace { has_more }
            }
            (FetchKind::LoadMore, PageOutcome::Loaded { len }) => {
                let has_more = self.settle_page(ticket.page, len);
                Settlement::Append { has_more }
            }
            (FetchKind::Refresh, PageOutcome::Failed) => {
                self.restore_after_failed_refresh();
                Settlement::RefreshFailed
            }
            (FetchKind::LoadMore, PageOutcome::Failed) => {
                self.state = PaginationState::Idle {
                    next_page: ticket.page,
                    failed: true,
                };
                Settlement::LoadMoreFailed
            }
        };
        Ok(settlement)
    }

    /// Fail the fetch in flight if it was issued `timeout_ms` or more ago.
    ///
    /// Returns the timed-out ticket, its settlement and the error to report.
    /// The late completion, if it ever arrives, is then stale.
    pub fn expire(
        &mut self,
        now: Timestamp,
        timeout_ms: u64,
    ) -> Option<(FetchTicket, Settlement, FetchError)> {
        let (ticket, issued_at) = match self.state {
            PaginationState::Refreshing {
                ticket, issued_at, ..
            }
            | PaginationState::LoadingMore { ticket, issued_at } => (ticket, issued_at),
            PaginationState::Idle { .. } | PaginationState::Settled => return None,
        };
        if now.millis_since(issued_at) < timeout_ms {
            return None;
        }
        let settlement = self.complete(ticket, PageOutcome::Failed).ok()?;
        let error = FetchError::TimedOut {
            page: ticket.page,
            timeout_ms,
        };
        Some((ticket, settlement, error))
    }

    /// Whether a downward scroll whose last visible position is
    /// `last_visible` (out of `total` display slots) should load more.
    pub fn near_end(dy: i32, last_visible: usize, total: usize, threshold: usize) -> bool {
        dy > 0 && last_visible.saturating_add(threshold) >= total
    }

    fn issue(&mut self, page: u32, kind: FetchKind) -> FetchTicket {
        self.last_generation += 1;
        FetchTicket {
            generation: self.last_generation,
            page,
            kind,
        }
    }

    fn settle_page(&mut self, page: u32, len: usize) -> bool {
        if len < self.page_size {
            self.state = PaginationState::Settled;
            false
        } else {
            self.state = PaginationState::Idle {
                next_page: page.saturating_add(1),
                failed: false,
            };
            true
        }
    }

    fn restore_after_failed_refresh(&mut self) {
        let PaginationState::Refreshing { resume, .. } = self.state else {
            return;
        };
        self.state = match resume.0 {
            Resume::Idle { next_page, failed } => PaginationState::Idle { next_page, failed },
            Resume::Settled => PaginationState::Settled,
        };
    }
}
