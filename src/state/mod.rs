//! Feed state machines (pure).
//!
//! All state transitions are pure functions of their inputs and a supplied
//! timestamp, testable without a terminal or a clock.

pub mod event_log;
pub mod exposure;
pub mod feed_state;
pub mod item_store;
pub mod pagination;

// Re-export for convenience
pub use event_log::{EventLog, LogEntry, SharedEventLog, DEFAULT_LOG_CAPACITY};
pub use exposure::{ExposureState, ExposureTracker};
pub use feed_state::{CompletionEffect, FeedSettings, FeedState, Notice};
pub use item_store::{ItemLookup, ItemStore, Slot};
pub use pagination::{
    FetchKind, FetchTicket, PageOutcome, Pagination, PaginationState, Settlement,
    StaleCompletion,
};
