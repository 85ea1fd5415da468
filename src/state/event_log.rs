//! Bounded, timestamped exposure log.
//!
//! Shared between the feed (writer) and the diagnostic overlay (reader),
//! possibly on different threads. Append, snapshot and clear each take the
//! lock once; readers get owned copies, never an iterator over the buffer.

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[cfg(test)]
#[path = "event_log_tests.rs"]
mod tests;

/// Default number of retained entries.
pub const DEFAULT_LOG_CAPACITY: usize = 200;

/// Wall-clock format of a rendered line (`HH:MM:SS.mmm`).
const TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// A single log entry captured for the diagnostic view.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// When the entry was appended.
    pub timestamp: DateTime<Local>,
    /// The message text.
    pub message: String,
}

impl LogEntry {
    /// Render as `"HH:MM:SS.mmm  <message>"`.
    pub fn render(&self) -> String {
        format!("{}  {}", self.timestamp.format(TIME_FORMAT), self.message)
    }
}

/// Shared handle to an [`EventLog`].
pub type SharedEventLog = Arc<EventLog>;

/// Fixed-capacity, most-recent-first log buffer.
#[derive(Debug)]
pub struct EventLog {
    /// Newest at front, oldest at back.
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
}

impl EventLog {
    /// Create a log retaining at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Create a log wrapped for sharing.
    pub fn shared(capacity: usize) -> SharedEventLog {
        Arc::new(Self::new(capacity))
    }

    /// Append a message stamped with the current local time.
    pub fn append(&self, message: impl Into<String>) {
        self.append_at(Local::now(), message);
    }

    /// Append a message with an explicit timestamp.
    ///
    /// If at capacity, the oldest entry is evicted.
    pub fn append_at(&self, timestamp: DateTime<Local>, message: impl Into<String>) {
        let entry = LogEntry {
            timestamp,
            message: message.into(),
        };
        tracing::debug!(target: "exposure", "{}", entry.render());

        if self.capacity == 0 {
            return;
        }
        let mut entries = self.lock();
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    /// Copy of all entries, newest first.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.lock().iter().cloned().collect()
    }

    /// Rendered lines, newest first.
    pub fn lines(&self) -> Vec<String> {
        self.snapshot().iter().map(LogEntry::render).collect()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of retained entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // A panic while holding the lock leaves the deque structurally valid,
    // so a poisoned lock is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}
