//! Core identifier newtypes with smart constructors.
//!
//! Identifiers validate non-empty strings at construction time.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Stable identity of a feed entry.
///
/// Two entries with the same `ItemId` are the same logical item even if
/// their content differs. Ids are never reused within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

/// Error returned when constructing an [`ItemId`] from an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Item id must not be empty")]
pub struct InvalidItemId;

impl ItemId {
    /// Smart constructor: validates non-empty id.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidItemId> {
        let raw = raw.into();
        if raw.is_empty() {
            Err(InvalidItemId)
        } else {
            Ok(Self(raw))
        }
    }

    /// Borrow the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monotonic session time in milliseconds.
///
/// The TUI derives it from `Instant::elapsed`; headless runs and tests drive
/// it from a virtual clock. Never goes backwards within one timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Session start.
    pub const ZERO: Self = Self(0);

    /// Create a timestamp from milliseconds since session start.
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Raw milliseconds since session start.
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, saturating at zero.
    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Advance by `millis`, saturating at `u64::MAX`.
    pub fn saturating_add_millis(&self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis))
    }
}
