//! Error types for feedscope.
//!
//! Two error types:
//!
//! - [`FetchError`] - the only domain error. A failed page fetch is recovered
//!   locally by the pagination state machine (footer error + retry, or a
//!   transient notice for refresh) and never propagates as a hard failure.
//! - [`AppError`] - top-level failures of the impure shell: configuration,
//!   logging initialization and terminal I/O. These propagate to `main`.
//!
//! Malformed viewport snapshots are not errors at all: the exposure tracker
//! normalizes them (see `state::exposure`).

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::io;
use thiserror::Error;

/// Failure of a single page fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The backing source could not produce the page.
    ///
    /// The mock source raises this for injected failures; a network-backed
    /// source would map transport errors here.
    #[error("Page {page} unavailable: {reason}")]
    Unavailable {
        /// Page index that failed.
        page: u32,
        /// Human-readable cause.
        reason: String,
    },

    /// No completion arrived within the watchdog timeout.
    ///
    /// Raised by the pagination watchdog, not by fetchers. A completion that
    /// arrives after the timeout is discarded as stale.
    #[error("Page {page} timed out after {timeout_ms}ms")]
    TimedOut {
        /// Page index that timed out.
        page: u32,
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// The fetch worker is gone and cannot deliver completions.
    #[error("Fetch worker disconnected")]
    Disconnected,
}

/// Top-level application error.
///
/// All shell-level error types convert into `AppError` via `From`, so `main`
/// can use `?` throughout.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration file exists but could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Terminal or stdout I/O failure.
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),

    /// Headless output could not be encoded.
    #[error("Output encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
