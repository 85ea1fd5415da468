//! feedscope
//!
//! An infinitely scrollable card feed with per-item viewport exposure
//! tracking.
//!
//! The pure core (`model`, `state`, `view_state`) never reads a clock or
//! touches the terminal: hosts pass timestamps and viewport snapshots in
//! and get events and fetch tickets back. The impure shell (`view`,
//! `headless`, `source::worker`, `logging`) drives it.

pub mod clock;
pub mod config;
pub mod headless;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view;
pub mod view_state;
