//! View-state layer - grid layout and viewport projection
//!
//! Pure geometry between the feed state and the renderer. Nothing here
//! touches the terminal; the same code drives the TUI and headless mode.
//!
//! # Module Structure
//!
//! - `layout`: FeedLayout - two-column grid placement of cards and footer
//! - `viewport`: FeedViewport - scroll offset, clamping and visibility snapshot

pub mod layout;
pub mod viewport;

pub use layout::{FeedLayout, SlotKind, SlotRect};
pub use viewport::{FeedViewport, ViewportProjection};
