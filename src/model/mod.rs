//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod exposure_event;
pub mod feed_entry;
pub mod footer;
pub mod identifiers;
pub mod key_action;

// Re-export for convenience
pub use error::{AppError, FetchError};
pub use exposure_event::{ExposureEvent, ViewportSample};
pub use feed_entry::{CardKind, FeedEntry, ImageSource, LayoutSpan};
pub use footer::FooterStatus;
pub use identifiers::{InvalidItemId, ItemId, Timestamp};
pub use key_action::KeyAction;
