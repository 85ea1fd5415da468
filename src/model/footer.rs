//! Footer status projected from the pagination state machine.

use serde::Serialize;

/// Status of the synthetic trailing row.
///
/// When anything other than `Hidden`, the footer occupies exactly one slot
/// after the last entry. It is never an exposure subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FooterStatus {
    /// No footer row.
    #[default]
    Hidden,
    /// A load-more fetch is in flight.
    Loading,
    /// The last load-more failed; activating the footer retries.
    Error,
    /// The feed is exhausted.
    NoMore,
}

impl FooterStatus {
    /// Whether the footer occupies a slot in the layout.
    pub fn is_visible(&self) -> bool {
        !matches!(self, FooterStatus::Hidden)
    }

    /// Label shown in the footer row.
    pub fn label(&self) -> &'static str {
        match self {
            FooterStatus::Hidden => "",
            FooterStatus::Loading => "Loading...",
            FooterStatus::Error => "Load failed, press Enter to retry",
            FooterStatus::NoMore => "You've reached the end",
        }
    }
}
