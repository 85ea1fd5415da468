//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll the feed up by one line. Default: k/↑
    ScrollUp,
    /// Scroll the feed down by one line. Default: j/↓
    ScrollDown,
    /// Scroll up by one page height. Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one page height. Default: Ctrl+d/Page Down/Space
    PageDown,
    /// Jump to the top of the feed. Default: g/Home
    ScrollToTop,
    /// Jump to the bottom of the loaded feed. Default: G/End
    ScrollToBottom,

    // Feed
    /// Pull-to-refresh: reload page 0 and replace the feed. Default: r
    Refresh,
    /// Retry a failed load-more from the footer. Default: Enter
    RetryFooter,
    /// Ask to delete the topmost visible card. Default: x
    DeleteCard,
    /// Confirm a pending deletion. Default: y
    Confirm,
    /// Dismiss a pending deletion or close the log overlay. Default: n/Esc
    Cancel,

    // Diagnostics
    /// Toggle the exposure log overlay. Default: l
    ToggleLog,
    /// Clear the exposure log. Default: c
    ClearLog,

    // Application
    /// Exit the application. Default: q/Ctrl+c
    Quit,
}
