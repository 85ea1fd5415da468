//! Feed styling configuration.
//!
//! Card borders, footer states, the status bar and the log overlay.

use crate::model::FooterStatus;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Colors are disabled when the `NO_COLOR` environment variable is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Read `NO_COLOR` from the environment.
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Explicit setting.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== FeedStyles =====

/// Styles used by the feed renderer.
#[derive(Debug, Clone)]
pub struct FeedStyles {
    config: ColorConfig,
}

impl FeedStyles {
    /// Styles honoring `config`.
    pub fn new(config: ColorConfig) -> Self {
        Self { config }
    }

    fn fg(&self, color: Color) -> Style {
        if self.config.colors_enabled() {
            Style::default().fg(color)
        } else {
            Style::default()
        }
    }

    /// Card border; the focused card is highlighted.
    pub fn card_border(&self, focused: bool) -> Style {
        if focused {
            self.fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            self.fg(Color::DarkGray)
        }
    }

    /// Card title line.
    pub fn title(&self) -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// Secondary text (body, ids).
    pub fn dim(&self) -> Style {
        self.fg(Color::Gray)
    }

    /// Image placeholder fill.
    pub fn image(&self) -> Style {
        self.fg(Color::Cyan)
    }

    /// Footer text for `status`.
    pub fn footer(&self, status: FooterStatus) -> Style {
        match status {
            FooterStatus::Loading => self.fg(Color::Yellow),
            FooterStatus::Error => self.fg(Color::Red).add_modifier(Modifier::BOLD),
            FooterStatus::NoMore | FooterStatus::Hidden => self.fg(Color::DarkGray),
        }
    }

    /// Status bar background line.
    pub fn status_bar(&self) -> Style {
        if self.config.colors_enabled() {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        }
    }

    /// Transient notice or confirm prompt.
    pub fn alert(&self) -> Style {
        if self.config.colors_enabled() {
            Style::default().bg(Color::Red).fg(Color::White)
        } else {
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
        }
    }

    /// Color for a log line, keyed by its event tag.
    pub fn log_line(&self, message: &str) -> Style {
        let tag = message.split_whitespace().next().unwrap_or_default();
        match tag {
            "EXPOSED" => self.fg(Color::Green),
            "FULL" => self.fg(Color::Cyan),
            "HIDDEN" => self.fg(Color::Magenta),
            "FETCH" | "STALE" => self.fg(Color::Yellow),
            "DELETED" => self.fg(Color::Red),
            _ => Style::default(),
        }
    }
}

impl Default for FeedStyles {
    fn default() -> Self {
        Self::new(ColorConfig::from_env())
    }
}
