//! Exposure log overlay.

use super::styles::FeedStyles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Block, Clear, Paragraph, Widget},
};

/// Popup listing rendered log lines newest first.
pub struct LogOverlay<'a> {
    lines: &'a [String],
    styles: &'a FeedStyles,
}

/// Message part of a `"HH:MM:SS.mmm  <message>"` line.
fn message_of(line: &str) -> &str {
    line.split_once("  ").map_or(line, |(_, message)| message)
}

impl<'a> LogOverlay<'a> {
    /// Overlay over lines from [`EventLog::lines`](crate::state::EventLog::lines).
    pub fn new(lines: &'a [String], styles: &'a FeedStyles) -> Self {
        Self { lines, styles }
    }

    /// Centered rectangle covering most of `area`.
    pub fn area(area: Rect) -> Rect {
        let width = area.width.saturating_sub(4).max(area.width.min(20));
        let height = area.height.saturating_sub(4).max(area.height.min(5));
        Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        )
    }
}

impl Widget for LogOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(
            " Exposure log ({}) | c clear | l close ",
            self.lines.len()
        );
        let block = Block::bordered().title(title);

        let lines: Vec<Line> = if self.lines.is_empty() {
            vec![Line::styled("(empty)", self.styles.dim())]
        } else {
            self.lines
                .iter()
                .take(usize::from(area.height))
                .map(|line| Line::styled(line.as_str(), self.styles.log_line(message_of(line))))
                .collect()
        };

        Clear.render(area, buf);
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EventLog;
    use crate::view::styles::ColorConfig;

    fn render(lines: &[String]) -> String {
        let area = Rect::new(0, 0, 60, 8);
        let mut buf = Buffer::empty(area);
        let styles = FeedStyles::new(ColorConfig::new(false));
        LogOverlay::new(lines, &styles).render(area, &mut buf);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn shows_newest_first_with_count() {
        let log = EventLog::new(10);
        log.append("EXPOSED  id=id_0 pos=0 ratio=0.50");
        log.append("HIDDEN   id=id_0 pos=0 lastRatio=0.50 total=10ms");

        let out = render(&log.lines());

        assert!(out.contains("Exposure log (2)"));
        let hidden = out.find("HIDDEN").expect("hidden line");
        let exposed = out.find("EXPOSED").expect("exposed line");
        assert!(hidden < exposed);
    }

    #[test]
    fn styles_by_message_tag_after_timestamp() {
        assert_eq!(
            message_of("12:00:01.250  HIDDEN   id=id_0"),
            "HIDDEN   id=id_0"
        );
        assert_eq!(message_of("no timestamp"), "no timestamp");
    }

    #[test]
    fn empty_log_says_so() {
        assert!(render(&[]).contains("(empty)"));
    }

    #[test]
    fn overlay_area_fits_inside_screen() {
        let screen = Rect::new(0, 0, 80, 24);
        let popup = LogOverlay::area(screen);
        assert!(popup.width <= screen.width && popup.height <= screen.height);
        assert_eq!(popup.x, 2);

        let tiny = LogOverlay::area(Rect::new(0, 0, 3, 2));
        assert_eq!((tiny.width, tiny.height), (3, 2));
    }
}
