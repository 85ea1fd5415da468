//! TUI rendering and terminal management (impure shell)

mod card;
mod log_overlay;
mod status_bar;
mod styles;

pub use card::{render_card, render_footer, truncate_to_width, FeedView};
pub use log_overlay::LogOverlay;
pub use status_bar::{StatusBar, StatusMessage};
pub use styles::{ColorConfig, FeedStyles};

use crate::clock::{Clock, MonotonicClock};
use crate::config::{KeyBindings, ResolvedConfig};
use crate::model::{AppError, ItemId, KeyAction};
use crate::source::{FetchCompletion, FetchWorker, MockFeed, MockFeedConfig};
use crate::state::{CompletionEffect, FeedState, FetchTicket, SharedEventLog};
use crate::view_state::{FeedLayout, FeedViewport};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout},
    Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// How often the loop wakes to poll fetches and re-sample the viewport.
const TICK: Duration = Duration::from_millis(100);
/// Lines moved per mouse wheel notch.
const WHEEL_LINES: isize = 3;
/// Lines taken by the status bar.
const STATUS_HEIGHT: u16 = 1;

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Application error
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

/// Card awaiting delete confirmation.
#[derive(Debug, Clone)]
struct PendingDelete {
    position: usize,
    id: ItemId,
    title: String,
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    feed: FeedState,
    layout: FeedLayout,
    viewport: FeedViewport,
    worker: FetchWorker,
    worker_gone: bool,
    clock: Box<dyn Clock>,
    key_bindings: KeyBindings,
    styles: FeedStyles,
    log_visible: bool,
    pending_delete: Option<PendingDelete>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Put the terminal in raw mode on the alternate screen and build the app.
    pub fn new(feed: FeedState, worker: FetchWorker) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(crossterm::event::EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Self::with_parts(terminal, feed, worker, Box::new(MonotonicClock::new()))
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits (q or Ctrl+C).
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.start();

        loop {
            self.draw()?;

            if event::poll(TICK)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize(width, height) => {
                        debug!(width, height, "Terminal resized");
                    }
                    _ => {}
                }
            }

            self.tick();
        }
    }
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Assemble an app from its parts without touching the real terminal.
    pub fn with_parts(
        terminal: Terminal<B>,
        feed: FeedState,
        worker: FetchWorker,
        clock: Box<dyn Clock>,
    ) -> Result<Self, TuiError> {
        let height = terminal.size()?.height.saturating_sub(STATUS_HEIGHT);
        Ok(Self {
            terminal,
            feed,
            layout: FeedLayout::default(),
            viewport: FeedViewport::new(height),
            worker,
            worker_gone: false,
            clock,
            key_bindings: KeyBindings::default(),
            styles: FeedStyles::default(),
            log_visible: false,
            pending_delete: None,
        })
    }

    /// Feed state (read-only).
    pub fn feed(&self) -> &FeedState {
        &self.feed
    }

    /// Terminal, for inspecting the last frame.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Issue the initial refresh.
    pub fn start(&mut self) {
        info!("Starting feed");
        let ticket = self.feed.refresh(self.clock.now());
        self.submit(ticket);
    }

    /// Apply finished fetches and run the watchdog.
    pub fn tick(&mut self) {
        while !self.worker_gone {
            match self.worker.try_recv() {
                Ok(Some(completion)) => self.apply(completion),
                Ok(None) => break,
                Err(error) => {
                    warn!(%error, "Fetch worker stopped; in-flight fetch will time out");
                    self.worker_gone = true;
                }
            }
        }
        if self.feed.check_watchdog(self.clock.now()).is_some() {
            self.relayout();
        }
    }

    fn apply(&mut self, completion: FetchCompletion) {
        let effect = self.feed.apply_completion(completion, self.clock.now());
        if let CompletionEffect::Replaced { .. } = effect {
            self.pending_delete = None;
        }
        self.relayout();
    }

    fn submit(&mut self, ticket: FetchTicket) {
        if let Err(error) = self.worker.submit(ticket) {
            // Settle the ticket right away so the state machine is not stuck.
            let now = self.clock.now();
            self.feed.apply_completion(
                FetchCompletion {
                    ticket,
                    result: Err(error),
                },
                now,
            );
        }
        self.relayout();
    }

    fn relayout(&mut self) {
        self.layout = FeedLayout::compute(self.feed.store(), self.feed.footer());
        self.viewport.clamp(&self.layout);
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };
        debug!(?action, "Key action");

        if action == KeyAction::Quit {
            return true;
        }
        if self.pending_delete.is_some() {
            self.handle_confirm(action);
            return false;
        }
        if self.log_visible {
            match action {
                KeyAction::ToggleLog | KeyAction::Cancel => self.log_visible = false,
                KeyAction::ClearLog => self.feed.log().clear(),
                _ => {}
            }
            return false;
        }

        let page = self.page_lines();
        match action {
            KeyAction::ScrollDown => self.scroll(1),
            KeyAction::ScrollUp => self.scroll(-1),
            KeyAction::PageDown => self.scroll(page),
            KeyAction::PageUp => self.scroll(-page),
            KeyAction::ScrollToTop => {
                self.viewport.scroll_to_top();
            }
            KeyAction::ScrollToBottom => {
                self.relayout();
                self.viewport.scroll_to_bottom(&self.layout);
                self.scrolled(1);
            }
            KeyAction::Refresh => {
                self.viewport.scroll_to_top();
                let ticket = self.feed.refresh(self.clock.now());
                self.submit(ticket);
            }
            KeyAction::RetryFooter => {
                if let Some(ticket) = self.feed.retry_footer(self.clock.now()) {
                    self.submit(ticket);
                }
            }
            KeyAction::DeleteCard => self.request_delete(),
            KeyAction::ToggleLog => self.log_visible = true,
            KeyAction::ClearLog => self.feed.log().clear(),
            KeyAction::Confirm | KeyAction::Cancel | KeyAction::Quit => {}
        }
        false
    }

    /// Lines moved by PageUp/PageDown: one screen minus a line of overlap.
    fn page_lines(&self) -> isize {
        let lines = self.viewport.height().saturating_sub(1).max(1);
        isize::try_from(lines).unwrap_or(isize::MAX)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.pending_delete.is_some() || self.log_visible {
            return;
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll(WHEEL_LINES),
            MouseEventKind::ScrollUp => self.scroll(-WHEEL_LINES),
            _ => {}
        }
    }

    fn scroll(&mut self, delta: isize) {
        self.relayout();
        self.viewport.scroll_by(delta, &self.layout);
        let dy = i32::try_from(delta).unwrap_or(if delta > 0 { i32::MAX } else { i32::MIN });
        self.scrolled(dy);
    }

    /// Forward scroll intent to the load-more trigger.
    ///
    /// `dy` is the requested delta, not the distance moved, so pressing down
    /// at the bottom of a short feed still asks for the next page.
    fn scrolled(&mut self, dy: i32) {
        let projection = self.viewport.project(&self.layout, self.feed.store());
        let Some(last_visible) = projection.last_visible else {
            return;
        };
        if let Some(ticket) = self.feed.on_scrolled(dy, last_visible, self.clock.now()) {
            self.submit(ticket);
        }
    }

    fn request_delete(&mut self) {
        let Some(position) = self.viewport.focused(&self.layout) else {
            return;
        };
        let Some(entry) = self.feed.store().get(position) else {
            return;
        };
        self.pending_delete = Some(PendingDelete {
            position,
            id: entry.id().clone(),
            title: entry.title().to_string(),
        });
    }

    fn handle_confirm(&mut self, action: KeyAction) {
        match action {
            KeyAction::Confirm => {
                let Some(pending) = self.pending_delete.take() else {
                    return;
                };
                // The feed may have changed under the prompt.
                let position = if self
                    .feed
                    .store()
                    .get(pending.position)
                    .is_some_and(|e| e.id() == &pending.id)
                {
                    Some(pending.position)
                } else {
                    self.feed.store().position_of(&pending.id)
                };
                if let Some(position) = position {
                    self.feed.remove_at(position);
                    self.relayout();
                }
            }
            KeyAction::Cancel => self.pending_delete = None,
            _ => {}
        }
    }

    fn status_message(&self) -> StatusMessage {
        if let Some(pending) = &self.pending_delete {
            return StatusMessage::ConfirmDelete(pending.title.clone());
        }
        if let Some(notice) = self.feed.notice(self.clock.now()) {
            return StatusMessage::Notice(notice.to_string());
        }
        StatusMessage::Summary {
            items: self.feed.store().len(),
            visible: self.feed.tracker().visible_len(),
            state: self.feed.pagination().state(),
        }
    }

    /// Sample the viewport, then render the current frame.
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        self.relayout();
        self.viewport
            .set_height(size.height.saturating_sub(STATUS_HEIGHT), &self.layout);

        let projection = self.viewport.project(&self.layout, self.feed.store());
        self.feed.observe(&projection.samples, self.clock.now());

        let status = self.status_message();
        let log_lines = if self.log_visible {
            self.feed.log().lines()
        } else {
            Vec::new()
        };
        let focused = self.viewport.focused(&self.layout);
        let offset = self.viewport.offset();
        let footer = self.feed.footer();
        let store = self.feed.store();
        let layout = &self.layout;
        let styles = &self.styles;
        let log_visible = self.log_visible;

        self.terminal.draw(|frame| {
            let [feed_area, status_area] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)])
                    .areas(frame.area());
            frame.render_widget(
                FeedView::new(layout, store, footer, offset, styles).focused(focused),
                feed_area,
            );
            frame.render_widget(StatusBar::new(&status, styles), status_area);
            if log_visible {
                frame.render_widget(
                    LogOverlay::new(&log_lines, styles),
                    LogOverlay::area(feed_area),
                );
            }
        })?;

        Ok(())
    }
}

/// Initialize and run the TUI application with the resolved configuration.
///
/// Logging must be initialized by caller before calling this function.
pub fn run_with_config(config: &ResolvedConfig, log: SharedEventLog) -> Result<(), TuiError> {
    let source = MockFeed::new(MockFeedConfig {
        page_size: config.page_size,
        total_items: config.total_items,
        fail_every: config.fail_every,
    });
    let worker = FetchWorker::spawn(source, Duration::from_millis(config.fetch_delay_ms))?;
    let feed = FeedState::new(config.feed_settings(), log);
    let mut app = TuiApp::new(feed, worker)?;

    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(crossterm::event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Block until the worker delivers one completion, then apply it.
    fn settle(&mut self) {
        let completion = self
            .worker
            .recv_timeout(Duration::from_secs(5))
            .expect("worker alive")
            .expect("completion within timeout");
        self.apply(completion);
    }
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tests;
