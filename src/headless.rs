//! Headless simulation.
//!
//! Drives the same feed core as the TUI without a terminal: a virtual clock
//! advances in fixed steps, the viewport scrolls down a few lines per step,
//! and fetches complete synchronously once their simulated latency has
//! elapsed. Every exposure event is written to the output as it happens,
//! either as a plain log line or as one JSON object per line.

use crate::config::ResolvedConfig;
use crate::model::{AppError, ExposureEvent, Timestamp};
use crate::source::{FetchCompletion, MockFeed, MockFeedConfig};
use crate::state::{FeedState, FetchTicket, SharedEventLog};
use crate::view_state::{FeedLayout, FeedViewport};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info};

/// Knobs for a headless run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessOptions {
    /// Number of simulation steps.
    pub steps: usize,
    /// Virtual time per step.
    pub step_ms: u64,
    /// Lines scrolled down per step.
    pub scroll_lines: usize,
    /// Simulated viewport height.
    pub viewport_height: u16,
    /// Emit JSON lines instead of text.
    pub json: bool,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            steps: 50,
            step_ms: 100,
            scroll_lines: 2,
            viewport_height: 24,
            json: false,
        }
    }
}

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeadlessSummary {
    /// Steps executed.
    pub steps: usize,
    /// Entries in the store at the end.
    pub items: usize,
    /// `Exposed` events emitted.
    pub exposed: usize,
    /// `FullyVisible` events emitted.
    pub fully_visible: usize,
    /// `Hidden` events emitted (including the final flush).
    pub hidden: usize,
}

impl HeadlessSummary {
    fn count(&mut self, event: &ExposureEvent) {
        match event {
            ExposureEvent::Exposed { .. } => self.exposed += 1,
            ExposureEvent::FullyVisible { .. } => self.fully_visible += 1,
            ExposureEvent::Hidden { .. } => self.hidden += 1,
        }
    }
}

#[derive(Serialize)]
struct Record<'a> {
    at_ms: u64,
    #[serde(flatten)]
    event: &'a ExposureEvent,
}

struct Simulation<'w, W: Write> {
    feed: FeedState,
    source: MockFeed,
    layout: FeedLayout,
    viewport: FeedViewport,
    pending: Option<(FetchTicket, Timestamp)>,
    delay_ms: u64,
    json: bool,
    out: &'w mut W,
    summary: HeadlessSummary,
}

impl<W: Write> Simulation<'_, W> {
    fn issue(&mut self, ticket: FetchTicket, now: Timestamp) {
        debug!(generation = ticket.generation, page = ticket.page, "Headless fetch issued");
        self.pending = Some((ticket, now.saturating_add_millis(self.delay_ms)));
    }

    fn complete_due(&mut self, now: Timestamp) {
        let Some((ticket, due)) = self.pending else {
            return;
        };
        if due > now {
            return;
        }
        self.pending = None;
        let completion = FetchCompletion::run(&mut self.source, ticket);
        self.feed.apply_completion(completion, now);
    }

    fn relayout(&mut self) {
        self.layout = FeedLayout::compute(self.feed.store(), self.feed.footer());
        self.viewport.clamp(&self.layout);
    }

    fn emit(&mut self, events: &[ExposureEvent], now: Timestamp) -> Result<(), AppError> {
        for event in events {
            self.summary.count(event);
            if self.json {
                serde_json::to_writer(
                    &mut *self.out,
                    &Record {
                        at_ms: now.as_millis(),
                        event,
                    },
                )?;
                writeln!(self.out)?;
            } else {
                writeln!(self.out, "{:>8}ms  {event}", now.as_millis())?;
            }
        }
        Ok(())
    }

    fn step(&mut self, now: Timestamp, scroll_lines: usize) -> Result<(), AppError> {
        self.complete_due(now);
        self.feed.check_watchdog(now);
        self.relayout();

        let delta = isize::try_from(scroll_lines).unwrap_or(isize::MAX);
        self.viewport.scroll_by(delta, &self.layout);
        let projection = self.viewport.project(&self.layout, self.feed.store());
        if let Some(last_visible) = projection.last_visible {
            let dy = i32::try_from(scroll_lines).unwrap_or(i32::MAX);
            if let Some(ticket) = self.feed.on_scrolled(dy, last_visible, now) {
                self.issue(ticket, now);
                self.relayout();
            }
        }

        let projection = self.viewport.project(&self.layout, self.feed.store());
        let events = self.feed.observe(&projection.samples, now);
        self.emit(&events, now)
    }
}

/// Run a headless session and write events to `out`.
///
/// At the end every still-visible entry is flushed with a `Hidden` event so
/// dwell totals are reported. Plain output ends with a `#` summary line.
///
/// # Errors
///
/// Returns [`AppError`] if writing to `out` fails.
pub fn run<W: Write>(
    config: &ResolvedConfig,
    log: SharedEventLog,
    options: &HeadlessOptions,
    out: &mut W,
) -> Result<HeadlessSummary, AppError> {
    info!(steps = options.steps, json = options.json, "Starting headless run");
    let mut sim = Simulation {
        feed: FeedState::new(config.feed_settings(), log),
        source: MockFeed::new(MockFeedConfig {
            page_size: config.page_size,
            total_items: config.total_items,
            fail_every: config.fail_every,
        }),
        layout: FeedLayout::default(),
        viewport: FeedViewport::new(options.viewport_height),
        pending: None,
        delay_ms: config.fetch_delay_ms,
        json: options.json,
        out,
        summary: HeadlessSummary::default(),
    };

    let mut now = Timestamp::ZERO;
    let ticket = sim.feed.refresh(now);
    sim.issue(ticket, now);

    for _ in 0..options.steps {
        now = now.saturating_add_millis(options.step_ms);
        sim.step(now, options.scroll_lines)?;
        sim.summary.steps += 1;
    }

    let flushed = sim.feed.observe(&[], now);
    sim.emit(&flushed, now)?;

    sim.summary.items = sim.feed.store().len();
    let summary = sim.summary;
    if !options.json {
        writeln!(
            sim.out,
            "# steps={} items={} exposed={} fully_visible={} hidden={}",
            summary.steps, summary.items, summary.exposed, summary.fully_visible, summary.hidden
        )?;
    }
    info!(?summary, "Headless run finished");
    Ok(summary)
}
