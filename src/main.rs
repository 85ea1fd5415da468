//! feedscope - Entry Point

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// feedscope - infinite feed with viewport exposure tracking
#[derive(Parser, Debug)]
#[command(name = "feedscope")]
#[command(version)]
#[command(about = "Scrollable card feed that logs per-item viewport exposure")]
pub struct Args {
    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Entries per page
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub page_size: Option<u64>,

    /// Simulated fetch latency in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Make every N-th fetch fail
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub fail_every: Option<u32>,

    /// Stop the feed after this many entries
    #[arg(long)]
    pub total_items: Option<usize>,

    /// Run without a terminal UI and print events to stdout
    #[arg(long)]
    pub headless: bool,

    /// Number of simulation steps in headless mode
    #[arg(long, default_value = "50")]
    pub steps: usize,

    /// Virtual milliseconds per headless step
    #[arg(long, default_value = "100")]
    pub step_ms: u64,

    /// Print headless events as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    fn overrides(&self) -> feedscope::config::CliOverrides {
        feedscope::config::CliOverrides {
            page_size: self
                .page_size
                .map(|n| usize::try_from(n).unwrap_or(usize::MAX)),
            fetch_delay_ms: self.delay_ms,
            fail_every: self.fail_every,
            total_items: self.total_items,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = feedscope::config::load_config_with_precedence(args.config.clone())?;
        let merged = feedscope::config::merge_config(config_file);
        let with_env = feedscope::config::apply_env_overrides(merged);
        feedscope::config::apply_cli_overrides(with_env, args.overrides())
    };

    feedscope::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let log = feedscope::state::EventLog::shared(config.log_capacity);

    if args.headless {
        let options = feedscope::headless::HeadlessOptions {
            steps: args.steps,
            step_ms: args.step_ms,
            json: args.json,
            ..feedscope::headless::HeadlessOptions::default()
        };
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        feedscope::headless::run(&config, log, &options, &mut out)?;
        return Ok(());
    }

    feedscope::view::run_with_config(&config, log)?;

    Ok(())
}
