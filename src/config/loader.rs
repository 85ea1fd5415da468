//! Configuration file loading with precedence handling.

use crate::state::{FeedSettings, DEFAULT_LOG_CAPACITY};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FEEDSCOPE_CONFIG";
/// Environment variable overriding `page_size`.
pub const PAGE_SIZE_ENV: &str = "FEEDSCOPE_PAGE_SIZE";
/// Environment variable overriding `fetch_delay_ms`.
pub const FETCH_DELAY_ENV: &str = "FEEDSCOPE_FETCH_DELAY_MS";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/feedscope/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Entries per page.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Load more when the last visible slot is this close to the end.
    #[serde(default)]
    pub load_more_threshold: Option<usize>,

    /// Simulated fetch latency.
    #[serde(default)]
    pub fetch_delay_ms: Option<u64>,

    /// Fail fetches still in flight after this long.
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,

    /// Make every n-th mock fetch fail.
    #[serde(default)]
    pub fail_every: Option<u32>,

    /// Finite mock feed length.
    #[serde(default)]
    pub total_items: Option<usize>,

    /// Event log capacity.
    #[serde(default)]
    pub log_capacity: Option<usize>,

    /// Refresh-failure notice duration.
    #[serde(default)]
    pub notice_ms: Option<u64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Entries per page (>= 1).
    pub page_size: usize,
    /// Load-more trigger distance.
    pub load_more_threshold: usize,
    /// Simulated fetch latency.
    pub fetch_delay_ms: u64,
    /// Watchdog timeout.
    pub fetch_timeout_ms: u64,
    /// Every n-th mock fetch fails.
    pub fail_every: Option<u32>,
    /// Finite mock feed length; `None` is endless.
    pub total_items: Option<usize>,
    /// Event log capacity.
    pub log_capacity: usize,
    /// Notice duration.
    pub notice_ms: u64,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let feed = FeedSettings::default();
        Self {
            page_size: feed.page_size,
            load_more_threshold: feed.load_more_threshold,
            fetch_delay_ms: 1_000,
            fetch_timeout_ms: feed.fetch_timeout_ms,
            fail_every: None,
            total_items: None,
            log_capacity: DEFAULT_LOG_CAPACITY,
            notice_ms: feed.notice_ms,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Feed tunables derived from this config.
    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            page_size: self.page_size,
            load_more_threshold: self.load_more_threshold,
            fetch_timeout_ms: self.fetch_timeout_ms,
            notice_ms: self.notice_ms,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/feedscope/feedscope.log` on Linux, or the
/// platform state directory elsewhere. Falls back to the current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("feedscope").join("feedscope.log")
    } else {
        PathBuf::from("feedscope.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/feedscope/config.toml` on Linux.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("feedscope").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `FEEDSCOPE_CONFIG` environment variable
/// 3. Default path `~/.config/feedscope/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Some(env_path) = std::env::var_os(CONFIG_ENV) {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(format!("{CONFIG_ENV} is empty")));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `FEEDSCOPE_PAGE_SIZE` and `FEEDSCOPE_FETCH_DELAY_MS`. Values that
/// do not parse as numbers are ignored with a warning.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(page_size) = numeric_env::<usize>(PAGE_SIZE_ENV) {
        config.page_size = page_size.max(1);
    }
    if let Some(delay) = numeric_env::<u64>(FETCH_DELAY_ENV) {
        config.fetch_delay_ms = delay;
    }
    config
}

fn numeric_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(name, value = %raw, "Ignoring non-numeric environment override");
            None
        }
    }
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        page_size: config.page_size.unwrap_or(defaults.page_size).max(1),
        load_more_threshold: config
            .load_more_threshold
            .unwrap_or(defaults.load_more_threshold),
        fetch_delay_ms: config.fetch_delay_ms.unwrap_or(defaults.fetch_delay_ms),
        fetch_timeout_ms: config.fetch_timeout_ms.unwrap_or(defaults.fetch_timeout_ms),
        fail_every: config.fail_every.or(defaults.fail_every),
        total_items: config.total_items.or(defaults.total_items),
        log_capacity: config.log_capacity.unwrap_or(defaults.log_capacity).max(1),
        notice_ms: config.notice_ms.unwrap_or(defaults.notice_ms),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// CLI flags that override config values when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--page-size`
    pub page_size: Option<usize>,
    /// `--delay-ms`
    pub fetch_delay_ms: Option<u64>,
    /// `--fail-every`
    pub fail_every: Option<u32>,
    /// `--total-items`
    pub total_items: Option<usize>,
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size.max(1);
    }
    if let Some(delay) = cli.fetch_delay_ms {
        config.fetch_delay_ms = delay;
    }
    if let Some(n) = cli.fail_every {
        config.fail_every = Some(n);
    }
    if let Some(total) = cli.total_items {
        config.total_items = Some(total);
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
