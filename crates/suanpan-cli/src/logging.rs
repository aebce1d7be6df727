//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Diagnostics go to stderr so they never mix with lesson output on stdout.
//!
//! # Log Levels
//!
//! - `error`: failures that end the command
//! - `warn`: hint fallbacks, ignored input
//! - `info`: questions posed, teaching started
//! - `debug`: generated lessons, checked answers
//! - `trace`: every recorded step

use std::io;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::Verbosity;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Single-line human-readable output
    #[default]
    Compact,
    /// Multi-line human-readable output
    Pretty,
    /// JSON lines for machine parsing
    Json,
}

/// Configuration for logging behavior
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level for this workspace's crates
    pub level: Level,
    /// Output format
    pub format: LogFormat,
    /// Whether to use ANSI colors
    pub with_ansi: bool,
    /// Whether to include timestamps
    pub with_timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::default(),
            with_ansi: true,
            with_timestamps: false,
        }
    }
}

impl LogConfig {
    /// Level from the CLI verbosity.
    ///
    /// - quiet: error
    /// - normal: warn
    /// - `-v`: info
    /// - `-vv`: debug
    /// - `-vvv` and up: trace
    ///
    /// With no `-v` flags a verbosity from the config file decides.
    #[must_use]
    pub fn from_verbosity(verbosity: Verbosity, count: u8) -> Self {
        let level = match (verbosity, count) {
            (Verbosity::Quiet, _) => Level::ERROR,
            (Verbosity::Normal, 0) => Level::WARN,
            (Verbosity::Verbose, 0) | (_, 1) => Level::INFO,
            (Verbosity::Debug, 0) | (_, 2) => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    /// Set output format
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable ANSI colors
    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }

    /// Enable or disable timestamps
    #[must_use]
    pub fn with_timestamps(mut self, enable: bool) -> Self {
        self.with_timestamps = enable;
        self
    }
}

/// Installs the global subscriber writing to stderr.
///
/// A second call is a no-op.
pub fn init_logging(config: &LogConfig) {
    init_logging_with_writer(config, io::stderr);
}

/// Installs the global subscriber with a custom writer
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = build_env_filter(config.level);
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer).with_target(true))
            .try_init(),
        LogFormat::Compact if config.with_timestamps => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(writer)
                    .with_ansi(config.with_ansi)
                    .with_target(false),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(writer)
                    .with_ansi(config.with_ansi)
                    .with_target(false)
                    .without_time(),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_writer(writer)
                    .with_ansi(config.with_ansi),
            )
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Filter from `RUST_LOG`, or `level` for this workspace and warn elsewhere
fn build_env_filter(level: Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,suanpan={level},suanpan_cli={level}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(
            LogConfig::from_verbosity(Verbosity::Normal, 0).level,
            Level::WARN
        );
        assert_eq!(
            LogConfig::from_verbosity(Verbosity::Verbose, 1).level,
            Level::INFO
        );
        assert_eq!(
            LogConfig::from_verbosity(Verbosity::Debug, 2).level,
            Level::DEBUG
        );
        assert_eq!(
            LogConfig::from_verbosity(Verbosity::Debug, 5).level,
            Level::TRACE
        );
        assert_eq!(
            LogConfig::from_verbosity(Verbosity::Quiet, 3).level,
            Level::ERROR
        );
    }

    #[test]
    fn test_level_from_config_verbosity() {
        assert_eq!(
            LogConfig::from_verbosity(Verbosity::Verbose, 0).level,
            Level::INFO
        );
        assert_eq!(
            LogConfig::from_verbosity(Verbosity::Debug, 0).level,
            Level::DEBUG
        );
    }

    #[test]
    fn test_builders() {
        let config = LogConfig::default()
            .with_format(LogFormat::Json)
            .with_ansi(false)
            .with_timestamps(true);
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.with_ansi);
        assert!(config.with_timestamps);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LogConfig::default().with_ansi(false);
        init_logging_with_writer(&config, io::sink);
        init_logging_with_writer(&config, io::sink);
    }
}
