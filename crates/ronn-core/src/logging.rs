//! Structured logging configuration for RONN.
//!
//! Registration, resolution and session bootstrap emit `tracing` events; this
//! module installs the subscriber that renders them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{CoreError, Result};

/// How `tracing` output from registration, resolution and bootstrap is rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Threshold applied when `RUST_LOG` is unset.
    pub level: LogLevel,
    /// Tag each line with the emitting thread, useful for parallel resolution.
    pub thread_ids: bool,
    /// Print file, line and module target.
    pub source_locations: bool,
    /// Log entry to and exit from the bootstrap phase spans.
    pub phase_spans: bool,
    /// Emit one JSON object per event.
    pub json: bool,
}

/// Severity threshold shared by the `tracing` filter and the native logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-kernel registration.
    Trace,
    /// Resolution misses and skipped providers.
    Debug,
    /// Registry installation and session readiness.
    Info,
    /// Warnings.
    Warn,
    /// Errors.
    Error,
}

impl LogLevel {
    /// The matching `tracing::Level`.
    pub fn to_tracing_level(self) -> Level {
        match self {
            Self::Trace => Level::TRACE,
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }

    /// Lowercase name, as accepted by `EnvFilter`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(CoreError::invalid_argument(format!(
                "unknown log level '{other}'"
            ))),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            thread_ids: false,
            source_locations: false,
            phase_spans: false,
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Warn-level plain text output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback threshold.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Tag lines with thread ids.
    pub fn with_thread_ids(mut self, enable: bool) -> Self {
        self.thread_ids = enable;
        self
    }

    /// Switch between JSON and plain text.
    pub fn with_json(mut self, enable: bool) -> Self {
        self.json = enable;
        self
    }

    /// Verbose configuration for tracing kernel resolution during development.
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            thread_ids: true,
            source_locations: true,
            phase_spans: true,
            json: false,
        }
    }

    /// Minimal configuration for log aggregation.
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            thread_ids: false,
            source_locations: false,
            phase_spans: false,
            json: true,
        }
    }
}

/// Install the global subscriber, failing if one is already set.
///
/// `RUST_LOG` takes precedence over `config.level` when present.
pub fn try_init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.level.as_str()))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let span_events = if config.phase_spans {
        FmtSpan::ENTER | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let installed = if config.json {
        let fmt_layer = fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_current_span(true)
            .with_thread_ids(config.thread_ids)
            .with_file(config.source_locations)
            .with_line_number(config.source_locations);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    } else {
        let fmt_layer = fmt::layer()
            .with_span_events(span_events)
            .with_thread_ids(config.thread_ids)
            .with_file(config.source_locations)
            .with_line_number(config.source_locations)
            .with_target(config.source_locations);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    };

    installed.map_err(|e| CoreError::invalid_argument(format!("logging already initialized: {e}")))
}

/// Install the global subscriber, ignoring an already-installed one.
///
/// # Example
///
/// ```no_run
/// use ronn_core::logging::{init_logging, LoggingConfig};
///
/// init_logging(&LoggingConfig::development());
/// ```
pub fn init_logging(config: &LoggingConfig) {
    if let Err(e) = try_init_logging(config) {
        tracing::debug!("{e}");
    }
}
