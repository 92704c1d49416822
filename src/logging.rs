//! Structured logging setup
//!
//! The library only emits `tracing` events; binaries and tests decide where
//! they go by calling [`init_logging`].
//!
//! # Environment Variables
//!
//! - `DIAGRAM_ENGINE_LOG_LEVEL`: log level (trace|debug|info|warn|error|off)
//! - `DIAGRAM_ENGINE_LOG_FORMAT`: output format (compact|pretty|json)
//! - `RUST_LOG`: standard filter directives, e.g.
//!   `RUST_LOG="info,diagram_engine::blueprint=debug"`

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Single line per event
    Compact,
    /// Multi-line with colors and source locations
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Install the global tracing subscriber
///
/// `level` falls back to `DIAGRAM_ENGINE_LOG_LEVEL`, then `RUST_LOG`, then
/// `info`; `format` falls back to `DIAGRAM_ENGINE_LOG_FORMAT`, then
/// `compact`. Fails if a global subscriber is already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = level
        .map(|s| s.to_string())
        .or_else(|| std::env::var("DIAGRAM_ENGINE_LOG_LEVEL").ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    let log_format = format
        .map(|s| s.to_string())
        .or_else(|| std::env::var("DIAGRAM_ENGINE_LOG_FORMAT").ok())
        .unwrap_or_else(|| "compact".to_string());

    let filter = if log_level == "off" {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let format = LogFormat::from_str(&log_format).map_err(|e| format!("Invalid log format: {}", e))?;

    // Diagnostics go to stderr so rendered markup on stdout stays clean
    match format {
        LogFormat::Compact => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_level(true)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init()?;
        }
        LogFormat::Pretty => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::ACTIVE)
                        .pretty(),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_span_events(FmtSpan::ACTIVE)
                        .json(),
                )
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("compact"), Ok(LogFormat::Compact));
        assert_eq!(LogFormat::from_str("PRETTY"), Ok(LogFormat::Pretty));
        assert_eq!(LogFormat::from_str("json"), Ok(LogFormat::Json));
        assert!(LogFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_variants_parse() {
        for name in LogFormat::variants() {
            assert!(LogFormat::from_str(name).is_ok());
        }
    }
}
