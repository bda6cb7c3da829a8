// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Logging subscriber setup.

use std::io;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// How the host process wants profiler logs rendered.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Level used when neither RUST_LOG nor a filter directive is set.
    pub default_level: Level,

    /// Emit enter/close lines for `tracing` spans.
    pub include_span_events: bool,

    pub include_file_line: bool,

    pub include_target: bool,

    pub ansi_colors: bool,

    /// One line per event instead of the multi-line pretty format.
    pub compact: bool,

    /// Filter directive such as `ticks=debug`. Takes precedence over RUST_LOG.
    pub filter_directive: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            include_span_events: false,
            include_file_line: false,
            include_target: true,
            ansi_colors: true,
            compact: true,
            filter_directive: None,
        }
    }
}

impl TelemetryConfig {
    /// Span open/close debug lines with source locations.
    pub fn development() -> Self {
        Self {
            default_level: Level::DEBUG,
            include_span_events: true,
            include_file_line: true,
            compact: false,
            ..Self::default()
        }
    }

    /// Warnings and failed finalizes only.
    pub fn production() -> Self {
        Self {
            default_level: Level::WARN,
            include_target: false,
            ansi_colors: false,
            ..Self::default()
        }
    }

    /// Everything this crate logs, uncoloured for captured test output.
    pub fn testing() -> Self {
        Self {
            default_level: Level::TRACE,
            include_file_line: true,
            ansi_colors: false,
            compact: false,
            filter_directive: Some("ticks=trace".to_string()),
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter_directive = Some(filter.into());
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi_colors = ansi;
        self
    }

    /// Filter to install: the directive if it parses, then RUST_LOG, then the default level.
    pub fn env_filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.default_level.to_string());
        match &self.filter_directive {
            Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|_| fallback()),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback()),
        }
    }
}

/// Keeps the installed subscriber's lifetime tied to the host's `main`.
pub struct TelemetryGuard {
    _private: (),
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        // Nothing is buffered yet; flush writers here once a non-blocking one is added.
    }
}

/// Install the global `tracing` subscriber.
///
/// Fails if a global subscriber is already set.
///
/// ```rust,ignore
/// use ticks::telemetry::{init_telemetry, TelemetryConfig};
///
/// let _guard = init_telemetry(&TelemetryConfig::development())?;
/// ```
pub fn init_telemetry(config: &TelemetryConfig) -> io::Result<TelemetryGuard> {
    let filter = config.env_filter();

    let span_events = if config.include_span_events {
        FmtSpan::ENTER | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let fmt_layer = fmt::layer()
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .with_file(config.include_file_line)
        .with_line_number(config.include_file_line)
        .with_span_events(span_events);

    let result = if config.compact {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.compact())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
    };
    result.map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    Ok(TelemetryGuard { _private: () })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let default = TelemetryConfig::default();
        assert_eq!(default.default_level, Level::INFO);
        assert!(default.compact);

        let dev = TelemetryConfig::development();
        assert_eq!(dev.default_level, Level::DEBUG);
        assert!(dev.include_span_events);
        assert!(dev.ansi_colors);

        let prod = TelemetryConfig::production();
        assert_eq!(prod.default_level, Level::WARN);
        assert!(!prod.include_target);

        let test = TelemetryConfig::testing();
        assert_eq!(test.filter_directive.as_deref(), Some("ticks=trace"));
        assert!(!test.ansi_colors);
    }

    #[test]
    fn test_builder_methods() {
        let config = TelemetryConfig::default()
            .with_level(Level::DEBUG)
            .with_filter("ticks::profiling=debug")
            .with_ansi(false);

        assert_eq!(config.default_level, Level::DEBUG);
        assert_eq!(
            config.filter_directive.as_deref(),
            Some("ticks::profiling=debug")
        );
        assert!(!config.ansi_colors);
    }

    #[test]
    fn test_env_filter_uses_directive() {
        let filter = TelemetryConfig::default().with_filter("ticks=warn").env_filter();
        assert_eq!(filter.to_string(), "ticks=warn");
    }

    #[derive(Clone, Default)]
    struct CapturedOutput(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl io::Write for CapturedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_guard_drop_is_silent() {
        let output = CapturedOutput::default();
        let writer = output.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            drop(TelemetryGuard { _private: () });
        });

        assert!(output.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_second_init_fails() {
        let config = TelemetryConfig::testing();
        let first = init_telemetry(&config);
        let second = init_telemetry(&config);
        // Another test may have installed a subscriber first.
        assert!(first.is_err() || second.is_err());
    }
}
