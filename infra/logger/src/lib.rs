//! # Logger
//!
//! Installs the process-wide `tracing` subscriber for the entitlements service.
//!
//! * Console output is either compact ANSI text (local development) or one JSON object per
//!   line (container log shipping).
//! * An optional rolling file appender writes through a non-blocking worker; the returned
//!   [`Logger`] handle owns the worker guard and must outlive the application.
//! * `RUST_LOG` always wins over the configured level; [`LoggerBuilder::env_filter`] sets a
//!   programmatic default such as `"ent_server=debug,tower_http=info"`.
//!
//! ## Example
//!
//! ```rust
//! # use ent_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder("entitlements")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 7;
const LOG_FILE_SUFFIX: &str = "log";

/// How console records are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug)]
struct FileSink {
    dir: PathBuf,
    rotation: Rotation,
    max_files: usize,
}

/// A builder for configuring and initializing the global tracing subscriber.
#[derive(Debug)]
#[must_use = "The builder must be configured before it can be used to initialize the logger."]
pub struct LoggerBuilder {
    name: String,
    level: LevelFilter,
    format: LogFormat,
    console: bool,
    env_filter: Option<String>,
    file: Option<FileSink>,
}

impl LoggerBuilder {
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Parses a level name (`trace`, `debug`, `info`, `warn`, `error`, `off`).
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for an unknown level name.
    pub fn level_name(mut self, level: &str) -> Result<Self, LoggerError> {
        self.level = level.parse().map_err(|e| LoggerError::InvalidConfiguration {
            message: format!("Unknown log level '{level}': {e}").into(),
            context: None,
        })?;
        Ok(self)
    }

    pub const fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Adds an explicit env filter; `RUST_LOG` is ignored when this is set.
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Also writes plain-text records to daily rolling files under `dir`.
    pub fn file(mut self, dir: impl Into<PathBuf>) -> Self {
        self.file =
            Some(FileSink { dir: dir.into(), rotation: Rotation::DAILY, max_files: DEFAULT_MAX_FILES });
        self
    }

    /// Adjusts rotation of the file sink; no-op without [`LoggerBuilder::file`].
    pub fn rotation(mut self, rotation: Rotation, max_files: usize) -> Self {
        if let Some(sink) = self.file.as_mut() {
            sink.rotation = rotation;
            sink.max_files = max_files;
        }
        self
    }

    /// Consumes the builder and installs the global subscriber.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, bad filter or no enabled sink.
    /// * [`LoggerError::Appender`] when the file sink cannot be created.
    /// * [`LoggerError::Subscriber`] when a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        self.validate()?;
        let filter = self.build_filter()?;

        let mut layers = Vec::new();
        if self.console {
            layers.push(match self.format {
                LogFormat::Compact => layer().compact().with_ansi(true).boxed(),
                LogFormat::Json => layer().json().flatten_event(true).boxed(),
            });
        }

        let guard = match self.file {
            Some(sink) => {
                fs::create_dir_all(&sink.dir).map_err(|e| LoggerError::Internal {
                    message: e.to_string().into(),
                    context: Some(format!("Failed to create {}", sink.dir.display()).into()),
                })?;

                let appender = RollingFileAppender::builder()
                    .rotation(sink.rotation)
                    .filename_prefix(&self.name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(sink.max_files)
                    .build(&sink.dir)
                    .context("Building rolling file appender")?;

                let (writer, guard) = tracing_appender::non_blocking(appender);
                layers.push(layer().with_writer(writer).with_ansi(false).boxed());
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;

        tracing::debug!(name = %self.name, format = ?self.format, "Logger initialized");
        Ok(Logger { guard })
    }

    fn validate(&self) -> Result<(), LoggerError> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
                context: None,
            });
        }
        if !self.console && self.file.is_none() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging sinks enabled. Enable console or file output.".into(),
                context: None,
            });
        }
        if self.file.as_ref().is_some_and(|f| f.max_files == 0) {
            return Err(LoggerError::InvalidConfiguration {
                message: "max_files must be greater than zero".into(),
                context: None,
            });
        }
        Ok(())
    }

    fn build_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.env_filter {
            Some(filter) => builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            }),
            None => Ok(builder.from_env_lossy()),
        }
    }
}

/// A handle to the initialized logging system.
///
/// Holds the non-blocking file worker (if any); drop it only at shutdown.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Starts a builder; `name` prefixes rolling log files (`entitlements.2026-10-19.log`).
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            name: name.into(),
            level: LevelFilter::INFO,
            format: LogFormat::default(),
            console: true,
            env_filter: None,
            file: None,
        }
    }

    #[must_use]
    pub const fn has_file_sink(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = Logger::builder("entitlements");
        assert!(builder.console);
        assert_eq!(builder.level, LevelFilter::INFO);
        assert_eq!(builder.format, LogFormat::Compact);
        assert!(builder.file.is_none());
    }

    #[test]
    fn level_names_parse() -> Result<(), LoggerError> {
        let builder = Logger::builder("entitlements").level_name("debug")?;
        assert_eq!(builder.level, LevelFilter::DEBUG);

        let err = Logger::builder("entitlements").level_name("chatty").expect_err("bad level");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        Ok(())
    }

    #[test]
    fn rotation_applies_only_to_file_sink() {
        let without = Logger::builder("entitlements").rotation(Rotation::HOURLY, 3);
        assert!(without.file.is_none());

        let with = Logger::builder("entitlements").file("/tmp/ent-logs").rotation(Rotation::HOURLY, 3);
        assert_eq!(with.file.as_ref().map(|f| f.max_files), Some(3));
    }

    #[test]
    fn rejects_configurations_without_sinks() {
        let err = Logger::builder("entitlements").console(false).init().expect_err("no sinks");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn rejects_blank_names() {
        let err = Logger::builder("  ").init().expect_err("blank name");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn rejects_bad_filters() {
        let err = Logger::builder("entitlements").env_filter("=[").init().expect_err("bad filter");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}
