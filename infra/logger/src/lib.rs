//! # Logger
//!
//! Installs the global `tracing` subscriber for Rosetta binaries.
//!
//! Libraries in the workspace only emit events through `tracing` macros; the
//! binary decides where they go. This crate wires a compact console layer, an
//! optional rolling file layer (plain text or JSON) and an [`EnvFilter`] that
//! honours `RUST_LOG` on top of the programmatic default.
//!
//! ## Example
//!
//! ```rust
//! use rosetta_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder()
//!     .name("rosetta")
//!     .level(LevelFilter::DEBUG)
//!     .env_filter("rosetta_translation=trace")
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

#[derive(Debug)]
struct FileSink {
    dir: PathBuf,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

/// A builder for configuring and installing the global tracing subscriber.
#[must_use = "The builder does nothing until .init() is called."]
#[derive(Debug)]
pub struct LoggerBuilder {
    name: Option<String>,
    console: bool,
    stderr: bool,
    level: LevelFilter,
    env_filter: Option<String>,
    file: Option<FileSink>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            name: None,
            console: true,
            stderr: false,
            level: LevelFilter::INFO,
            env_filter: None,
            file: None,
        }
    }
}

impl LoggerBuilder {
    /// Sets the logger name, also used as the rolling file prefix.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Configures the minimum level emitted when no directive matches.
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Adds explicit filter directives (e.g. `rosetta_translation=debug`).
    ///
    /// `RUST_LOG` is ignored when directives are given here.
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables or disables the console layer.
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Sends the console layer to stderr, keeping stdout for command output.
    pub const fn stderr(mut self, enabled: bool) -> Self {
        self.stderr = enabled;
        self
    }

    /// Writes logs into `dir` with daily rotation.
    pub fn file(mut self, dir: impl Into<PathBuf>) -> Self {
        self.file = Some(FileSink {
            dir: dir.into(),
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        });
        self
    }

    /// Overrides the rotation of the file layer. No-op without [`LoggerBuilder::file`].
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        if let Some(sink) = self.file.as_mut() {
            sink.rotation = rotation;
        }
        self
    }

    /// Limits the number of retained log files. No-op without [`LoggerBuilder::file`].
    pub fn max_files(mut self, max: usize) -> Self {
        if let Some(sink) = self.file.as_mut() {
            sink.max_files = max;
        }
        self
    }

    /// Switches the file layer to JSON lines. No-op without [`LoggerBuilder::file`].
    pub fn json(mut self) -> Self {
        if let Some(sink) = self.file.as_mut() {
            sink.json = true;
        }
        self
    }

    /// Consumes the builder and installs the global subscriber.
    ///
    /// The returned [`Logger`] owns the background writer of the file layer and
    /// must stay alive until shutdown, otherwise buffered lines are lost.
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for an empty name, zero
    /// `max_files`, unparsable directives or when no layer is enabled.
    /// Returns [`LoggerError::Subscriber`] if a global subscriber is already set.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.validate()?;
        let filter = self.build_filter()?;

        let mut layers = Vec::new();
        if self.console {
            let console = layer().compact().with_target(true).with_ansi(true);
            layers.push(if self.stderr {
                console.with_writer(std::io::stderr).boxed()
            } else {
                console.boxed()
            });
        }

        let guard = match self.file {
            Some(sink) => {
                fs::create_dir_all(&sink.dir)
                    .context(format!("Failed to create log directory {}", sink.dir.display()))?;

                let appender = RollingFileAppender::builder()
                    .rotation(sink.rotation)
                    .filename_prefix(&name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(sink.max_files)
                    .build(&sink.dir)?;
                let (writer, guard) = tracing_appender::non_blocking(appender);

                let file_layer = layer().with_writer(writer).with_ansi(false);
                layers.push(if sink.json { file_layer.json().boxed() } else { file_layer.boxed() });
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable the console or a log directory.".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;
        tracing::debug!(logger = %name, "Logging initialized");

        Ok(Logger { guard })
    }

    fn validate(&self) -> Result<String, LoggerError> {
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
                context: None,
            });
        }
        if self.file.as_ref().is_some_and(|sink| sink.max_files == 0) {
            return Err(LoggerError::InvalidConfiguration {
                message: "max_files must be greater than zero".into(),
                context: None,
            });
        }
        Ok(name.to_owned())
    }

    fn build_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.env_filter {
            None => Ok(builder.from_env_lossy()),
            Some(directives) => {
                builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                    message: format!("Invalid env filter '{directives}': {e}").into(),
                    context: None,
                })
            },
        }
    }
}

/// A handle to the installed logging system.
#[must_use = "Dropping this handle stops the background log writer."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`].
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Whether a file layer (and therefore a background writer) is active.
    #[must_use]
    pub const fn has_file_sink(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Logging system shutting down, flushing buffers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = Logger::builder().name("rosetta-test");
        assert!(builder.console);
        assert!(!builder.stderr);
        assert_eq!(builder.level, LevelFilter::INFO);
        assert!(builder.file.is_none());
        assert!(builder.env_filter.is_none());
    }

    #[test]
    fn file_options_apply_only_with_a_sink() {
        let builder = Logger::builder().name("rosetta-test").max_files(3).json();
        assert!(builder.file.is_none());

        let builder = Logger::builder().name("rosetta-test").file("logs").max_files(3).json();
        let sink = builder.file.as_ref().expect("file sink");
        assert_eq!(sink.max_files, 3);
        assert!(sink.json);
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Logger::builder().name("   ").init().expect_err("empty name must fail");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn zero_max_files_is_rejected() {
        let err = Logger::builder()
            .name("rosetta-test")
            .file("logs")
            .max_files(0)
            .init()
            .expect_err("zero max files must fail");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn invalid_directive_is_rejected() {
        let err = Logger::builder()
            .name("rosetta-test")
            .env_filter("rosetta=notalevel")
            .init()
            .expect_err("bad directive must fail");
        assert_eq!(err.kind(), "InvalidConfiguration");
    }

    #[test]
    fn no_layers_is_rejected() {
        let err = Logger::builder()
            .name("rosetta-test")
            .console(false)
            .init()
            .expect_err("no layers must fail");
        assert!(err.to_string().contains("No logging layers"));
    }
}
