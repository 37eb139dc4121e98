//! Line-oriented loggers writing to files or standard streams.

use std::fmt::Write as _;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use ikebus_core::{BusListener, Event};
use parking_lot::Mutex;
use serde::Deserialize;

use crate::error::ListenerError;
use crate::filter::{FilterConfig, LevelFilter};

/// Default timestamp format, in `chrono` strftime syntax.
pub const DEFAULT_TIME_FORMAT: &str = "%b %e %H:%M:%S";

/// Writes one line per accepted event:
///
/// ```text
/// Mar  3 10:42:17 07[IKE] <home[1]> initiating IKE_SA home[1] to 192.0.2.1
/// ```
///
/// Thread number, category label, then the SA in angle brackets when one
/// was bound. Lines are flushed as they are written.
pub struct StreamLogger<W> {
    name: String,
    filter: LevelFilter,
    time_format: Option<String>,
    out: Mutex<W>,
}

impl<W: Write + Send + 'static> StreamLogger<W> {
    /// Wraps `out` with the given filter and no timestamps.
    pub fn new(name: impl Into<String>, out: W, filter: LevelFilter) -> Self {
        Self {
            name: name.into(),
            filter,
            time_format: None,
            out: Mutex::new(out),
        }
    }

    /// Prefixes each line with the emission time in `format`.
    #[must_use]
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = Some(format.into());
        self
    }

    /// The filter in use.
    pub fn filter(&self) -> &LevelFilter {
        &self.filter
    }

    /// Consumes the logger and returns the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn format_line(&self, event: &Event) -> String {
        let mut line = String::new();
        // Formatting into a String only fails on a bad strftime pattern; the
        // line is still written without the broken part.
        if let Some(format) = &self.time_format {
            let _ = write!(line, "{} ", event.emitted_at.format(format));
        }
        let _ = write!(line, "{}[{}] ", event.thread, event.signal.short_name());
        if let Some(sa) = &event.sa {
            let _ = write!(line, "<{sa}> ");
        }
        line.push_str(event.text());
        line
    }
}

impl<W: Write + Send + 'static> BusListener for StreamLogger<W> {
    fn signal(&self, event: &Event) {
        if !self.filter.allows(event) {
            return;
        }
        let line = self.format_line(event);
        let mut out = self.out.lock();
        if let Err(error) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            tracing::warn!(logger = %self.name, %error, "failed to write log line");
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A [`StreamLogger`] writing to a file.
pub type FileLogger = StreamLogger<File>;

impl FileLogger {
    /// Opens `path` for logging, appending or truncating.
    ///
    /// # Errors
    ///
    /// Returns `ListenerError::Open` if the file cannot be opened.
    pub fn open(path: &Path, append: bool, filter: LevelFilter) -> Result<Self, ListenerError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .map_err(|source| ListenerError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(path.display().to_string(), file, filter))
    }
}

fn default_time_format() -> Option<String> {
    Some(DEFAULT_TIME_FORMAT.to_string())
}

fn default_append() -> bool {
    true
}

/// Configuration of a file logger.
#[derive(Debug, Clone, Deserialize)]
pub struct FileLoggerConfig {
    /// Path of the log file.
    pub path: PathBuf,

    /// Append to an existing file instead of truncating it.
    #[serde(default = "default_append")]
    pub append: bool,

    /// Timestamp format; `None` disables timestamps.
    #[serde(default = "default_time_format")]
    pub time_format: Option<String>,

    /// Level thresholds.
    #[serde(flatten)]
    pub filter: FilterConfig,
}

/// Configuration of the standard error logger.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamLoggerConfig {
    /// Timestamp format; `None` disables timestamps.
    #[serde(default = "default_time_format")]
    pub time_format: Option<String>,

    /// Level thresholds.
    #[serde(flatten)]
    pub filter: FilterConfig,
}

impl Default for StreamLoggerConfig {
    fn default() -> Self {
        Self {
            time_format: default_time_format(),
            filter: FilterConfig::default(),
        }
    }
}
