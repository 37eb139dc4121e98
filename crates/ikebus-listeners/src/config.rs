//! Listener configuration and construction.

use std::sync::Arc;

use ikebus_core::BusListener;
use serde::Deserialize;

use crate::error::ListenerError;
use crate::filter::{FilterConfig, LevelFilter};
use crate::stream::{FileLogger, FileLoggerConfig, StreamLogger, StreamLoggerConfig};
use crate::tracing_sink::TracingListener;

/// Which listeners to install on the bus.
///
/// ```toml
/// [[listeners.files]]
/// path = "/var/log/charon.log"
/// default_level = 1
/// levels = { knl = 2, enc = -1 }
///
/// [listeners.stderr]
/// default_level = 0
///
/// [listeners.tracing]
/// default_level = 2
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListenersConfig {
    /// File loggers, one per entry.
    #[serde(default)]
    pub files: Vec<FileLoggerConfig>,

    /// Logger on standard error.
    #[serde(default)]
    pub stderr: Option<StreamLoggerConfig>,

    /// Forwarding into `tracing`.
    #[serde(default)]
    pub tracing: Option<FilterConfig>,
}

/// Builds every configured listener, in the order files, stderr, tracing.
///
/// An empty `time_format` disables timestamps.
///
/// # Errors
///
/// Returns `ListenerError::Open` if a log file cannot be opened.
pub fn build_listeners(config: &ListenersConfig) -> Result<Vec<Arc<dyn BusListener>>, ListenerError> {
    let mut listeners: Vec<Arc<dyn BusListener>> = Vec::new();

    for file in &config.files {
        let logger = FileLogger::open(&file.path, file.append, LevelFilter::from(&file.filter))?;
        listeners.push(Arc::new(with_time(logger, file.time_format.as_deref())));
        tracing::debug!(path = %file.path.display(), "configured file logger");
    }

    if let Some(stderr) = &config.stderr {
        let logger = StreamLogger::new("stderr", std::io::stderr(), LevelFilter::from(&stderr.filter));
        listeners.push(Arc::new(with_time(logger, stderr.time_format.as_deref())));
    }

    if let Some(filter) = &config.tracing {
        listeners.push(Arc::new(TracingListener::new(LevelFilter::from(filter))));
    }

    Ok(listeners)
}

fn with_time<W>(logger: StreamLogger<W>, format: Option<&str>) -> StreamLogger<W>
where
    W: std::io::Write + Send + 'static,
{
    match format {
        Some(format) if !format.is_empty() => logger.with_time_format(format),
        _ => logger,
    }
}
