//! Error types for listener construction.

use std::path::PathBuf;

/// Errors that can occur while building listeners from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// A log file could not be opened.
    #[error("failed to open log file {path}: {source}")]
    Open {
        /// The configured path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
