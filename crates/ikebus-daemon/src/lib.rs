//! Daemon wiring for the IKE event bus.
//!
//! Loads configuration, installs the configured listeners on a fresh
//! [`Bus`](ikebus_core::Bus) and optionally runs a monitor thread that
//! takes part in every emission barrier.

pub mod config;
pub mod monitor;

use ikebus_core::Bus;
use ikebus_listeners::{build_listeners, ListenerError};
use thiserror::Error;

pub use config::{load_config, Config, ConfigError, LoggingConfig, MonitorConfig};
pub use monitor::spawn_monitor;

/// Errors that stop the daemon from starting.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A configured listener could not be built.
    #[error(transparent)]
    Listener(#[from] ListenerError),

    /// The monitor thread could not be spawned.
    #[error("failed to spawn monitor thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Builds a bus with every listener from `config` registered.
///
/// # Errors
///
/// Returns `DaemonError::Listener` if a listener cannot be built.
pub fn build_bus(config: &Config) -> Result<Bus, DaemonError> {
    let bus = Bus::new();
    for listener in build_listeners(&config.listeners)? {
        // A fresh bus is never closed.
        let _ = bus.add_listener(listener);
    }
    tracing::info!(listeners = bus.listener_count(), "event bus ready");
    Ok(bus)
}
