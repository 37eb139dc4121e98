//! Daemon configuration loading from file and environment variables.

use ikebus_listeners::ListenersConfig;
use serde::Deserialize;
use thiserror::Error;

/// Top-level daemon configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging settings for the daemon's own diagnostics.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Passive listeners installed on the bus.
    #[serde(default)]
    pub listeners: ListenersConfig,

    /// The active monitor thread.
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "ikebus=trace,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Monitor thread configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Run a thread that pulls every event as an active listener.
    #[serde(default)]
    pub enabled: bool,

    /// Report only SA lifecycle signals.
    #[serde(default = "default_lifecycle_only")]
    pub lifecycle_only: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_lifecycle_only() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            lifecycle_only: default_lifecycle_only(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `IKEBUS_LOG_LEVEL` overrides `logging.level`
/// - `IKEBUS_LOG_JSON` overrides `logging.json` ("true" or "1" to enable)
/// - `IKEBUS_MONITOR` overrides `monitor.enabled` ("true" or "1" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Applies `IKEBUS_*` overrides looked up through `var`.
pub fn apply_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(level) = var("IKEBUS_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("IKEBUS_LOG_JSON") {
        config.logging.json = is_enabled(&json);
    }
    if let Some(monitor) = var("IKEBUS_MONITOR") {
        config.monitor.enabled = is_enabled(&monitor);
    }
}

fn is_enabled(value: &str) -> bool {
    value == "true" || value == "1"
}
