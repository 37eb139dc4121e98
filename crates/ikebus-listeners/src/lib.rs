//! Concrete passive listeners for the ikebus event bus.
//!
//! - [`StreamLogger`] / [`FileLogger`]: one text line per event, filtered by
//!   per-category [`LevelFilter`] thresholds.
//! - [`TracingListener`]: re-emits events into the `tracing` ecosystem.
//! - [`BroadcastForwarder`]: hands owned [`ForwardedEvent`] copies to
//!   management consumers through a tokio broadcast channel.
//!
//! [`build_listeners`] turns a deserialized [`ListenersConfig`] into
//! listeners ready for `Bus::add_listener`.

mod config;
mod error;
mod filter;
mod forward;
mod stream;
mod tracing_sink;

pub use config::{build_listeners, ListenersConfig};
pub use error::ListenerError;
pub use filter::{FilterConfig, LevelFilter};
pub use forward::{BroadcastForwarder, ForwardedEvent};
pub use stream::{
    FileLogger, FileLoggerConfig, StreamLogger, StreamLoggerConfig, DEFAULT_TIME_FORMAT,
};
pub use tracing_sink::TracingListener;
