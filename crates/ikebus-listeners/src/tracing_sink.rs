//! Forwards bus events into `tracing`.

use ikebus_core::{BusListener, Event, Level};

use crate::filter::LevelFilter;

/// Re-emits accepted events as `tracing` events under the `ikebus` target.
///
/// Levels 0 and 1 map to INFO, 2 to DEBUG, 3 and 4 to TRACE. The signal,
/// emitting thread and SA travel as structured fields.
pub struct TracingListener {
    filter: LevelFilter,
}

impl TracingListener {
    /// Creates a forwarder with the given filter.
    pub fn new(filter: LevelFilter) -> Self {
        Self { filter }
    }
}

impl BusListener for TracingListener {
    fn signal(&self, event: &Event) {
        if !self.filter.allows(event) {
            return;
        }
        let sa = event.sa.as_ref().map(ToString::to_string);
        let sa = sa.as_deref().unwrap_or("-");
        let signal = event.signal.as_str();
        let thread = event.thread.get();
        let message = event.text();

        if event.level <= Level::CTRL {
            tracing::info!(target: "ikebus", signal, thread, sa, "{message}");
        } else if event.level == Level::CTRLMORE {
            tracing::debug!(target: "ikebus", signal, thread, sa, "{message}");
        } else {
            tracing::trace!(target: "ikebus", signal, thread, sa, "{message}");
        }
    }

    fn name(&self) -> &str {
        "tracing"
    }
}
