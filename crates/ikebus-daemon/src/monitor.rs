//! The monitor thread: an active listener that reports what it pulls.

use std::io;
use std::thread::{self, JoinHandle};

use ikebus_core::Bus;

use crate::config::MonitorConfig;

/// Spawns the monitor on its own OS thread.
///
/// The thread joins the bus's must-wait set and logs each event it pulls
/// until the bus is torn down. Joining the handle yields the number of
/// events it reported.
///
/// # Errors
///
/// Returns the I/O error if the thread cannot be spawned.
pub fn spawn_monitor(bus: Bus, config: &MonitorConfig) -> io::Result<JoinHandle<usize>> {
    let lifecycle_only = config.lifecycle_only;
    thread::Builder::new()
        .name("bus-monitor".to_string())
        .spawn(move || run(&bus, lifecycle_only))
}

fn run(bus: &Bus, lifecycle_only: bool) -> usize {
    let guard = bus.listen();
    tracing::debug!(thread = %bus.context().thread, "monitor listening");

    let mut reported = 0;
    for event in guard.events() {
        if lifecycle_only && !event.signal.is_lifecycle() {
            continue;
        }
        let sa = event.sa.as_ref().map(ToString::to_string);
        tracing::info!(
            target: "ikebus::monitor",
            signal = event.signal.as_str(),
            sa = sa.as_deref().unwrap_or("-"),
            "{}",
            event.text()
        );
        reported += 1;
    }

    tracing::debug!(reported, "monitor released");
    reported
}
