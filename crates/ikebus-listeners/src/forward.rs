//! Management-channel forwarding over a tokio broadcast channel.

use chrono::{DateTime, Utc};
use ikebus_core::{BusListener, Event, Level, Signal};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::filter::LevelFilter;

/// Owned, serializable copy of an event for consumers outside the bus,
/// such as a control socket or an SSE stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForwardedEvent {
    /// Kind of the event.
    pub signal: Signal,
    /// Verbosity.
    pub level: Level,
    /// Emitting thread number.
    pub thread: u32,
    /// Bound SA as `name[id]`, if any.
    pub sa: Option<String>,
    /// Rendered message.
    pub message: String,
    /// Emission time.
    pub emitted_at: DateTime<Utc>,
}

impl From<&Event> for ForwardedEvent {
    fn from(event: &Event) -> Self {
        Self {
            signal: event.signal,
            level: event.level,
            thread: event.thread.get(),
            sa: event.sa.as_ref().map(ToString::to_string),
            message: event.text().to_string(),
            emitted_at: event.emitted_at,
        }
    }
}

/// Publishes accepted events to every current broadcast subscriber.
///
/// Never blocks the emitter. With no subscribers the event is discarded;
/// a subscriber that falls more than `capacity` events behind loses the
/// oldest ones and sees a lag error on its next receive.
pub struct BroadcastForwarder {
    filter: LevelFilter,
    tx: broadcast::Sender<ForwardedEvent>,
}

impl BroadcastForwarder {
    /// Creates a forwarder with its own channel of `capacity` slots.
    pub fn new(capacity: usize, filter: LevelFilter) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { filter, tx }
    }

    /// Subscribes to events forwarded from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ForwardedEvent> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl BusListener for BroadcastForwarder {
    fn signal(&self, event: &Event) {
        if self.tx.receiver_count() == 0 || !self.filter.allows(event) {
            return;
        }
        // Only fails when every receiver dropped in the meantime.
        let _ = self.tx.send(ForwardedEvent::from(event));
    }

    fn name(&self) -> &str {
        "broadcast"
    }
}
