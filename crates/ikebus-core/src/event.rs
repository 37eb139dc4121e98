//! The immutable record delivered to listeners.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ikebus_types::{Level, Message, SaHandle, Signal, SignalCategory, ThreadNum};

/// One emission, as seen by every listener.
///
/// Built once per eligible `emit` call and shared by reference with passive
/// listeners and by `Arc` with active listeners. Never merged, queued or
/// replayed.
#[derive(Debug)]
pub struct Event {
    /// Kind of the event.
    pub signal: Signal,
    /// Verbosity; never [`Level::SILENT`].
    pub level: Level,
    /// Thread that emitted the event.
    pub thread: ThreadNum,
    /// SA the emitting thread had bound at emission time.
    pub sa: Option<SaHandle>,
    /// Template and arguments, rendered on demand.
    pub message: Message,
    /// When the event was built.
    pub emitted_at: DateTime<Utc>,
}

impl Event {
    pub(crate) fn new(
        signal: Signal,
        level: Level,
        thread: ThreadNum,
        sa: Option<SaHandle>,
        message: Message,
    ) -> Self {
        Self {
            signal,
            level,
            thread,
            sa,
            message,
            emitted_at: Utc::now(),
        }
    }

    /// Category bucket of the signal.
    pub fn category(&self) -> SignalCategory {
        self.signal.category()
    }

    /// Rendered message text.
    pub fn text(&self) -> &str {
        self.message.text()
    }
}

/// Result of a blocking pull.
#[derive(Debug, Clone)]
pub enum Delivery {
    /// The next event this thread had to consume.
    Event(Arc<Event>),
    /// The bus was torn down while waiting.
    Released,
}

impl Delivery {
    /// Signal of the delivered event, or [`Signal::Any`] as the terminal
    /// sentinel once released.
    pub fn signal(&self) -> Signal {
        match self {
            Self::Event(event) => event.signal,
            Self::Released => Signal::Any,
        }
    }

    /// Returns `true` if the bus released this waiter.
    pub fn is_released(&self) -> bool {
        matches!(self, Self::Released)
    }

    /// The delivered event, if any.
    pub fn into_event(self) -> Option<Arc<Event>> {
        match self {
            Self::Event(event) => Some(event),
            Self::Released => None,
        }
    }
}
