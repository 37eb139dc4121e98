//! Passive listeners and their synchronous dispatch.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::event::Event;

/// A passive receiver of every eligible event.
///
/// `signal` runs on the emitting thread, inside the emitter's call, before
/// active listeners are served. Implementations should return quickly;
/// a panic propagates to the emitter.
pub trait BusListener: Send + Sync + 'static {
    /// Receives one event.
    fn signal(&self, event: &Event);

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Listener backed by a closure. See [`from_fn`].
pub struct FnListener<F>(F);

impl<F> BusListener for FnListener<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    fn signal(&self, event: &Event) {
        (self.0)(event);
    }

    fn name(&self) -> &str {
        "fn"
    }
}

/// Wraps a closure as a listener.
pub fn from_fn<F>(f: F) -> Arc<FnListener<F>>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    Arc::new(FnListener(f))
}

/// Ordered, append-only listener collection.
#[derive(Default)]
pub(crate) struct Registry {
    listeners: RwLock<Vec<Arc<dyn BusListener>>>,
}

impl Registry {
    /// Appends a listener. Duplicates are kept.
    pub(crate) fn add(&self, listener: Arc<dyn BusListener>) -> usize {
        let mut listeners = self.listeners.write();
        listeners.push(listener);
        listeners.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Invokes every listener once, in registration order.
    ///
    /// Iterates a snapshot so listeners may register further listeners
    /// (seen from the next event on) or emit nested events.
    pub(crate) fn dispatch(&self, event: &Event) {
        let snapshot = self.listeners.read().clone();
        for listener in &snapshot {
            listener.signal(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ikebus_types::{Level, Message, Signal, ThreadNum};
    use parking_lot::Mutex;

    fn event(signal: Signal) -> Event {
        Event::new(
            signal,
            Level::AUDIT,
            ThreadNum::current(),
            None,
            Message::from("test"),
        )
    }

    #[test]
    fn dispatches_in_registration_order() {
        let registry = Registry::default();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            registry.add(from_fn(move |_: &Event| order.lock().push(tag)));
        }

        registry.dispatch(&event(Signal::IkeUpStart));
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn duplicates_are_invoked_twice() {
        let registry = Registry::default();
        let hits = Arc::new(Mutex::new(0));
        let counted = {
            let hits = Arc::clone(&hits);
            from_fn(move |_: &Event| *hits.lock() += 1)
        };

        registry.add(counted.clone());
        registry.add(counted);
        assert_eq!(registry.len(), 2);

        registry.dispatch(&event(Signal::DbgCfg));
        assert_eq!(*hits.lock(), 2);
    }
}
