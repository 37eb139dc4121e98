//! Per-thread implicit SA context.
//!
//! Each thread keeps its own map of bus id to bound SA in thread-local
//! storage. Only the owning thread ever reads or writes its map, so no
//! locking is needed, and the map is dropped with the thread.
//!
//! Nothing else can reach that map. A binding left in place when its bus
//! is dropped stays in the map, holding its SA handle, until the thread
//! clears it with `bind_sa(None)` or exits. Long-lived workers that
//! outlive a bus should clear their bindings first.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use ikebus_types::{SaHandle, ThreadNum};

static NEXT_BUS_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static BINDINGS: RefCell<HashMap<u64, SaHandle>> = RefCell::new(HashMap::new());
}

/// Thread context store scoped to one bus instance.
///
/// Bus ids are never reused, so a binding left behind by a dropped bus can
/// never attach to another bus's events.
#[derive(Debug)]
pub(crate) struct ContextStore {
    bus_id: u64,
}

impl ContextStore {
    pub(crate) fn new() -> Self {
        Self {
            bus_id: NEXT_BUS_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Binds `sa` to the calling thread, or clears the binding with `None`.
    pub(crate) fn bind(&self, sa: Option<SaHandle>) {
        // Thread-local storage is gone during thread teardown; nothing left to bind then.
        let _ = BINDINGS.try_with(|bindings| {
            let mut bindings = bindings.borrow_mut();
            match sa {
                Some(sa) => {
                    bindings.insert(self.bus_id, sa);
                }
                None => {
                    bindings.remove(&self.bus_id);
                }
            }
        });
    }

    /// The SA bound to the calling thread.
    pub(crate) fn current(&self) -> Option<SaHandle> {
        BINDINGS
            .try_with(|bindings| bindings.borrow().get(&self.bus_id).cloned())
            .ok()
            .flatten()
    }
}

/// Snapshot of the calling thread's view of a bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadContext {
    /// The calling thread.
    pub thread: ThreadNum,
    /// SA bound by this thread, if any.
    pub sa: Option<SaHandle>,
    /// Whether this thread is in the must-wait set.
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ikebus_types::NamedSa;

    #[test]
    fn binding_is_last_write_wins() {
        let store = ContextStore::new();
        assert!(store.current().is_none());

        let first = NamedSa::handle("first", 1);
        let second = NamedSa::handle("second", 2);
        store.bind(Some(first));
        store.bind(Some(second.clone()));
        assert_eq!(store.current(), Some(second));

        store.bind(None);
        assert!(store.current().is_none());
    }

    #[test]
    fn stores_are_independent() {
        let a = ContextStore::new();
        let b = ContextStore::new();
        a.bind(Some(NamedSa::handle("a", 1)));
        assert!(b.current().is_none());
    }

    #[test]
    fn dropped_store_binding_never_reaches_a_new_store() {
        let old = ContextStore::new();
        old.bind(Some(NamedSa::handle("stale", 1)));
        drop(old);

        let fresh = ContextStore::new();
        assert!(fresh.current().is_none());
    }

    #[test]
    fn binding_does_not_cross_threads() {
        let store = std::sync::Arc::new(ContextStore::new());
        store.bind(Some(NamedSa::handle("main", 1)));

        let other = std::sync::Arc::clone(&store);
        let seen = std::thread::spawn(move || other.current())
            .join()
            .expect("thread should not panic");
        assert!(seen.is_none());
        assert!(store.current().is_some());
    }
}
