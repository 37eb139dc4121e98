//! The bus facade: emission, registration, active listening and teardown.

use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ikebus_types::{eligible, Arg, Level, Message, SaHandle, Signal, ThreadNum};
use parking_lot::ReentrantMutex;

use crate::context::{ContextStore, ThreadContext};
use crate::coordinator::Coordinator;
use crate::error::BusError;
use crate::event::{Delivery, Event};
use crate::registry::{BusListener, Registry};

struct Inner {
    context: ContextStore,
    registry: Registry,
    coordinator: Coordinator,
    /// Serializes dispatch-then-barrier cycles. Re-entrant so a passive
    /// listener may emit from inside dispatch.
    emission: ReentrantMutex<()>,
    closed: AtomicBool,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.coordinator.close();
    }
}

/// Handle to the daemon's event bus.
///
/// Cloning is cheap; every clone refers to the same bus. Components receive
/// a clone at construction instead of reaching for a global.
#[derive(Clone)]
pub struct Bus {
    inner: Arc<Inner>,
}

impl Bus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                context: ContextStore::new(),
                registry: Registry::default(),
                coordinator: Coordinator::default(),
                emission: ReentrantMutex::new(()),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Registers a passive listener for every eligible event.
    ///
    /// Registration is permanent for the life of the bus.
    ///
    /// # Errors
    ///
    /// Returns `BusError::Closed` after [`Bus::teardown`].
    pub fn add_listener(&self, listener: Arc<dyn BusListener>) -> Result<(), BusError> {
        if self.is_closed() {
            tracing::warn!(listener = listener.name(), "listener registered after teardown");
            return Err(BusError::Closed);
        }
        let name = listener.name().to_string();
        let count = self.inner.registry.add(listener);
        tracing::debug!(listener = %name, count, "registered bus listener");
        Ok(())
    }

    /// Number of registered passive listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.registry.len()
    }

    /// Binds an SA to the calling thread's future emissions, or clears it.
    pub fn bind_sa(&self, sa: Option<SaHandle>) {
        self.inner.context.bind(sa);
    }

    /// The SA bound to the calling thread.
    pub fn current_sa(&self) -> Option<SaHandle> {
        self.inner.context.current()
    }

    /// Snapshot of the calling thread's context on this bus.
    pub fn context(&self) -> ThreadContext {
        let thread = ThreadNum::current();
        ThreadContext {
            thread,
            sa: self.current_sa(),
            active: self.inner.coordinator.is_active(thread),
        }
    }

    /// Joins or leaves the must-wait set for the calling thread.
    ///
    /// While active, the thread must keep calling [`Bus::pull`]; every
    /// emitter blocks until it has taken each event. Leaving does not
    /// cancel an event the thread is already owed.
    pub fn set_active(&self, active: bool) {
        let thread = ThreadNum::current();
        if self.inner.coordinator.set_active(thread, active) {
            tracing::debug!(%thread, active, "active listener state changed");
        }
    }

    /// Whether the calling thread is in the must-wait set.
    pub fn is_active(&self) -> bool {
        self.inner.coordinator.is_active(ThreadNum::current())
    }

    /// Number of threads in the must-wait set.
    pub fn active_count(&self) -> usize {
        self.inner.coordinator.active_count()
    }

    /// Blocks until the next event the calling thread must consume.
    ///
    /// Returns [`Delivery::Released`] once the bus is torn down.
    pub fn pull(&self) -> Delivery {
        self.inner.coordinator.pull(ThreadNum::current())
    }

    /// Consumes the in-flight event if the calling thread is owed it.
    pub fn try_pull(&self) -> Option<Arc<Event>> {
        self.inner.coordinator.try_pull(ThreadNum::current())
    }

    /// Activates the calling thread and returns a guard that pulls on its
    /// behalf and deactivates it on drop.
    pub fn listen(&self) -> ListenGuard {
        self.set_active(true);
        ListenGuard {
            bus: self.clone(),
            _thread_bound: PhantomData,
        }
    }

    /// Raises an event with a template and positional arguments.
    ///
    /// Silent events return at once without building or rendering anything.
    /// Otherwise the call returns only after every passive listener ran and
    /// every active listener in the snapshot pulled the event.
    pub fn emit<T, A>(&self, signal: Signal, level: Level, template: T, args: A)
    where
        T: Into<Cow<'static, str>>,
        A: IntoIterator<Item = Arg>,
    {
        if !eligible(level) || self.is_closed() {
            return;
        }
        self.publish(signal, level, Message::new(template, args.into_iter().collect()));
    }

    /// Raises an event from an already-built message.
    pub fn emit_message(&self, signal: Signal, level: Level, message: Message) {
        if !eligible(level) || self.is_closed() {
            return;
        }
        self.publish(signal, level, message);
    }

    fn publish(&self, signal: Signal, level: Level, message: Message) {
        let _cycle = self.inner.emission.lock();
        if self.is_closed() {
            return;
        }

        let thread = ThreadNum::current();
        let event = Arc::new(Event::new(
            signal,
            level,
            thread,
            self.inner.context.current(),
            message,
        ));

        self.inner.registry.dispatch(&event);
        self.inner.coordinator.rendezvous(event, thread);
    }

    /// Tears the bus down.
    ///
    /// Releases every thread blocked in [`Bus::pull`] or in an emission
    /// barrier; later emissions and registrations are refused. Calling it
    /// again does nothing.
    ///
    /// SA bindings live in each thread's own storage and are left alone;
    /// they are reclaimed when their thread exits.
    pub fn teardown(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.inner.coordinator.close();
        tracing::info!(
            listeners = self.inner.registry.len(),
            "event bus torn down"
        );
    }

    /// Whether [`Bus::teardown`] has run.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("listeners", &self.listener_count())
            .field("active", &self.active_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Active-listener registration for the thread that created it.
///
/// Dropping the guard leaves the must-wait set and acknowledges any event
/// the thread is still owed, so a listener that stops early never stalls an
/// emitter.
pub struct ListenGuard {
    bus: Bus,
    // Membership is keyed by thread; the guard must stay on its thread.
    _thread_bound: PhantomData<*const ()>,
}

impl ListenGuard {
    /// Blocks for the next event. See [`Bus::pull`].
    pub fn pull(&self) -> Delivery {
        self.bus.pull()
    }

    /// Iterates over pulled events until the bus is torn down.
    pub fn events(&self) -> impl Iterator<Item = Arc<Event>> + '_ {
        std::iter::from_fn(move || self.pull().into_event())
    }
}

impl Drop for ListenGuard {
    fn drop(&mut self) {
        self.bus.set_active(false);
        let _ = self.bus.try_pull();
    }
}
