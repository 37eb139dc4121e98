//! Active-listener coordination: the emission barrier.
//!
//! Threads that want to consume events by pulling join the must-wait set.
//! An emitter snapshots that set, publishes its event into the single
//! in-flight slot together with the snapshot, and sleeps until every thread
//! in the snapshot has taken the event exactly once. Nothing is buffered:
//! the slot holds at most one event and is emptied when its barrier
//! completes.
//!
//! ```text
//!  emitter                       state (Mutex)                 pullers
//!  ───────                       ─────────────                 ───────
//!  snapshot active ────────────► in_flight = { event,
//!  notify_all                                awaiting: S } ◄── take if in S
//!  wait while awaiting != ∅ ◄─── last taker notifies ◄──────── return event
//! ```
//!
//! Pullers hold no lock between pulls. The bus serializes emitters before
//! they reach [`Coordinator::rendezvous`], so the slot is always empty when a
//! barrier starts.

use std::collections::HashSet;
use std::sync::Arc;

use ikebus_types::ThreadNum;
use parking_lot::{Condvar, Mutex};

use crate::event::{Delivery, Event};

struct InFlight {
    seq: u64,
    event: Arc<Event>,
    awaiting: HashSet<ThreadNum>,
}

#[derive(Default)]
struct State {
    active: HashSet<ThreadNum>,
    in_flight: Option<InFlight>,
    next_seq: u64,
    closed: bool,
}

impl State {
    /// Hands the in-flight event to `thread` if it is still owed one.
    ///
    /// Returns the event and whether the barrier just drained.
    fn take(&mut self, thread: ThreadNum) -> Option<(Arc<Event>, bool)> {
        let in_flight = self.in_flight.as_mut()?;
        if !in_flight.awaiting.remove(&thread) {
            return None;
        }
        Some((Arc::clone(&in_flight.event), in_flight.awaiting.is_empty()))
    }

    fn barrier_pending(&self, seq: u64) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|f| f.seq == seq && !f.awaiting.is_empty())
    }
}

/// Must-wait set, in-flight slot and the condition variable both sides
/// sleep on.
#[derive(Default)]
pub(crate) struct Coordinator {
    state: Mutex<State>,
    cond: Condvar,
}

impl Coordinator {
    /// Adds or removes `thread` from the must-wait set.
    ///
    /// Leaving does not retract an in-flight obligation: a thread already in
    /// the current barrier's snapshot still has to take that event. Returns
    /// whether membership changed.
    pub(crate) fn set_active(&self, thread: ThreadNum, active: bool) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        if active {
            state.active.insert(thread)
        } else {
            state.active.remove(&thread)
        }
    }

    pub(crate) fn is_active(&self, thread: ThreadNum) -> bool {
        self.state.lock().active.contains(&thread)
    }

    pub(crate) fn active_count(&self) -> usize {
        self.state.lock().active.len()
    }

    /// Publishes `event` to the current must-wait set and blocks until each
    /// member has pulled it, or until the coordinator is closed.
    ///
    /// `emitter` is left out of the snapshot: it cannot pull while it is
    /// emitting.
    pub(crate) fn rendezvous(&self, event: Arc<Event>, emitter: ThreadNum) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }

        let awaiting: HashSet<ThreadNum> = state
            .active
            .iter()
            .copied()
            .filter(|thread| *thread != emitter)
            .collect();
        if awaiting.is_empty() {
            return;
        }

        debug_assert!(state.in_flight.is_none(), "barriers must not interleave");
        state.next_seq += 1;
        let seq = state.next_seq;
        tracing::trace!(
            seq,
            signal = %event.signal,
            waiters = awaiting.len(),
            "publishing event to active listeners"
        );
        state.in_flight = Some(InFlight {
            seq,
            event,
            awaiting,
        });
        self.cond.notify_all();

        while !state.closed && state.barrier_pending(seq) {
            self.cond.wait(&mut state);
        }

        if state.in_flight.as_ref().is_some_and(|f| f.seq == seq) {
            state.in_flight = None;
        }
        tracing::trace!(seq, released = state.closed, "barrier complete");
    }

    /// Blocks until `thread` is owed an event, then consumes it.
    ///
    /// Returns [`Delivery::Released`] once the coordinator is closed.
    pub(crate) fn pull(&self, thread: ThreadNum) -> Delivery {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return Delivery::Released;
            }
            if let Some((event, drained)) = state.take(thread) {
                if drained {
                    self.cond.notify_all();
                }
                return Delivery::Event(event);
            }
            self.cond.wait(&mut state);
        }
    }

    /// Consumes the in-flight event if `thread` is owed it, without blocking.
    pub(crate) fn try_pull(&self, thread: ThreadNum) -> Option<Arc<Event>> {
        let mut state = self.state.lock();
        if state.closed {
            return None;
        }
        let (event, drained) = state.take(thread)?;
        if drained {
            self.cond.notify_all();
        }
        Some(event)
    }

    /// Releases every waiter, emitter or puller, and refuses further work.
    ///
    /// Returns `false` if already closed.
    pub(crate) fn close(&self) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.closed = true;
        state.in_flight = None;
        state.active.clear();
        self.cond.notify_all();
        true
    }
}
