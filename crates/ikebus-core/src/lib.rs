//! The ikebus event bus.
//!
//! Worker threads of the IKE daemon report SA lifecycle changes and
//! leveled debug output through a shared [`Bus`]. Two kinds of consumers
//! are served:
//!
//! - **Passive listeners** ([`BusListener`]) are called synchronously on the
//!   emitting thread, in registration order.
//! - **Active listeners** are threads that call [`Bus::set_active`] and then
//!   loop on [`Bus::pull`]. An emitter does not return until every thread
//!   that was active when the emission began has pulled that exact event,
//!   so a thread that keeps pulling never misses one.
//!
//! Only one emission is in flight at a time. Events at
//! [`Level::SILENT`] are dropped before anything is built.
//!
//! # Caller discipline
//!
//! A thread that turns active and then stops pulling blocks every later
//! emitter. The bus cannot detect this; use [`Bus::listen`], whose guard
//! leaves the must-wait set when dropped, or call [`Bus::teardown`] to
//! release everyone.
//!
//! A thread cannot pull while it waits to emit. Emissions are serialized,
//! so if two active threads emit at the same time, the one holding the
//! emission waits for the other to pull, and the other waits for the
//! emission to finish: both hang. Keep emitting threads out of the
//! must-wait set; a dedicated listener thread that only pulls is safe.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ikebus_core::{sig, Bus, Signal};
//!
//! let bus = Bus::new();
//! bus.add_listener(ikebus_core::from_fn(|event| println!("{}", event.text())))?;
//! bus.bind_sa(Some(sa.clone()));
//! sig!(bus, Signal::IkeUpStart, "initiating %s", &sa);
//! bus.bind_sa(None);
//! ```

mod bus;
mod context;
mod coordinator;
mod error;
mod event;
mod macros;
mod registry;

pub use bus::{Bus, ListenGuard};
pub use context::ThreadContext;
pub use error::BusError;
pub use event::{Delivery, Event};
pub use registry::{from_fn, BusListener, FnListener};

pub use ikebus_types::{
    classify, eligible, render, Arg, Level, LevelError, Message, NamedSa, Operation, Outcome,
    ParseSignalError, SaHandle, SaKind, SecurityAssociation, Signal, SignalCategory, ThreadNum,
};
