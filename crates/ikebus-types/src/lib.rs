//! Shared vocabulary for the ikebus event bus.
//!
//! This crate defines everything an event is made of: the closed
//! [`Signal`] enumeration and its [`SignalCategory`] buckets, the
//! [`Level`] verbosity scale, per-thread [`ThreadNum`] identities, the
//! opaque [`SaHandle`] and deferred-rendering [`Message`]s.
//!
//! It holds no locks and performs no I/O, so both the bus and listener
//! implementations can depend on it without pulling each other in.
//!
//! # Signal layout
//!
//! | Range | Signals | Category |
//! |-------|---------|----------|
//! | pseudo | `ANY` | `ANY` |
//! | debug | `DBG_DMN` .. `DBG_LIB` | one per subsystem |
//! | lifecycle | `IKE_UP_START` .. `CHILD_UNROUTE_FAILED` | `ANY` |

mod level;
mod message;
mod sa;
mod signal;
mod thread;

pub use level::{eligible, Level, LevelError};
pub use message::{render, Arg, Message};
pub use sa::{NamedSa, SaHandle, SecurityAssociation};
pub use signal::{classify, Operation, Outcome, ParseSignalError, SaKind, Signal, SignalCategory};
pub use thread::ThreadNum;
