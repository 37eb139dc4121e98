//! Emission shorthands.
//!
//! `sig!` raises an audit-level event; `dbg1!` through `dbg4!` raise debug
//! messages at levels 1 to 4. Arguments go through `Arg::from`.
//!
//! ```rust,ignore
//! sig!(bus, Signal::IkeUpStart, "initiating IKE_SA %s", &sa);
//! dbg2!(bus, Signal::DbgNet, "sending packet: from %s to %s", src, dst);
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __emit {
    ($bus:expr, $signal:expr, $level:expr, $fmt:expr $(, $arg:expr)*) => {{
        let args: ::std::vec::Vec<$crate::Arg> = ::std::vec![$($crate::Arg::from($arg)),*];
        $bus.emit($signal, $level, $fmt, args)
    }};
}

/// Raises a lifecycle or audit event at [`Level::AUDIT`](crate::Level::AUDIT).
#[macro_export]
macro_rules! sig {
    ($bus:expr, $signal:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__emit!($bus, $signal, $crate::Level::AUDIT, $fmt $(, $arg)*)
    };
}

/// Raises a debug message at level 1.
#[macro_export]
macro_rules! dbg1 {
    ($bus:expr, $signal:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__emit!($bus, $signal, $crate::Level::CTRL, $fmt $(, $arg)*)
    };
}

/// Raises a debug message at level 2.
#[macro_export]
macro_rules! dbg2 {
    ($bus:expr, $signal:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__emit!($bus, $signal, $crate::Level::CTRLMORE, $fmt $(, $arg)*)
    };
}

/// Raises a debug message at level 3.
#[macro_export]
macro_rules! dbg3 {
    ($bus:expr, $signal:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__emit!($bus, $signal, $crate::Level::RAW, $fmt $(, $arg)*)
    };
}

/// Raises a debug message at level 4.
#[macro_export]
macro_rules! dbg4 {
    ($bus:expr, $signal:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__emit!($bus, $signal, $crate::Level::PRIVATE, $fmt $(, $arg)*)
    };
}
