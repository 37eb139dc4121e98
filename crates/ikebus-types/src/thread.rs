//! Numeric thread identities.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_THREAD_NUM: AtomicU32 = AtomicU32::new(1);

thread_local! {
    static THREAD_NUM: ThreadNum = ThreadNum(NEXT_THREAD_NUM.fetch_add(1, Ordering::Relaxed));
}

/// Process-wide number of an OS thread.
///
/// Assigned on first use, starting at 1, and never reused within the
/// process, so a number cannot alias a later thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ThreadNum(u32);

impl ThreadNum {
    /// Returns the number of the calling thread.
    pub fn current() -> Self {
        THREAD_NUM.with(|num| *num)
    }

    /// Returns the raw value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ThreadNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}", self.0)
    }
}
