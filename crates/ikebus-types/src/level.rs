//! Verbosity levels and the delivery gate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Verbosity of an event, from 0 (audit) to 4 (most verbose), or
/// [`Level::SILENT`].
///
/// Levels order numerically, so a threshold check reads
/// `event.level <= threshold`. `SILENT` sorts below every numbered level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub struct Level(i8);

impl Level {
    /// Never delivered.
    pub const SILENT: Level = Level(-1);
    /// Audit and lifecycle messages.
    pub const AUDIT: Level = Level(0);
    /// Control flow.
    pub const CTRL: Level = Level(1);
    /// More detailed control flow.
    pub const CTRLMORE: Level = Level(2);
    /// Raw data dumps.
    pub const RAW: Level = Level(3);
    /// Dumps that may contain private key material.
    pub const PRIVATE: Level = Level(4);

    /// Builds a level from its numeric value.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::OutOfRange` unless `value` is within `-1..=4`.
    pub fn new(value: i8) -> Result<Self, LevelError> {
        if (-1..=4).contains(&value) {
            Ok(Self(value))
        } else {
            Err(LevelError::OutOfRange(value))
        }
    }

    /// Returns the numeric value.
    pub fn get(self) -> i8 {
        self.0
    }

    /// Returns `true` for [`Level::SILENT`].
    pub fn is_silent(self) -> bool {
        self == Self::SILENT
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::CTRL
    }
}

impl TryFrom<i8> for Level {
    type Error = LevelError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for i8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_silent() {
            f.write_str("silent")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Errors building a [`Level`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LevelError {
    /// The value is outside the -1..=4 scale.
    #[error("level {0} is outside -1..=4")]
    OutOfRange(i8),
}

/// The only hard delivery gate: `false` iff `level` is silent.
pub fn eligible(level: Level) -> bool {
    !level.is_silent()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_is_never_eligible() {
        assert!(!eligible(Level::SILENT));
        for value in 0..=4 {
            assert!(eligible(Level::new(value).expect("level in range")));
        }
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert_eq!(Level::new(5), Err(LevelError::OutOfRange(5)));
        assert_eq!(Level::new(-2), Err(LevelError::OutOfRange(-2)));
        assert_eq!(Level::new(-1), Ok(Level::SILENT));
    }

    #[test]
    fn ordering_supports_thresholds() {
        assert!(Level::AUDIT < Level::PRIVATE);
        assert!(Level::SILENT < Level::AUDIT);
    }

    #[test]
    fn deserializes_from_integer() {
        let level: Level = serde_json::from_str("2").expect("should deserialize");
        assert_eq!(level, Level::CTRLMORE);
        assert!(serde_json::from_str::<Level>("9").is_err());
    }
}
