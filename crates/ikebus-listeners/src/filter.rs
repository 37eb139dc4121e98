//! Per-category level thresholds.

use std::collections::BTreeMap;

use ikebus_core::{Event, Level, SignalCategory};
use serde::Deserialize;

/// Delivers an event when its level is at or below the threshold of its
/// signal's category.
///
/// Setting a category to [`Level::SILENT`] mutes it entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelFilter {
    thresholds: [Level; SignalCategory::ALL.len()],
}

impl LevelFilter {
    /// Uses `level` for every category.
    pub fn uniform(level: Level) -> Self {
        Self {
            thresholds: [level; SignalCategory::ALL.len()],
        }
    }

    /// Overrides the threshold of one category.
    #[must_use]
    pub fn with(mut self, category: SignalCategory, level: Level) -> Self {
        self.thresholds[category as usize] = level;
        self
    }

    /// Threshold for `category`.
    pub fn threshold(&self, category: SignalCategory) -> Level {
        self.thresholds[category as usize]
    }

    /// Whether `event` passes.
    pub fn allows(&self, event: &Event) -> bool {
        let threshold = self.threshold(event.category());
        !threshold.is_silent() && event.level <= threshold
    }
}

impl Default for LevelFilter {
    fn default() -> Self {
        Self::uniform(Level::default())
    }
}

/// Serialized form of a [`LevelFilter`].
///
/// ```toml
/// default_level = 1
/// [levels]
/// knl = 2
/// enc = -1
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    /// Threshold for categories without an override.
    #[serde(default)]
    pub default_level: Level,

    /// Per-category overrides.
    #[serde(default)]
    pub levels: BTreeMap<SignalCategory, Level>,
}

impl From<&FilterConfig> for LevelFilter {
    fn from(config: &FilterConfig) -> Self {
        config
            .levels
            .iter()
            .fold(LevelFilter::uniform(config.default_level), |filter, (category, level)| {
                filter.with(*category, *level)
            })
    }
}
