//! Tunable parameters of a game session.

use std::time::Duration;

use oddone_core::{DifficultyTier, ShapeSet};
use serde::{Deserialize, Deserializer};

/// Level every fresh game starts at.
pub const DEFAULT_START_LEVEL: u32 = 2;
/// Countdown, in seconds, every fresh game starts with.
pub const DEFAULT_START_TIME: f64 = 15.0;
/// Simulated time between consecutive countdown ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(10);
/// Seconds added after the unusual cell was found.
pub const DEFAULT_CORRECT_BONUS: f64 = 2.0;
/// Seconds removed after a usual cell was tapped.
pub const DEFAULT_INCORRECT_PENALTY: f64 = 0.5;
/// Side length of the field in presenter units.
pub const DEFAULT_FIELD_EXTENT: f32 = 600.0;
/// Base seed used when none is configured.
pub const DEFAULT_SEED: u64 = 0x0dd0_0e5e_55a1_0001;

/// Configuration applied when constructing a [`crate::GameSession`].
///
/// Deserialises from partial documents; missing keys keep their defaults and
/// the tick interval is read as `tick_interval_ms`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Level every fresh game starts at.
    pub start_level: u32,
    /// Countdown, in seconds, every fresh game starts with.
    pub start_time: f64,
    /// Interval of the repeating countdown; each tick removes exactly this much time.
    #[serde(rename = "tick_interval_ms", deserialize_with = "deserialize_millis")]
    pub tick_interval: Duration,
    /// Seconds added after a correct selection.
    pub correct_bonus: f64,
    /// Seconds removed after an incorrect selection.
    pub incorrect_penalty: f64,
    /// Side length of the field in presenter units.
    pub field_extent: f32,
    /// Initial difficulty tier.
    pub difficulty: DifficultyTier,
    /// Shapes the presenter can render.
    #[serde(skip)]
    pub shapes: ShapeSet,
    /// Base seed for the default random source.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_level: DEFAULT_START_LEVEL,
            start_time: DEFAULT_START_TIME,
            tick_interval: DEFAULT_TICK_INTERVAL,
            correct_bonus: DEFAULT_CORRECT_BONUS,
            incorrect_penalty: DEFAULT_INCORRECT_PENALTY,
            field_extent: DEFAULT_FIELD_EXTENT,
            difficulty: DifficultyTier::default(),
            shapes: ShapeSet::all(),
            seed: DEFAULT_SEED,
        }
    }
}

impl SessionConfig {
    /// Returns the configuration with a different difficulty tier.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: DifficultyTier) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Returns the configuration with a different base seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Time removed from the countdown by a single tick.
    #[must_use]
    pub fn tick_decrement(&self) -> f64 {
        self.tick_interval.as_secs_f64()
    }
}

fn deserialize_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}
