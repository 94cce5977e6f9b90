#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure autoplay system that plays Odd One Out on behalf of a headless adapter.
//!
//! The player watches session events for freshly generated fields, waits for
//! its reaction delay and then taps a cell. With probability `accuracy` it taps
//! the unusual cell; otherwise it picks one of the usual cells at random.

use std::time::Duration;

use oddone_core::{CellPosition, Command, Event};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the autoplay system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    accuracy: f64,
    reaction_delay: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// `accuracy` is clamped into `0.0..=1.0`; non-finite values count as a
    /// player that never finds the unusual cell.
    #[must_use]
    pub fn new(accuracy: f64, reaction_delay: Duration, rng_seed: u64) -> Self {
        let accuracy = if accuracy.is_finite() {
            accuracy.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            accuracy,
            reaction_delay,
            rng_seed,
        }
    }

    /// Probability of tapping the unusual cell.
    #[must_use]
    pub const fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Time the player looks at the field before every tap.
    #[must_use]
    pub const fn reaction_delay(&self) -> Duration {
        self.reaction_delay
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct VisibleField {
    dimension: u32,
    unusual: CellPosition,
}

/// Scripted player translating the visible field into selection commands.
#[derive(Debug, Clone)]
pub struct Autoplay {
    config: Config,
    field: Option<VisibleField>,
    waited: Duration,
    rng: ChaCha8Rng,
}

impl Autoplay {
    /// Creates a new autoplay system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            field: None,
            waited: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Reports whether the player currently sees a field.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.field.is_some()
    }

    /// Consumes session events and elapsed frame time to emit selections.
    ///
    /// At most one selection is emitted per call; the reaction delay restarts
    /// after every tap and whenever a new field appears.
    pub fn handle(&mut self, events: &[Event], dt: Duration, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::FieldGenerated { field } => {
                    self.field = Some(VisibleField {
                        dimension: field.dimension(),
                        unusual: field.unusual_position(),
                    });
                    self.waited = Duration::ZERO;
                }
                Event::FieldCleared => {
                    self.field = None;
                    self.waited = Duration::ZERO;
                }
                _ => {}
            }
        }

        let Some(field) = self.field else {
            return;
        };

        self.waited = self.waited.saturating_add(dt);
        if self.waited < self.config.reaction_delay {
            return;
        }

        self.waited = Duration::ZERO;
        let position = self.choose_cell(field);
        out.push(Command::SelectCell { position });
    }

    fn choose_cell(&mut self, field: VisibleField) -> CellPosition {
        let cells = field.dimension.saturating_mul(field.dimension);
        if cells <= 1 || self.rng.gen_bool(self.config.accuracy) {
            return field.unusual;
        }

        let unusual_index = field.unusual.row() * field.dimension + field.unusual.column();
        let mut index = self.rng.gen_range(0..cells - 1);
        if index >= unusual_index {
            index += 1;
        }
        CellPosition::new(index % field.dimension, index / field.dimension)
    }
}
