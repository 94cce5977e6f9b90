//! Random sources used to drive field generation.

use std::collections::VecDeque;

use oddone_core::RandomSource;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

const GAME_STREAM_LABEL: &str = "oddone/game";
const PHRASE_STREAM_LABEL: &str = "oddone/phrase";

/// Seeded source backed by ChaCha8 that reseeds itself for every game.
///
/// Each game draws from its own stream derived from the base seed and the
/// game index, so replaying game `n` does not depend on how games `0..n`
/// unfolded.
#[derive(Clone, Debug)]
pub struct ChaChaSource {
    base_seed: u64,
    rng: ChaCha8Rng,
}

impl ChaChaSource {
    /// Creates a source seeded with the provided value.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            base_seed: seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed supplied at construction.
    #[must_use]
    pub const fn base_seed(&self) -> u64 {
        self.base_seed
    }
}

impl RandomSource for ChaChaSource {
    fn next_below(&mut self, upper: u32) -> u32 {
        if upper <= 1 {
            return 0;
        }
        self.rng.gen_range(0..upper)
    }

    fn begin_game(&mut self, game_index: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(derive_game_seed(self.base_seed, game_index));
    }
}

/// Source that replays a fixed list of draws.
///
/// Each draw is reduced modulo the requested bound; once the script is
/// exhausted every draw yields zero.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    draws: VecDeque<u32>,
}

impl ScriptedSource {
    /// Creates a source that yields the provided draws in order.
    #[must_use]
    pub fn new<I>(draws: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    /// Number of scripted draws not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedSource {
    fn next_below(&mut self, upper: u32) -> u32 {
        let draw = self.draws.pop_front().unwrap_or(0);
        draw % upper.max(1)
    }
}

/// Derives the seed of an individual game from the session's base seed.
#[must_use]
pub fn derive_game_seed(base_seed: u64, game_index: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base_seed.to_le_bytes());
    hasher.update(GAME_STREAM_LABEL.as_bytes());
    hasher.update(game_index.to_le_bytes());
    finalize_seed(hasher)
}

/// Hashes a free-form phrase into a base seed.
#[must_use]
pub fn derive_seed_from_phrase(phrase: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(PHRASE_STREAM_LABEL.as_bytes());
    hasher.update(phrase.as_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
