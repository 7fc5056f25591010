//! Random selection sources.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform choices over `[0, len)`.
pub trait RandomSource: Send {
    /// Pick an index in `[0, len)`. Callers guarantee `len >= 1`.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Thread-local entropy, fresh on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Reproducible source for replays and tests.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Create a source from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}
