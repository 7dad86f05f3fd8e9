//! Randomness capability injected into the replica selector.
//!
//! The selector never touches a global generator. Production callers pass
//! [`ThreadRandom`]; simulations and tests pass [`SeededRandom`] or
//! [`ReversingRandom`] to get reproducible placements.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of randomness for placement decisions.
pub trait RandomSource {
    /// Uniform integer in `[0, bound)`. Callers never pass `bound == 0`.
    fn random_int(&mut self, bound: usize) -> usize;

    /// Shuffle `items` in place.
    ///
    /// The default is a Fisher-Yates shuffle driven by [`random_int`].
    ///
    /// [`random_int`]: RandomSource::random_int
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.random_int(i + 1);
            items.swap(i, j);
        }
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn random_int(&mut self, bound: usize) -> usize {
        (**self).random_int(bound)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        (**self).shuffle(items)
    }
}

/// Thread-local OS-seeded generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn random_int(&mut self, bound: usize) -> usize {
        rand::thread_rng().gen_range(0..bound)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut rand::thread_rng());
    }
}

/// Reproducible generator: the same seed yields the same placements.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn random_int(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

/// Fully deterministic source: draws the last index and shuffles by
/// reversing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReversingRandom;

impl RandomSource for ReversingRandom {
    fn random_int(&mut self, bound: usize) -> usize {
        bound - 1
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.reverse();
    }
}
