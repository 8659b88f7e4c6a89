//! Random number generation for dungeon-net
//!
//! Uses a seeded ChaCha RNG so a whole generation run is reproducible from a
//! single `u64` seed. Every component of the engine draws from one shared
//! `LayoutRng` threaded through the call tree.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Layout random number generator
///
/// Wraps ChaCha8Rng for reproducible random number generation.
/// Note: stream position is not serialized - deserializing restores a fresh
/// stream from the original seed.
#[derive(Debug, Clone)]
pub struct LayoutRng {
    rng: ChaCha8Rng,
    seed: u64,
}

// Custom serialization - only serialize seed, recreate RNG on deserialize
impl Serialize for LayoutRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LayoutRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(LayoutRng::new(seed))
    }
}

impl LayoutRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns a random index in 0..n
    ///
    /// Returns 0 if n is 0.
    pub fn index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Returns a random value in lo..=hi
    ///
    /// Returns lo if the range is empty or inverted.
    pub fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Returns true with probability p (p <= 0 never, p >= 1 always)
    pub fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        self.rng.gen_range(0.0..1.0) < p
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.index(items.len())])
        }
    }

    /// Draw an index distributed according to the given weights
    ///
    /// Weights need not sum to 1; negative entries count as 0. Returns None
    /// when no weight is positive. A draw that lands past the cumulative sum
    /// due to rounding resolves to the last positive-weight index.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let draw = self.rng.gen_range(0.0..1.0) * total;
        let mut acc = 0.0;
        let mut last_positive = None;
        for (i, &w) in weights.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            acc += w;
            last_positive = Some(i);
            if draw < acc {
                return Some(i);
            }
        }
        last_positive
    }
}

impl Default for LayoutRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
