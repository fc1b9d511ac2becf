//! Injected randomness for combat resolution
//!
//! Every probabilistic branch in a command draws from a `BattleRng` handed in
//! by the caller. Replaying the same stream against the same unit snapshot
//! reproduces the same outcome, draw for draw.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of randomness consumed by commands and ability checks
pub trait BattleRng {
    /// Uniform value in [0, 1)
    fn next(&mut self) -> f64;

    /// Bernoulli trial. Probabilities outside [0, 1] saturate.
    fn next_bool(&mut self, probability: f64) -> bool {
        self.next() < probability
    }

    /// Uniform value in [min, max)
    fn range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next()
    }

    /// Uniform integer in [min, max], both ends inclusive
    fn next_range_int(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = f64::from(max - min + 1);
        let offset = (self.next() * span).floor() as i32;
        (min + offset).min(max)
    }
}

/// Seeded ChaCha stream that remembers how far it has been drawn
#[derive(Debug, Clone)]
pub struct SeededRng {
    inner: ChaCha8Rng,
    seed: u64,
    draws: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            draws: 0,
        }
    }

    /// Rebuild a stream positioned after `draws` values have been consumed
    pub fn at_position(seed: u64, draws: u64) -> Self {
        let mut rng = Self::new(seed);
        for _ in 0..draws {
            rng.next();
        }
        rng
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of values drawn so far
    pub fn position(&self) -> u64 {
        self.draws
    }
}

impl BattleRng for SeededRng {
    fn next(&mut self) -> f64 {
        self.draws += 1;
        self.inner.gen::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Used to pin individual rolls in tests and to replay recorded streams.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRng {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Every draw returns `value`
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl BattleRng for SequenceRng {
    fn next(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
