use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of every random decision the game makes
pub trait Randomness {
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize;
    /// True with probability `p`
    fn chance(&mut self, p: f64) -> bool;
}

/// Production randomness backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RngRandomness<R: Rng> {
    rng: R,
}

impl<R: Rng> RngRandomness<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngRandomness<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Randomness for RngRandomness<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }
}

/// Replays queued decisions, for tests.
///
/// Indices are taken modulo the requested length. When a queue runs dry
/// indices default to 0 and chances to `false`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandomness {
    indices: VecDeque<usize>,
    chances: VecDeque<bool>,
}

impl ScriptedRandomness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indices<I: IntoIterator<Item = usize>>(mut self, indices: I) -> Self {
        self.indices.extend(indices);
        self
    }

    pub fn with_chances<I: IntoIterator<Item = bool>>(mut self, chances: I) -> Self {
        self.chances.extend(chances);
        self
    }
}

impl Randomness for ScriptedRandomness {
    fn pick_index(&mut self, len: usize) -> usize {
        self.indices.pop_front().unwrap_or(0) % len.max(1)
    }

    fn chance(&mut self, _p: f64) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sources_are_reproducible() {
        let mut a = RngRandomness::seeded(7);
        let mut b = RngRandomness::seeded(7);
        let xs: Vec<usize> = (0..32).map(|_| a.pick_index(9)).collect();
        let ys: Vec<usize> = (0..32).map(|_| b.pick_index(9)).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|&i| i < 9));
    }

    #[test]
    fn chance_extremes_are_certain() {
        let mut r = RngRandomness::seeded(1);
        assert!((0..50).all(|_| r.chance(1.0)));
        assert!((0..50).all(|_| !r.chance(0.0)));
    }

    #[test]
    fn scripted_replays_then_defaults() {
        let mut r = ScriptedRandomness::new()
            .with_indices([4, 11])
            .with_chances([true]);
        assert_eq!(r.pick_index(9), 4);
        assert_eq!(r.pick_index(9), 2);
        assert_eq!(r.pick_index(9), 0);
        assert!(r.chance(0.2));
        assert!(!r.chance(0.2));
    }
}
