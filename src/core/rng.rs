//! Uniform randomness for the particle field
//!
//! The field only ever asks for uniform samples in `[0, 1)`. Any `rand::Rng`
//! qualifies; tests can also feed a fixed script of values.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of uniform samples in `[0, 1)`
pub trait RandomSource {
    /// Next uniform sample in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Uniform sample in `[low, high)`
    #[inline]
    fn in_range(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_unit()
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    #[inline]
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.next_unit() * len as f64) as usize).min(len - 1)
    }

    /// True with probability `p`
    #[inline]
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Fast non-cryptographic generator seeded from the platform entropy source
/// (`crypto.getRandomValues` in the browser).
pub fn entropy_rng() -> SmallRng {
    SmallRng::from_entropy()
}

/// Replays a fixed list of samples, cycling when exhausted
#[cfg(test)]
pub(crate) struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

#[cfg(test)]
impl ScriptedRandom {
    pub(crate) fn new(values: &[f64]) -> Self {
        assert!(!values.is_empty());
        Self {
            values: values.to_vec(),
            cursor: 0,
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rng_stays_in_unit_interval() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_index_never_out_of_bounds() {
        let mut rng = ScriptedRandom::new(&[0.0, 0.5, 0.999_999_999]);
        assert_eq!(rng.index(10), 0);
        assert_eq!(rng.index(10), 5);
        assert_eq!(rng.index(10), 9);
    }

    #[test]
    fn test_in_range_and_chance() {
        let mut rng = ScriptedRandom::new(&[0.0, 0.5, 0.004, 0.005]);
        assert_eq!(rng.in_range(-0.1, 0.1), -0.1);
        assert_eq!(rng.in_range(2.0, 4.0), 3.0);
        assert!(rng.chance(0.005));
        assert!(!rng.chance(0.005));
    }
}
