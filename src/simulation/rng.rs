//! Deterministic randomness for spawn decisions.
//!
//! Every random draw in the simulation is a pure function of an integer seed.
//! Seeds come from a [`SpawnCounter`] that only ever counts up and is reset on
//! every network (re)load, so replaying the same counter sequence rebuilds the
//! same world.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant, spreads consecutive seeds apart.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seed slots reserved per counter step. Draw offsets must stay below this.
pub const SEEDS_PER_STEP: u64 = 16;

/// Map an integer seed to a float in `[0, 1)`.
pub fn seeded_random(seed: u64) -> f32 {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_mul(MIXING_CONSTANT));
    rng.random::<f32>()
}

/// Uniform value in `[min, max)` drawn from `seed`
pub fn seeded_range(seed: u64, min: f32, max: f32) -> f32 {
    min + seeded_random(seed) * (max - min)
}

/// Index in `0..len` drawn from `seed`. `len` must be non-zero.
pub fn seeded_index(seed: u64, len: usize) -> usize {
    ((seeded_random(seed) * len as f32) as usize).min(len - 1)
}

/// Seed derived from a live ground position, used where a decision should depend
/// on where an agent is rather than on spawn order.
pub fn position_seed(x: f32, z: f32) -> u64 {
    let ix = x.floor() as i64 as u64;
    let iz = z.floor() as i64 as u64;
    ix.wrapping_mul(73_856_093) ^ iz.wrapping_mul(19_349_663)
}

/// Monotonic seed source shared by all agent kinds.
#[derive(Debug, Clone, Default)]
pub struct SpawnCounter {
    next: u64,
}

impl SpawnCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next step and return its base seed. Callers add small fixed
    /// offsets (`base + 0`, `base + 1`, ...) for each value they draw.
    pub fn advance(&mut self) -> u64 {
        let base = self.next * SEEDS_PER_STEP;
        self.next += 1;
        base
    }

    /// Number of steps claimed since the last reset
    pub fn steps(&self) -> u64 {
        self.next
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}
