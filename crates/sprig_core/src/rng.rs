//! Seeded, reproducible randomness
//!
//! Generators are plain values owned by whoever needs them; there is no
//! process-wide engine.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic generator used for gameplay randomness.
pub type GameRng = ChaCha8Rng;

/// Generator with a fixed seed; same seed, same sequence.
pub fn seeded_rng(seed: u64) -> GameRng {
    GameRng::seed_from_u64(seed)
}

/// Derive an independent child generator from `parent`.
pub fn fork_rng(parent: &mut GameRng) -> GameRng {
    GameRng::seed_from_u64(parent.next_u64())
}
