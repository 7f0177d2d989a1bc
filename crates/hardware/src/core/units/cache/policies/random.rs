//! Random Replacement Policy.
//!
//! This policy evicts a uniformly chosen way. It draws from the simulation's
//! seeded RNG, so victim choices replay identically for a given seed.

use rand::Rng;

use super::ReplacementPolicy;
use crate::common::SimRng;
use crate::core::units::cache::line::CacheLine;

/// Random policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl ReplacementPolicy for RandomPolicy {
    /// Access patterns do not affect random replacement.
    fn on_fill(&self, _line: &mut CacheLine, _tick: u64) {}

    fn on_hit(&self, _line: &mut CacheLine, _tick: u64) {}

    /// Picks a way uniformly, ignoring order counters.
    fn get_victim(&self, set: &[CacheLine], rng: &mut SimRng) -> usize {
        rng.gen_range(0..set.len())
    }
}
