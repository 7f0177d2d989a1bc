//! Cache Replacement Policies.
//!
//! Implements the algorithms for selecting victim lines in set-associative caches.
//!
//! # Policies
//!
//! - `Fifo`: First-In, First-Out (order stamped at fill time).
//! - `Lru`: Least Recently Used (order stamped at fill and on every hit).
//! - `Random`: Uniform selection from the simulation RNG.
//!
//! FIFO and LRU share the per-line `order` counter and both evict the line
//! with the smallest counter; ties go to the lowest way index.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

/// Random replacement policy.
pub mod random;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use random::RandomPolicy;

use std::fmt::Debug;

use super::line::CacheLine;
use crate::common::SimRng;
use crate::config::ReplacementPolicy as PolicyType;

/// Trait for cache replacement policies.
///
/// Defines the interface for maintaining the order counter and selecting
/// victim lines. Policies are stateless; all bookkeeping lives in the lines.
pub trait ReplacementPolicy: Send + Sync + Debug {
    /// Called when a line becomes valid.
    ///
    /// # Arguments
    ///
    /// * `line` - The freshly filled line.
    /// * `tick` - Current global tick.
    fn on_fill(&self, line: &mut CacheLine, tick: u64);

    /// Called on every hit to a line.
    ///
    /// # Arguments
    ///
    /// * `line` - The line that was hit.
    /// * `tick` - Current global tick.
    fn on_hit(&self, line: &mut CacheLine, tick: u64);

    /// Selects a victim way from a full set.
    ///
    /// # Arguments
    ///
    /// * `set` - The `ways` lines of the set, all valid.
    /// * `rng` - Simulation RNG.
    ///
    /// # Returns
    ///
    /// The way index (relative to the set) to evict.
    fn get_victim(&self, set: &[CacheLine], rng: &mut SimRng) -> usize;
}

/// Way holding the smallest order counter; the first way wins ties.
pub(crate) fn oldest_way(set: &[CacheLine]) -> usize {
    set.iter()
        .enumerate()
        .min_by_key(|(_, line)| line.order)
        .map_or(0, |(way, _)| way)
}

/// Instantiates the policy selected in a level configuration.
pub fn build(kind: PolicyType) -> Box<dyn ReplacementPolicy> {
    match kind {
        PolicyType::Fifo => Box::new(FifoPolicy),
        PolicyType::Lru => Box::new(LruPolicy),
        PolicyType::Random => Box::new(RandomPolicy),
    }
}
