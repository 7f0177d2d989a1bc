//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the cache line that has not been accessed for the longest time.
//! Every fill and every hit stamps the line's order counter with the current
//! tick, so the smallest counter in a set identifies the LRU line.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_fill()` / `on_hit()`: O(1)
//!   - `get_victim()`: O(W) where W is the number of ways (associativity)
//! - **Best Case:** Sequential/streaming accesses with good temporal locality
//! - **Worst Case:** Scanning patterns larger than cache capacity (thrashing)

use super::{ReplacementPolicy, oldest_way};
use crate::common::SimRng;
use crate::core::units::cache::line::CacheLine;

/// LRU policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct LruPolicy;

impl ReplacementPolicy for LruPolicy {
    fn on_fill(&self, line: &mut CacheLine, tick: u64) {
        line.order = tick;
    }

    /// Promotes the line to most recently used.
    fn on_hit(&self, line: &mut CacheLine, tick: u64) {
        line.order = tick;
    }

    /// Returns the least recently touched way.
    fn get_victim(&self, set: &[CacheLine], _rng: &mut SimRng) -> usize {
        oldest_way(set)
    }
}
