//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the oldest cache line in a set, regardless of how recently
//! it was accessed. The order counter is stamped once, when the line is filled,
//! and hits leave it untouched.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_fill()` / `on_hit()`: O(1)
//!   - `get_victim()`: O(W) where W is the number of ways
//! - **Best Case:** Streaming accesses where all lines have equal importance
//! - **Worst Case:** Workloads with strong temporal locality (may evict frequently-used lines)

use super::{ReplacementPolicy, oldest_way};
use crate::common::SimRng;
use crate::core::units::cache::line::CacheLine;

/// FIFO policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoPolicy;

impl ReplacementPolicy for FifoPolicy {
    /// Stamps the insertion tick.
    fn on_fill(&self, line: &mut CacheLine, tick: u64) {
        line.order = tick;
    }

    /// Hits do not change insertion order.
    fn on_hit(&self, _line: &mut CacheLine, _tick: u64) {}

    /// Returns the earliest-filled way.
    fn get_victim(&self, set: &[CacheLine], _rng: &mut SimRng) -> usize {
        oldest_way(set)
    }
}
