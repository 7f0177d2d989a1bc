//! Radiation-style fault injection into protected cache lines.
//!
//! Each attempt picks one fault placement uniformly over the whole range: every
//! line contributes one candidate per possible first bit of a fault in its
//! eligible bit space, so a line with wider code bits is hit proportionally
//! more often. The eligible bit space of a line is:
//!
//! * `Data`: `words * word_bits` stored data bits.
//! * `Check`: `words * check_bits` code bits of the codec matching the line state.
//! * `Both`: data bits followed by code bits.
//!
//! A burst of `n` flips has `space - n + 1` possible starts. Invalid lines are
//! weighted as clean lines; a placement that lands on one is logged and
//! reported as a failed attempt, and it is not retried. Only `data` and
//! `check` are touched; the reference copy stays intact.

use std::ops::Range;

use rand::Rng;
use tracing::debug;

use super::cache::line::CacheLine;
use crate::common::SimRng;
use crate::config::{FaultConfig, FaultPattern, FaultTarget};

/// Which bits a fault may hit and what shape it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorType {
    /// Eligible bit space.
    pub target: FaultTarget,
    /// Single flip or burst.
    pub pattern: FaultPattern,
    /// Flips per burst; ignored for single faults.
    pub burst_len: u32,
}

impl ErrorType {
    /// Number of adjacent bits one fault flips.
    pub const fn flips(&self) -> u32 {
        match self.pattern {
            FaultPattern::Single => 1,
            FaultPattern::Burst => self.burst_len,
        }
    }
}

impl From<&FaultConfig> for ErrorType {
    fn from(config: &FaultConfig) -> Self {
        Self { target: config.target, pattern: config.pattern, burst_len: config.burst_len }
    }
}

/// Bit widths needed to lay out the bit space of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeWidths {
    /// Data bits per word.
    pub word_bits: u32,
    /// Check bits per word of a clean line.
    pub clean_check_bits: u32,
    /// Check bits per word of a dirty line.
    pub dirty_check_bits: u32,
}

impl CodeWidths {
    const fn check_bits(&self, dirty: bool) -> u32 {
        if dirty { self.dirty_check_bits } else { self.clean_check_bits }
    }
}

/// One line that received a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultHit {
    /// Global line index.
    pub line: usize,
    /// Bits flipped in this line by the attempt.
    pub bits: u32,
    /// First flipped bit, counted within the line's eligible bit space.
    pub start: u64,
    /// Line was dirty when hit.
    pub dirty: bool,
}

/// Eligible bit space of one line.
#[derive(Debug, Clone, Copy)]
struct BitWindow {
    data_space: u64,
    check_bits: u32,
    base: u64,
    space: u64,
}

/// Outcome of one injection round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectionReport {
    /// Bits flipped in total.
    pub injected: u64,
    /// Attempts that landed on an invalid line or an empty bit space.
    pub failed_attempts: u64,
    /// Successful attempts, in order.
    pub hits: Vec<FaultHit>,
}

/// Flips bits in valid cache lines.
#[derive(Debug, Clone, Copy)]
pub struct FaultInjector {
    error_type: ErrorType,
    widths: CodeWidths,
}

impl FaultInjector {
    /// Creates an injector for one fault shape and code layout.
    pub const fn new(error_type: ErrorType, widths: CodeWidths) -> Self {
        Self { error_type, widths }
    }

    /// Performs `count` injection attempts over `lines[range]`.
    ///
    /// # Arguments
    ///
    /// * `lines` - All lines of the protected level.
    /// * `range` - Global line indices eligible for selection; clamped to `lines`.
    /// * `count` - Number of attempts.
    /// * `rng` - Simulation RNG.
    ///
    /// # Returns
    ///
    /// The flipped-bit total, failed attempts and the lines that were hit.
    pub fn inject(
        &self,
        lines: &mut [CacheLine],
        range: Range<usize>,
        count: u32,
        rng: &mut SimRng,
    ) -> InjectionReport {
        let mut report = InjectionReport::default();
        let range = range.start.min(lines.len())..range.end.min(lines.len());
        let weights: Vec<u64> = lines[range.clone()].iter().map(|l| self.placements(l)).collect();
        let total: u64 = weights.iter().sum();

        for _ in 0..count {
            if total == 0 {
                debug!("fault injection found no eligible bits");
                report.failed_attempts += 1;
                continue;
            }
            let (offset, start) = locate(&weights, rng.gen_range(0..total));
            let idx = range.start + offset;
            let line = &mut lines[idx];
            if !line.valid {
                debug!(line = idx, "fault injection skipped invalid line");
                report.failed_attempts += 1;
                continue;
            }
            let bits = self.flip_at(line, start);
            debug!(line = idx, start, bits, dirty = line.dirty, "fault injected");
            report.injected += u64::from(bits);
            report.hits.push(FaultHit { line: idx, bits, start, dirty: line.dirty });
        }
        report
    }

    fn window(&self, line: &CacheLine) -> BitWindow {
        let words = line.data.len() as u64;
        let check_bits = self.widths.check_bits(line.dirty);
        let data_space = words * u64::from(self.widths.word_bits);
        let check_space = words * u64::from(check_bits);
        let (base, space) = match self.error_type.target {
            FaultTarget::Data => (0, data_space),
            FaultTarget::Check => (data_space, check_space),
            FaultTarget::Both => (0, data_space + check_space),
        };
        BitWindow { data_space, check_bits, base, space }
    }

    /// Flips per fault, clamped to a non-empty `space`.
    fn burst_len(&self, space: u64) -> u64 {
        u64::from(self.error_type.flips()).clamp(1, space)
    }

    /// Number of distinct fault starts in `line`.
    fn placements(&self, line: &CacheLine) -> u64 {
        let space = self.window(line).space;
        if space == 0 { 0 } else { space - self.burst_len(space) + 1 }
    }

    /// Flips one fault starting `start` bits into the line's window.
    ///
    /// # Returns
    ///
    /// The number of bits flipped.
    fn flip_at(&self, line: &mut CacheLine, start: u64) -> u32 {
        let w = self.window(line);
        let len = self.burst_len(w.space);
        let word_bits = u64::from(self.widths.word_bits);
        for bit in w.base + start..w.base + start + len {
            if bit < w.data_space {
                line.data[(bit / word_bits) as usize] ^= 1u64 << (bit % word_bits);
            } else {
                let bit = bit - w.data_space;
                let check_bits = u64::from(w.check_bits);
                line.check[(bit / check_bits) as usize] ^= 1u128 << (bit % check_bits);
            }
        }
        len as u32
    }
}

/// Maps a draw in `0..weights.sum()` to `(slot, offset within slot)`.
fn locate(weights: &[u64], mut draw: u64) -> (usize, u64) {
    for (slot, &weight) in weights.iter().enumerate() {
        if draw < weight {
            return (slot, draw);
        }
        draw -= weight;
    }
    (weights.len().saturating_sub(1), 0)
}
