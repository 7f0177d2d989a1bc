//! Set-Associative Cache Level Store.
//!
//! This module implements the storage of one cache level. It owns the lines of
//! the level grouped into sets of `ways` entries and provides:
//! 1. **Lookup:** Tag match against the valid lines of the target set.
//! 2. **Free-Line Search:** The first invalid way of a set, if any.
//! 3. **Victim Selection:** Free way first, otherwise the configured policy.
//! 4. **Bookkeeping:** Fill, touch, base-address reconstruction and clean/dirty gauges.
//!
//! Allocation, eviction and data movement between levels are performed by the
//! hierarchy using the indices returned here.

/// Cache line storage.
pub mod line;

/// Cache replacement policy implementations (FIFO, LRU, Random).
pub mod policies;

use std::ops::Range;

use self::line::CacheLine;
use self::policies::ReplacementPolicy;
use crate::common::{AddressDecoder, ConfigError, SimRng};
use crate::config::{CacheConfig, WritePolicy};

/// One level of the hierarchy.
#[derive(Debug)]
pub struct CacheLevel {
    /// Access latency in cycles.
    pub latency: u64,
    /// Write hit handling for this level.
    pub write_policy: WritePolicy,
    decoder: AddressDecoder,
    word_bytes: u64,
    words_per_line: usize,
    lines: Vec<CacheLine>,
    policy: Box<dyn ReplacementPolicy>,
}

impl CacheLevel {
    /// Creates a level with every line invalid.
    ///
    /// # Arguments
    ///
    /// * `level` - Level index (0 = L1), used in error messages.
    /// * `config` - Geometry, policies and latency.
    /// * `word_bits` - Codec word width; fixes the number of words per line.
    ///
    /// # Returns
    ///
    /// The level, or a [`ConfigError`] for an invalid geometry.
    pub fn new(level: usize, config: &CacheConfig, word_bits: u32) -> Result<Self, ConfigError> {
        let decoder =
            AddressDecoder::new(level, config.size_bytes, config.line_bytes, config.ways)?;
        let word_bytes = u64::from(word_bits / 8).max(1);
        if config.line_bytes < word_bytes {
            return Err(ConfigError::WordWiderThanLine {
                level,
                line_bytes: config.line_bytes,
                word_bits,
            });
        }
        let words_per_line = (config.line_bytes / word_bytes) as usize;
        let num_lines = decoder.sets() * decoder.ways();

        Ok(Self {
            latency: config.latency,
            write_policy: config.write_policy,
            decoder,
            word_bytes,
            words_per_line,
            lines: vec![CacheLine::new(words_per_line); num_lines],
            policy: policies::build(config.policy),
        })
    }

    /// Finds the line holding `address`.
    ///
    /// # Returns
    ///
    /// The global line index of the first valid way whose tag matches, or
    /// `None` on a miss.
    pub fn lookup(&self, address: u64) -> Option<usize> {
        let decoded = self.decoder.decode(address);
        self.set_range(decoded.set)
            .find(|&idx| self.lines[idx].valid && self.lines[idx].tag == decoded.tag)
    }

    /// Checks if the level holds `address` without touching replacement state.
    pub fn contains(&self, address: u64) -> bool {
        self.lookup(address).is_some()
    }

    /// Returns the global index of an invalid line in `set`, if one exists.
    pub fn find_free(&self, set: usize) -> Option<usize> {
        self.set_range(set).find(|&idx| !self.lines[idx].valid)
    }

    /// Chooses the line to (re)use for a new tag in `set`.
    ///
    /// A free line is preferred; otherwise the replacement policy picks a
    /// victim among the set's ways. The returned line may still be valid and
    /// dirty; the caller is responsible for writing it back.
    pub fn select_victim(&self, set: usize, rng: &mut SimRng) -> usize {
        if let Some(free) = self.find_free(set) {
            return free;
        }
        let range = self.set_range(set);
        let way = self.policy.get_victim(&self.lines[range.clone()], rng);
        range.start + way.min(self.decoder.ways() - 1)
    }

    /// Global line indices belonging to `set`.
    #[inline]
    pub const fn set_range(&self, set: usize) -> Range<usize> {
        let base = set * self.decoder.ways();
        base..base + self.decoder.ways()
    }

    /// Records a hit for replacement bookkeeping.
    pub fn touch(&mut self, idx: usize, tick: u64) {
        self.policy.on_hit(&mut self.lines[idx], tick);
    }

    /// Installs `data` for `address` into line `idx` as a clean, valid line.
    ///
    /// The reference copy is set to `data`; code bits are left to the caller.
    pub fn fill(&mut self, idx: usize, address: u64, data: Vec<u64>, tick: u64) {
        let tag = self.decoder.tag(address);
        let line = &mut self.lines[idx];
        line.tag = tag;
        line.valid = true;
        line.dirty = false;
        line.reference.clone_from(&data);
        line.data = data;
        line.check.fill(0);
        self.policy.on_fill(line, tick);
    }

    /// Base address of the line stored at `idx`.
    pub fn line_address(&self, idx: usize) -> u64 {
        let set = idx / self.decoder.ways();
        self.decoder.compose(self.lines[idx].tag, set)
    }

    /// Index of the word holding `address` within its line.
    #[inline]
    pub const fn word_index(&self, address: u64) -> usize {
        ((address & (self.decoder.line_bytes() - 1)) / self.word_bytes) as usize
    }

    /// Counts valid lines as `(clean, dirty)`.
    pub fn occupancy(&self) -> (u64, u64) {
        self.lines.iter().filter(|l| l.valid).fold((0, 0), |(clean, dirty), l| {
            if l.dirty { (clean, dirty + 1) } else { (clean + 1, dirty) }
        })
    }

    /// Address decoder of this level.
    pub const fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    /// Words stored per line.
    pub const fn words_per_line(&self) -> usize {
        self.words_per_line
    }

    /// Line at global index `idx`.
    pub fn line(&self, idx: usize) -> &CacheLine {
        &self.lines[idx]
    }

    /// Mutable line at global index `idx`.
    pub fn line_mut(&mut self, idx: usize) -> &mut CacheLine {
        &mut self.lines[idx]
    }

    /// All lines, set-major.
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    /// All lines, mutable.
    pub fn lines_mut(&mut self) -> &mut [CacheLine] {
        &mut self.lines
    }

    /// Total number of lines.
    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }
}
