//! Main memory model.
//!
//! Memory is the authoritative, error-free backing store beneath the last
//! cache level. Words never written read back a deterministic background
//! pattern derived from their address, so misses deliver distinct values
//! without storing the whole address space.

use std::collections::HashMap;

use crate::common::constants::{splitmix64, word_mask};

/// Sparse word-addressed memory.
#[derive(Debug, Clone)]
pub struct MainMemory {
    words: HashMap<u64, u64>,
    word_bytes: u64,
    mask: u64,
    /// Access latency in cycles.
    pub latency: u64,
}

impl MainMemory {
    /// Creates an empty memory for `word_bits`-wide words.
    pub fn new(word_bits: u32, latency: u64) -> Self {
        Self {
            words: HashMap::new(),
            word_bytes: u64::from(word_bits / 8).max(1),
            mask: word_mask(word_bits),
            latency,
        }
    }

    /// Value a never-written word at `address` holds.
    pub const fn background(&self, address: u64) -> u64 {
        splitmix64(address / self.word_bytes) & self.mask
    }

    /// Reads the word containing `address`.
    pub fn read_word(&self, address: u64) -> u64 {
        self.words
            .get(&(address / self.word_bytes))
            .copied()
            .unwrap_or_else(|| self.background(address))
    }

    /// Writes the word containing `address`.
    pub fn write_word(&mut self, address: u64, value: u64) {
        let _ = self.words.insert(address / self.word_bytes, value & self.mask);
    }

    /// Reads `len` consecutive words starting at `base`.
    pub fn read_block(&self, base: u64, len: usize) -> Vec<u64> {
        (0..len as u64).map(|i| self.read_word(base + i * self.word_bytes)).collect()
    }

    /// Writes consecutive words starting at `base`.
    pub fn write_block(&mut self, base: u64, data: &[u64]) {
        for (i, &word) in data.iter().enumerate() {
            self.write_word(base + i as u64 * self.word_bytes, word);
        }
    }

    /// Number of words that have been written at least once.
    pub fn resident_words(&self) -> usize {
        self.words.len()
    }
}
