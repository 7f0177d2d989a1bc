//! Even parity per word.
//!
//! The check bit makes the total number of set bits even. A mismatch reveals
//! an odd number of flips but not their position, so nothing is corrected.

use super::{DecodeStatus, EccCodec};
use crate::common::constants::word_mask;
use crate::config::EccScheme;

/// One even-parity bit per word.
#[derive(Debug, Clone, Copy)]
pub struct ParityCodec {
    word_bits: u32,
}

impl ParityCodec {
    /// Creates a parity codec for `word_bits`-wide words.
    pub const fn new(word_bits: u32) -> Self {
        Self { word_bits }
    }
}

impl EccCodec for ParityCodec {
    fn scheme(&self) -> EccScheme {
        EccScheme::Parity
    }

    fn word_bits(&self) -> u32 {
        self.word_bits
    }

    fn check_bits(&self) -> u32 {
        1
    }

    fn encode_word(&self, word: u64) -> u128 {
        u128::from((word & word_mask(self.word_bits)).count_ones() & 1)
    }

    fn decode_word(&self, word: u64, check: u128) -> (u64, DecodeStatus) {
        let word = word & word_mask(self.word_bits);
        let ones = word.count_ones() + (check & 1) as u32;
        if ones & 1 == 0 {
            (word, DecodeStatus::Ok)
        } else {
            (word, DecodeStatus::DetectedUncorrectable)
        }
    }
}
