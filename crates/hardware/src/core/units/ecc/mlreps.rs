//! MLREPS: majority-vote triple redundancy.
//!
//! Each word is stored three times: once as data and twice in the check bits.
//! Decoding takes the bitwise majority. One flipped replica per bit is always
//! outvoted. Two flipped replicas of the same bit produce a confident, wrong
//! majority; the codec cannot know, and the ground-truth check judges it as
//! undetected corruption.

use super::{DecodeStatus, EccCodec, FaultVerdict};
use crate::common::constants::word_mask;
use crate::config::EccScheme;

/// Triple-redundancy codec.
#[derive(Debug, Clone, Copy)]
pub struct MlrepsCodec {
    word_bits: u32,
}

impl MlrepsCodec {
    /// Creates an MLREPS codec for `word_bits`-wide words.
    pub const fn new(word_bits: u32) -> Self {
        Self { word_bits }
    }

    /// Splits check bits into the two stored replicas.
    const fn replicas(&self, check: u128) -> (u64, u64) {
        let mask = word_mask(self.word_bits);
        ((check as u64) & mask, ((check >> self.word_bits) as u64) & mask)
    }
}

impl EccCodec for MlrepsCodec {
    fn scheme(&self) -> EccScheme {
        EccScheme::Mlreps
    }

    fn word_bits(&self) -> u32 {
        self.word_bits
    }

    fn check_bits(&self) -> u32 {
        2 * self.word_bits
    }

    fn encode_word(&self, word: u64) -> u128 {
        let word = u128::from(word & word_mask(self.word_bits));
        word | (word << self.word_bits)
    }

    fn decode_word(&self, word: u64, check: u128) -> (u64, DecodeStatus) {
        let a = word & word_mask(self.word_bits);
        let (b, c) = self.replicas(check);
        if a == b && b == c {
            return (a, DecodeStatus::Ok);
        }
        ((a & b) | (a & c) | (b & c), DecodeStatus::Corrected)
    }

    /// A wrong majority carries no error signal: count it as undetected.
    fn judge(&self, status: DecodeStatus, matches_reference: bool) -> FaultVerdict {
        match (status, matches_reference) {
            (DecodeStatus::Ok, true) => FaultVerdict::NoError,
            (DecodeStatus::Corrected, true) => FaultVerdict::Corrected,
            (DecodeStatus::DetectedUncorrectable, _) => FaultVerdict::Detected,
            (_, false) => FaultVerdict::Undetected,
            (DecodeStatus::UndetectedMismatch, true) => FaultVerdict::Undetected,
        }
    }
}
