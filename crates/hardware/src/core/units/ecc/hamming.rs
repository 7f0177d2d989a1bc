//! Hamming single-error-correcting code.
//!
//! Codeword positions run from 1 to `n = m + r`; parity bits sit at the
//! power-of-two positions and data bits fill the rest in order. The syndrome
//! of a codeword is the XOR of the positions of its set bits, which is zero
//! for a valid codeword and equals the flipped position after a single error.
//!
//! A syndrome beyond `n` cannot come from a single flip. Plain Hamming has no
//! way to tell what happened, so such decodes are reported as uncorrectable
//! and judged as failed corrections.

use super::{DecodeStatus, EccCodec, FaultVerdict, check_mask};
use crate::common::constants::word_mask;
use crate::config::EccScheme;

/// Position layout of a Hamming codeword for `data_bits` data bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HammingLayout {
    data_bits: u32,
    parity_bits: u32,
}

impl HammingLayout {
    /// Smallest layout with `2^r >= m + r + 1`.
    pub const fn new(data_bits: u32) -> Self {
        let mut parity_bits = 1;
        while (1u64 << parity_bits) < (data_bits + parity_bits + 1) as u64 {
            parity_bits += 1;
        }
        Self { data_bits, parity_bits }
    }

    /// Data bits `m`.
    pub const fn data_bits(&self) -> u32 {
        self.data_bits
    }

    /// Parity bits `r`.
    pub const fn parity_bits(&self) -> u32 {
        self.parity_bits
    }

    /// Codeword length `n = m + r`.
    pub const fn total_bits(&self) -> u32 {
        self.data_bits + self.parity_bits
    }

    /// Places data and parity bits at their codeword positions (bit 0 unused).
    pub fn scatter(&self, word: u64, parity: u128) -> u128 {
        let mut codeword = 0u128;
        let (mut d, mut p) = (0, 0);
        for pos in 1..=self.total_bits() {
            let bit = if pos.is_power_of_two() {
                p += 1;
                (parity >> (p - 1)) & 1
            } else {
                d += 1;
                u128::from((word >> (d - 1)) & 1)
            };
            codeword |= bit << pos;
        }
        codeword
    }

    /// Extracts the data bits of a codeword.
    pub fn gather(&self, codeword: u128) -> u64 {
        let mut word = 0u64;
        let mut d = 0;
        for pos in 1..=self.total_bits() {
            if !pos.is_power_of_two() {
                word |= (((codeword >> pos) & 1) as u64) << d;
                d += 1;
            }
        }
        word
    }

    /// XOR of the positions of all set bits in `1..=n`.
    pub fn syndrome(&self, codeword: u128) -> u32 {
        (1..=self.total_bits())
            .filter(|&pos| (codeword >> pos) & 1 == 1)
            .fold(0, |acc, pos| acc ^ pos)
    }

    /// Parity bits that zero the syndrome of `word`'s codeword.
    pub fn parity_for(&self, word: u64) -> u128 {
        u128::from(self.syndrome(self.scatter(word, 0)))
    }
}

/// Hamming SEC codec.
#[derive(Debug, Clone, Copy)]
pub struct HammingCodec {
    layout: HammingLayout,
}

impl HammingCodec {
    /// Creates a Hamming codec for `word_bits`-wide words.
    pub const fn new(word_bits: u32) -> Self {
        Self { layout: HammingLayout::new(word_bits) }
    }

    /// Codeword layout.
    pub const fn layout(&self) -> HammingLayout {
        self.layout
    }
}

impl EccCodec for HammingCodec {
    fn scheme(&self) -> EccScheme {
        EccScheme::Hamming
    }

    fn word_bits(&self) -> u32 {
        self.layout.data_bits()
    }

    fn check_bits(&self) -> u32 {
        self.layout.parity_bits()
    }

    fn encode_word(&self, word: u64) -> u128 {
        self.layout.parity_for(word & word_mask(self.layout.data_bits()))
    }

    fn decode_word(&self, word: u64, check: u128) -> (u64, DecodeStatus) {
        let word = word & word_mask(self.layout.data_bits());
        let mut codeword = self.layout.scatter(word, check & check_mask(self.check_bits()));
        match self.layout.syndrome(codeword) {
            0 => (word, DecodeStatus::Ok),
            s if s <= self.layout.total_bits() => {
                codeword ^= 1u128 << s;
                (self.layout.gather(codeword), DecodeStatus::Corrected)
            }
            _ => (word, DecodeStatus::DetectedUncorrectable),
        }
    }

    /// An out-of-range syndrome is a correction that went wrong, not a detection.
    fn judge(&self, status: DecodeStatus, matches_reference: bool) -> FaultVerdict {
        match (status, matches_reference) {
            (DecodeStatus::Ok, true) => FaultVerdict::NoError,
            (DecodeStatus::Corrected, true) => FaultVerdict::Corrected,
            (DecodeStatus::Corrected | DecodeStatus::DetectedUncorrectable, _) => {
                FaultVerdict::FailedCorrection
            }
            (DecodeStatus::Ok | DecodeStatus::UndetectedMismatch, _) => FaultVerdict::Undetected,
        }
    }
}
