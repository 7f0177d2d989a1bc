//! SEC-DED: Hamming plus an overall parity bit.
//!
//! Check bits are the `r` Hamming parity bits followed by one overall parity
//! bit covering the whole codeword. With `s` the syndrome and `p` the overall
//! parity of the received bits:
//!
//! | s      | p | meaning                                   |
//! |--------|---|-------------------------------------------|
//! | 0      | 0 | no error                                  |
//! | 0      | 1 | overall parity bit flipped, data intact   |
//! | 1..=n  | 1 | single error at `s`, corrected            |
//! | > n    | 1 | odd multi-bit error, uncorrectable        |
//! | != 0   | 0 | double error, detected and left untouched |

use super::hamming::HammingLayout;
use super::{DecodeStatus, EccCodec, check_mask};
use crate::common::constants::word_mask;
use crate::config::EccScheme;

/// SEC-DED codec.
#[derive(Debug, Clone, Copy)]
pub struct SecDedCodec {
    layout: HammingLayout,
}

impl SecDedCodec {
    /// Creates a SEC-DED codec for `word_bits`-wide words.
    pub const fn new(word_bits: u32) -> Self {
        Self { layout: HammingLayout::new(word_bits) }
    }

    const fn overall_shift(&self) -> u32 {
        self.layout.parity_bits()
    }
}

impl EccCodec for SecDedCodec {
    fn scheme(&self) -> EccScheme {
        EccScheme::SecDed
    }

    fn word_bits(&self) -> u32 {
        self.layout.data_bits()
    }

    fn check_bits(&self) -> u32 {
        self.layout.parity_bits() + 1
    }

    fn encode_word(&self, word: u64) -> u128 {
        let word = word & word_mask(self.layout.data_bits());
        let parity = self.layout.parity_for(word);
        let overall = u128::from(self.layout.scatter(word, parity).count_ones() & 1);
        parity | (overall << self.overall_shift())
    }

    fn decode_word(&self, word: u64, check: u128) -> (u64, DecodeStatus) {
        let word = word & word_mask(self.layout.data_bits());
        let mut codeword =
            self.layout.scatter(word, check & check_mask(self.layout.parity_bits()));
        let stored_overall = ((check >> self.overall_shift()) & 1) as u32;
        let odd = (codeword.count_ones() + stored_overall) & 1 == 1;
        let syndrome = self.layout.syndrome(codeword);

        match (syndrome, odd) {
            (0, false) => (word, DecodeStatus::Ok),
            (0, true) => (word, DecodeStatus::Corrected),
            (s, true) if s <= self.layout.total_bits() => {
                codeword ^= 1u128 << s;
                (self.layout.gather(codeword), DecodeStatus::Corrected)
            }
            _ => (word, DecodeStatus::DetectedUncorrectable),
        }
    }
}
