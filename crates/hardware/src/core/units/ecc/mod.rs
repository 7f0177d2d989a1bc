//! Error-Correcting Codes for protected cache lines.
//!
//! This module implements the interchangeable codecs applied to the last cache
//! level. It provides:
//! 1. **Codec Contract:** [`EccCodec`] with per-word `encode_word`/`decode_word`
//!    and line-level `encode`/`decode` built on top of them.
//! 2. **Schemes:** Parity, Hamming (SEC), SEC-DED, MLREPS, and a pass-through.
//! 3. **Ground-Truth Checking:** [`decode_checked`] compares a decode against the
//!    line's reference copy and classifies the outcome as a [`FaultVerdict`].
//!
//! Words are `word_bits` wide (8, 16, 32 or 64). Check bits of one word are
//! packed into a `u128`, low bit first.

/// Hamming single-error-correcting code.
pub mod hamming;

/// Majority-vote triple redundancy.
pub mod mlreps;

/// Even parity, one bit per word.
pub mod parity;

/// Hamming plus overall parity.
pub mod secded;

pub use hamming::HammingCodec;
pub use mlreps::MlrepsCodec;
pub use parity::ParityCodec;
pub use secded::SecDedCodec;

use std::fmt::Debug;

use crate::common::constants::word_mask;
use crate::config::EccScheme;

/// Outcome reported by a decode.
///
/// Variants are ordered by severity; a line reports its most severe word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecodeStatus {
    /// Code bits consistent with the data.
    Ok,
    /// An error was located and repaired.
    Corrected,
    /// An error was detected but cannot be repaired; data is returned as stored.
    DetectedUncorrectable,
    /// The decoded data differs from ground truth although the codec did not
    /// flag it. Only observable by comparison with a reference copy.
    UndetectedMismatch,
}

/// Fault-accounting classification of a decode checked against ground truth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaultVerdict {
    /// No error present.
    NoError,
    /// Error present and repaired to the correct value.
    Corrected,
    /// Error detected, not repaired.
    Detected,
    /// The codec attempted a repair and produced wrong data, or could not
    /// make sense of its syndrome.
    FailedCorrection,
    /// Wrong data delivered with no indication of an error.
    Undetected,
}

/// Result of [`decode_checked`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineDecode {
    /// Decoded (possibly corrected) words.
    pub data: Vec<u64>,
    /// Status reported by the codec itself.
    pub status: DecodeStatus,
    /// Classification against the reference copy.
    pub verdict: FaultVerdict,
}

impl LineDecode {
    /// Codec status refined by the ground-truth comparison.
    ///
    /// A decode the codec reported as `Ok` or `Corrected` that still differs
    /// from the reference becomes [`DecodeStatus::UndetectedMismatch`].
    pub const fn checked_status(&self) -> DecodeStatus {
        match (self.status, self.verdict) {
            (
                DecodeStatus::Ok | DecodeStatus::Corrected,
                FaultVerdict::Undetected | FaultVerdict::FailedCorrection,
            ) => DecodeStatus::UndetectedMismatch,
            (status, _) => status,
        }
    }

    /// `true` when the codec itself noticed something (repair or detection).
    pub const fn error_signalled(&self) -> bool {
        matches!(self.status, DecodeStatus::Corrected | DecodeStatus::DetectedUncorrectable)
    }
}

/// A per-word error detecting/correcting code.
pub trait EccCodec: Send + Sync + Debug {
    /// Scheme implemented by this codec.
    fn scheme(&self) -> EccScheme;

    /// Data bits per word.
    fn word_bits(&self) -> u32;

    /// Check bits stored per word.
    fn check_bits(&self) -> u32;

    /// Computes the check bits of one word.
    fn encode_word(&self, word: u64) -> u128;

    /// Decodes one word against its check bits.
    ///
    /// # Returns
    ///
    /// The (possibly corrected) word and the codec's status.
    fn decode_word(&self, word: u64, check: u128) -> (u64, DecodeStatus);

    /// Classifies a decode once the true data is known.
    ///
    /// # Arguments
    ///
    /// * `status` - Status reported by [`EccCodec::decode`].
    /// * `matches_reference` - Whether the decoded data equals ground truth.
    fn judge(&self, status: DecodeStatus, matches_reference: bool) -> FaultVerdict {
        match (status, matches_reference) {
            (DecodeStatus::Ok, true) => FaultVerdict::NoError,
            (DecodeStatus::Corrected, true) => FaultVerdict::Corrected,
            (DecodeStatus::Corrected, false) => FaultVerdict::FailedCorrection,
            (DecodeStatus::DetectedUncorrectable, _) => FaultVerdict::Detected,
            (DecodeStatus::Ok | DecodeStatus::UndetectedMismatch, _) => FaultVerdict::Undetected,
        }
    }

    /// Encodes every word of a line.
    fn encode(&self, data: &[u64]) -> Vec<u128> {
        data.iter().map(|&word| self.encode_word(word)).collect()
    }

    /// Decodes every word of a line.
    ///
    /// # Returns
    ///
    /// The decoded words and the most severe word status.
    fn decode(&self, data: &[u64], check: &[u128]) -> (Vec<u64>, DecodeStatus) {
        let mut worst = DecodeStatus::Ok;
        let decoded = data
            .iter()
            .zip(check)
            .map(|(&word, &bits)| {
                let (fixed, status) = self.decode_word(word, bits);
                worst = worst.max(status);
                fixed
            })
            .collect();
        (decoded, worst)
    }
}

/// Pass-through codec used when protection is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NoCodec {
    word_bits: u32,
}

impl NoCodec {
    /// Creates a pass-through codec for `word_bits`-wide words.
    pub const fn new(word_bits: u32) -> Self {
        Self { word_bits }
    }
}

impl EccCodec for NoCodec {
    fn scheme(&self) -> EccScheme {
        EccScheme::None
    }

    fn word_bits(&self) -> u32 {
        self.word_bits
    }

    fn check_bits(&self) -> u32 {
        0
    }

    fn encode_word(&self, _word: u64) -> u128 {
        0
    }

    fn decode_word(&self, word: u64, _check: u128) -> (u64, DecodeStatus) {
        (word & word_mask(self.word_bits), DecodeStatus::Ok)
    }
}

/// Instantiates the codec for `scheme`.
pub fn build(scheme: EccScheme, word_bits: u32) -> Box<dyn EccCodec> {
    match scheme {
        EccScheme::None => Box::new(NoCodec::new(word_bits)),
        EccScheme::Parity => Box::new(ParityCodec::new(word_bits)),
        EccScheme::Hamming => Box::new(HammingCodec::new(word_bits)),
        EccScheme::SecDed => Box::new(SecDedCodec::new(word_bits)),
        EccScheme::Mlreps => Box::new(MlrepsCodec::new(word_bits)),
    }
}

/// Decodes a line and classifies the result against its reference copy.
///
/// # Arguments
///
/// * `codec` - Codec the line was encoded with.
/// * `data` - Stored words.
/// * `check` - Stored check bits.
/// * `reference` - Fault-free words.
pub fn decode_checked(
    codec: &dyn EccCodec,
    data: &[u64],
    check: &[u128],
    reference: &[u64],
) -> LineDecode {
    let (decoded, status) = codec.decode(data, check);
    let verdict = codec.judge(status, decoded == reference);
    LineDecode { data: decoded, status, verdict }
}

/// Masks a `u128` down to its low `bits` bits.
#[inline]
pub(crate) const fn check_mask(bits: u32) -> u128 {
    if bits >= 128 { u128::MAX } else { (1u128 << bits) - 1 }
}
