//! # Codec Property Tests
//!
//! Properties every scheme must satisfy, checked over random words:
//! a fault-free round trip is `Ok`, and the correcting schemes repair any
//! single flipped bit.

use ftcache_core::config::EccScheme;
use ftcache_core::core::units::ecc::{self, DecodeStatus, FaultVerdict};
use proptest::prelude::*;
use rstest::rstest;

const SCHEMES: [EccScheme; 5] =
    [EccScheme::None, EccScheme::Parity, EccScheme::Hamming, EccScheme::SecDed, EccScheme::Mlreps];

#[rstest]
fn check_widths(
    #[values(8, 16, 32, 64)] word_bits: u32,
) {
    let width = |scheme| ecc::build(scheme, word_bits).check_bits();
    assert_eq!(width(EccScheme::None), 0);
    assert_eq!(width(EccScheme::Parity), 1);
    assert_eq!(width(EccScheme::SecDed), width(EccScheme::Hamming) + 1);
    assert_eq!(width(EccScheme::Mlreps), 2 * word_bits);
}

#[rstest]
fn build_reports_scheme(#[values(8, 32)] word_bits: u32) {
    for scheme in SCHEMES {
        let codec = ecc::build(scheme, word_bits);
        assert_eq!(codec.scheme(), scheme);
        assert_eq!(codec.word_bits(), word_bits);
    }
}

proptest! {
    #[test]
    fn round_trip_is_ok(words in proptest::collection::vec(any::<u32>(), 1..9)) {
        let words: Vec<u64> = words.into_iter().map(u64::from).collect();
        for scheme in SCHEMES {
            let codec = ecc::build(scheme, 32);
            let check = codec.encode(&words);
            let result = ecc::decode_checked(codec.as_ref(), &words, &check, &words);
            prop_assert_eq!(result.status, DecodeStatus::Ok);
            prop_assert_eq!(result.verdict, FaultVerdict::NoError);
            prop_assert_eq!(&result.data, &words);
        }
    }

    #[test]
    fn single_flip_is_repaired(word in any::<u64>(), pos in any::<u32>(), wide in any::<bool>()) {
        let word_bits = if wide { 64 } else { 16 };
        let word = word & if wide { u64::MAX } else { 0xFFFF };
        for scheme in [EccScheme::Hamming, EccScheme::SecDed, EccScheme::Mlreps] {
            let codec = ecc::build(scheme, word_bits);
            let check = codec.encode_word(word);
            let bit = pos % (word_bits + codec.check_bits());
            let (data, check) = if bit < word_bits {
                (word ^ (1 << bit), check)
            } else {
                (word, check ^ (1 << (bit - word_bits)))
            };
            let (decoded, status) = codec.decode_word(data, check);
            prop_assert_eq!(status, DecodeStatus::Corrected);
            prop_assert_eq!(decoded, word);
        }
    }

    #[test]
    fn parity_detects_any_single_flip(word in any::<u32>(), bit in 0u32..33) {
        let codec = ecc::build(EccScheme::Parity, 32);
        let word = u64::from(word);
        let check = codec.encode_word(word);
        let (data, check) = if bit < 32 { (word ^ (1 << bit), check) } else { (word, check ^ 1) };
        prop_assert_eq!(codec.decode_word(data, check).1, DecodeStatus::DetectedUncorrectable);
    }
}
