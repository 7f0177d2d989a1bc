//! # MLREPS Codec Tests
//!
//! Three replicas per word and a bitwise majority vote. One bad replica per
//! bit is outvoted; two bad replicas of the same bit win the vote silently.

use ftcache_core::core::units::ecc::{
    DecodeStatus, EccCodec, FaultVerdict, MlrepsCodec, decode_checked,
};

#[test]
fn check_holds_two_replicas() {
    let codec = MlrepsCodec::new(32);
    assert_eq!(codec.check_bits(), 64);
    assert_eq!(codec.encode_word(0x1234_5678), 0x1234_5678_1234_5678);
}

#[test]
fn one_flipped_replica_is_outvoted() {
    let codec = MlrepsCodec::new(32);
    let word = 0xDEAD_BEEF;
    let check = codec.encode_word(word);
    assert_eq!(codec.decode_word(word ^ 0x10, check), (word, DecodeStatus::Corrected));
    assert_eq!(codec.decode_word(word, check ^ (1 << 5)), (word, DecodeStatus::Corrected));
    assert_eq!(codec.decode_word(word, check ^ (1 << 40)), (word, DecodeStatus::Corrected));
}

#[test]
fn different_bits_in_each_replica_are_all_corrected() {
    let codec = MlrepsCodec::new(16);
    let word = 0xBEEF;
    let check = codec.encode_word(word) ^ (1 << 3) ^ (1 << (16 + 9));
    assert_eq!(codec.decode_word(word ^ 1, check), (word, DecodeStatus::Corrected));
}

#[test]
fn two_flipped_replicas_win_silently() {
    let codec = MlrepsCodec::new(32);
    let reference = vec![0x0000_0000];
    let check = vec![codec.encode_word(0) ^ (1 << 4) ^ (1 << (32 + 4))];

    let result = decode_checked(&codec, &reference, &check, &reference);
    assert_eq!(result.data, vec![1 << 4], "majority is wrong");
    assert_eq!(result.status, DecodeStatus::Corrected);
    assert_eq!(result.verdict, FaultVerdict::Undetected);
    assert_eq!(result.checked_status(), DecodeStatus::UndetectedMismatch);
}
