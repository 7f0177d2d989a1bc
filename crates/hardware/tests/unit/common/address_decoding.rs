//! # Address Decoding Tests
//!
//! Verifies tag / set / offset decomposition, base-address reconstruction and
//! the geometry checks performed when a decoder is built.

use ftcache_core::common::{AddressDecoder, ConfigError};
use pretty_assertions::assert_eq;

/// 128 B, 16 B lines, 2 ways: 8 lines in 4 sets.
fn decoder() -> AddressDecoder {
    AddressDecoder::new(0, 128, 16, 2).unwrap()
}

// ══════════════════════════════════════════════════════════
// 1. Geometry
// ══════════════════════════════════════════════════════════

#[test]
fn derived_shift_counts() {
    let d = decoder();
    assert_eq!(d.offset_bits(), 4);
    assert_eq!(d.set_bits(), 2);
    assert_eq!(d.sets(), 4);
    assert_eq!(d.ways(), 2);
    assert_eq!(d.line_bytes(), 16);
}

#[test]
fn fully_associative_has_no_set_bits() {
    let d = AddressDecoder::new(0, 64, 16, 4).unwrap();
    assert_eq!(d.sets(), 1);
    assert_eq!(d.set_bits(), 0);
    assert_eq!(d.set_index(0xFFFF_FFF0), 0);
    assert_eq!(d.tag(0x40), 0x40 >> 4);
}

// ══════════════════════════════════════════════════════════
// 2. Decomposition
// ══════════════════════════════════════════════════════════

#[test]
fn decode_splits_fields() {
    let fields = decoder().decode(0x1234);
    assert_eq!(fields.offset, 0x4);
    assert_eq!(fields.set, 3);
    assert_eq!(fields.tag, 0x48);
}

#[test]
fn same_set_stride_is_sets_times_line() {
    let d = decoder();
    for n in 0..8 {
        let addr = n * 64;
        assert_eq!(d.set_index(addr), 0, "addr {addr:#x}");
        assert_eq!(d.tag(addr), n);
    }
}

#[test]
fn compose_rebuilds_line_base() {
    let d = decoder();
    for addr in [0u64, 0x10, 0x1234, 0xDEAD_BEEF, u64::from(u32::MAX)] {
        let fields = d.decode(addr);
        assert_eq!(d.compose(fields.tag, fields.set), d.line_base(addr));
        assert_eq!(d.line_base(addr) + fields.offset, addr);
    }
}

// ══════════════════════════════════════════════════════════
// 3. Invalid Geometry
// ══════════════════════════════════════════════════════════

#[test]
fn rejects_non_power_of_two_size() {
    let err = AddressDecoder::new(1, 100, 16, 2).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::NotPowerOfTwo { level: 1, field: "size_bytes", value: 100 }
    ));
}

#[test]
fn rejects_zero_ways() {
    let err = AddressDecoder::new(0, 128, 16, 0).unwrap_err();
    assert!(matches!(err, ConfigError::NotPowerOfTwo { field: "ways", .. }));
}

#[test]
fn rejects_line_larger_than_level() {
    let err = AddressDecoder::new(0, 64, 128, 1).unwrap_err();
    assert!(matches!(err, ConfigError::LineLargerThanLevel { line_bytes: 128, size_bytes: 64, .. }));
}

#[test]
fn rejects_ways_exceeding_line_count() {
    let err = AddressDecoder::new(0, 128, 16, 16).unwrap_err();
    assert!(matches!(err, ConfigError::WaysDoNotDivide { ways: 16, lines: 8, .. }));
}
