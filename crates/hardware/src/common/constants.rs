//! Simulator-wide constants.

/// Maximum number of cache levels in a hierarchy.
pub const MAX_LEVELS: usize = 3;

/// Word widths (in bits) accepted for codec segmentation.
pub const SUPPORTED_WORD_BITS: [u32; 4] = [8, 16, 32, 64];

/// Returns a mask covering the low `bits` bits of a `u64`.
#[inline]
pub const fn word_mask(bits: u32) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}

/// SplitMix64 finalizer.
///
/// Used for the memory background pattern and for synthesized store values;
/// it is a pure function of its input so traces replay identically.
#[inline]
pub const fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}
