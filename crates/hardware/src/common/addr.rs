//! Address decomposition for set-associative cache levels.
//!
//! An address is split as `| tag | set index | offset |`. This module provides:
//! 1. **Geometry Validation:** Power-of-two sizes and way/line-count divisibility.
//! 2. **Decoding:** Extracting tag, set index, and byte offset from an address.
//! 3. **Composition:** Rebuilding a line base address from a tag and set index.

use super::error::ConfigError;

/// Result of decoding an address against one level's geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddress {
    /// Tag bits (address shifted past offset and set index).
    pub tag: u64,
    /// Set index.
    pub set: usize,
    /// Byte offset within the line.
    pub offset: u64,
}

/// Splits addresses into tag / set / offset for a given level geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    offset_bits: u32,
    set_bits: u32,
    sets: usize,
    ways: usize,
    line_bytes: u64,
}

#[inline]
const fn is_pow_2(value: u64) -> bool {
    value != 0 && value & (value - 1) == 0
}

impl AddressDecoder {
    /// Builds a decoder for a level of `size_bytes` total capacity.
    ///
    /// # Arguments
    ///
    /// * `level` - Level index, used only for error reporting.
    /// * `size_bytes` - Total capacity of the level.
    /// * `line_bytes` - Line size.
    /// * `ways` - Associativity.
    ///
    /// # Returns
    ///
    /// The decoder, or a [`ConfigError`] when any dimension is zero or not a
    /// power of two, the line is larger than the level, or `ways` does not
    /// divide the line count.
    pub fn new(
        level: usize,
        size_bytes: u64,
        line_bytes: u64,
        ways: u64,
    ) -> Result<Self, ConfigError> {
        for (field, value) in [("size_bytes", size_bytes), ("line_bytes", line_bytes), ("ways", ways)]
        {
            if !is_pow_2(value) {
                return Err(ConfigError::NotPowerOfTwo { level, field, value });
            }
        }
        if line_bytes > size_bytes {
            return Err(ConfigError::LineLargerThanLevel { level, line_bytes, size_bytes });
        }
        let lines = size_bytes / line_bytes;
        if lines % ways != 0 {
            return Err(ConfigError::WaysDoNotDivide { level, ways, lines });
        }
        let sets = lines / ways;
        Ok(Self {
            offset_bits: line_bytes.trailing_zeros(),
            set_bits: sets.trailing_zeros(),
            sets: sets as usize,
            ways: ways as usize,
            line_bytes,
        })
    }

    /// Decodes `address` into tag, set index and offset.
    #[inline]
    pub const fn decode(&self, address: u64) -> DecodedAddress {
        DecodedAddress {
            tag: self.tag(address),
            set: self.set_index(address),
            offset: address & (self.line_bytes - 1),
        }
    }

    /// Set index: `(address >> offset_bits) & (sets - 1)`.
    #[inline]
    pub const fn set_index(&self, address: u64) -> usize {
        ((address >> self.offset_bits) & (self.sets as u64 - 1)) as usize
    }

    /// Tag: `address >> (offset_bits + set_bits)`.
    #[inline]
    pub const fn tag(&self, address: u64) -> u64 {
        address >> (self.offset_bits + self.set_bits)
    }

    /// Base address of the line containing `address`.
    #[inline]
    pub const fn line_base(&self, address: u64) -> u64 {
        address & !(self.line_bytes - 1)
    }

    /// Rebuilds the base address of a line from its tag and set index.
    #[inline]
    pub const fn compose(&self, tag: u64, set: usize) -> u64 {
        (tag << (self.offset_bits + self.set_bits)) | ((set as u64) << self.offset_bits)
    }

    /// Number of offset bits (`log2(line_bytes)`).
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Number of set-index bits (`log2(sets)`).
    pub const fn set_bits(&self) -> u32 {
        self.set_bits
    }

    /// Number of sets.
    pub const fn sets(&self) -> usize {
        self.sets
    }

    /// Associativity.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Line size in bytes.
    pub const fn line_bytes(&self) -> u64 {
        self.line_bytes
    }
}
