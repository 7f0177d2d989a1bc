//! Storage and protection units of the cache hierarchy.
//!
//! This module contains the building blocks the hierarchy composes:
//! 1. **Cache:** Per-level set-associative storage and replacement policies.
//! 2. **ECC:** Parity, Hamming, SEC-DED and MLREPS codecs.
//! 3. **Fault:** Bit-flip injection into protected lines.
//! 4. **Write-Back:** Early and emergency flush scheduling.

/// Set-associative cache level storage.
pub mod cache;

/// Error-correcting codes.
pub mod ecc;

/// Fault injection.
pub mod fault;

/// Early / emergency write-back scheduling.
pub mod writeback;
