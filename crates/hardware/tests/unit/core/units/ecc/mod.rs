//! Codec tests.


/// MLREPS majority vote.
pub mod mlreps;


/// Cross-scheme properties.
pub mod properties;
