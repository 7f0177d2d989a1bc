//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the simulator. It includes:
//! 1. **Address Decoding:** Tag / set-index / offset decomposition for one cache level.
//! 2. **Constants:** Hierarchy limits and supported codec word widths.
//! 3. **Memory Access:** The read/write classification of trace operations.
//! 4. **Error Handling:** Configuration, trace-parse, and top-level simulation errors.

/// Address decomposition for set-associative levels.
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types for configuration, trace parsing, and simulation setup.
pub mod error;

pub use addr::{AddressDecoder, DecodedAddress};
pub use constants::{MAX_LEVELS, SUPPORTED_WORD_BITS};
pub use data::AccessType;
pub use error::{ConfigError, SimError, SimResult, TraceParseError};

/// Random number generator owned by a simulation instance.
///
/// Every randomized component (RAND replacement, fault injection) draws from
/// one seeded instance so a run is reproducible from its seed.
pub type SimRng = rand_chacha::ChaCha8Rng;
