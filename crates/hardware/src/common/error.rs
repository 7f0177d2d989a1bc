//! Error definitions.
//!
//! This module defines the error taxonomy of the simulator. It provides:
//! 1. **Configuration Errors:** Fatal, raised before any trace record is processed.
//! 2. **Trace Parse Errors:** Per-record and recoverable; the record is skipped.
//! 3. **Simulation Errors:** The top-level error returned by setup and I/O paths.
//!
//! Faults detected while decoding protected data are *not* errors: they are
//! absorbed into [`FaultStats`](crate::stats::FaultStats) and never abort a run.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid configuration, detected before simulation starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A geometry field is zero or not a power of two.
    #[error("level {level}: {field} = {value} is not a positive power of two")]
    NotPowerOfTwo {
        /// Level index (0 = L1).
        level: usize,
        /// Offending field name.
        field: &'static str,
        /// Offending value.
        value: u64,
    },

    /// The line size exceeds the level capacity.
    #[error("level {level}: line size {line_bytes} exceeds level size {size_bytes}")]
    LineLargerThanLevel {
        /// Level index.
        level: usize,
        /// Configured line size.
        line_bytes: u64,
        /// Configured level size.
        size_bytes: u64,
    },

    /// Associativity does not evenly divide the number of lines.
    #[error("level {level}: {ways} ways do not divide {lines} lines")]
    WaysDoNotDivide {
        /// Level index.
        level: usize,
        /// Configured associativity.
        ways: u64,
        /// Number of lines in the level.
        lines: u64,
    },

    /// Wrong number of cache levels.
    #[error("hierarchy needs between 1 and {max} levels, got {got}")]
    LevelCount {
        /// Number of configured levels.
        got: usize,
        /// Maximum supported levels.
        max: usize,
    },

    /// A lower level has a smaller line than the level above it.
    #[error("level {level}: line size {line_bytes} is smaller than {upper_line_bytes} of the level above")]
    LineSizeShrinks {
        /// Level index.
        level: usize,
        /// Line size of this level.
        line_bytes: u64,
        /// Line size of the level above.
        upper_line_bytes: u64,
    },

    /// Codec word width not supported.
    #[error("word width {0} bits is not one of 8, 16, 32, 64")]
    WordBits(u32),

    /// Codec word does not fit in a line.
    #[error("level {level}: line size {line_bytes} bytes cannot hold a {word_bits}-bit word")]
    WordWiderThanLine {
        /// Level index.
        level: usize,
        /// Line size in bytes.
        line_bytes: u64,
        /// Word width in bits.
        word_bits: u32,
    },

    /// Early write-back enabled with a zero period.
    #[error("early write-back requires a non-zero early_period")]
    ZeroEarlyPeriod,

    /// Burst faults requested with a zero burst length.
    #[error("burst fault pattern requires burst_len > 0")]
    ZeroBurstLength,

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A malformed trace record. The record is skipped and simulation continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("trace line {line}: {reason}")]
pub struct TraceParseError {
    /// 1-based line number in the trace.
    pub line: usize,
    /// Human-readable reason.
    pub reason: String,
}

/// Top-level error type for simulator setup and I/O.
#[derive(Error, Debug)]
pub enum SimError {
    /// Configuration rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A trace or configuration file could not be read.
    #[error("failed to read '{0}': {1}")]
    FileRead(PathBuf, #[source] std::io::Error),

    /// Generic I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for results carrying a [`SimError`].
pub type SimResult<T> = Result<T, SimError>;
