//! Memory Access Types.
//!
//! This module defines the classification of memory accesses used throughout the simulator.
//! These types are used for the following:
//! 1. **Trace Decoding:** Mapping read/write markers of a trace record to an operation.
//! 2. **Propagation:** Selecting the read or write path through the hierarchy.
//! 3. **Statistics Tracking:** Categorizing accesses presented to each level.

use std::fmt;
use std::str::FromStr;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Data read access (load).
    Read,

    /// Data write access (store).
    Write,
}

impl AccessType {
    /// Returns `true` for [`AccessType::Write`].
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "R"),
            Self::Write => write!(f, "W"),
        }
    }
}

impl FromStr for AccessType {
    type Err = String;

    /// Parses a trace operation marker.
    ///
    /// Reads are `r`/`l`, writes are `w`/`s` (load/store), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" | "R" | "l" | "L" => Ok(Self::Read),
            "w" | "W" | "s" | "S" => Ok(Self::Write),
            _ => Err(format!(
                "invalid operation '{s}': expected a read (r/l) or write (w/s) marker"
            )),
        }
    }
}
