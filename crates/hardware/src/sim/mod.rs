//! Trace-driven simulation.
//!
//! Ties the storage units into a working hierarchy and drives it:
//! 1. **Hierarchy:** Access resolution, write-back and protection across levels.
//! 2. **Memory:** The authoritative backing store.
//! 3. **Trace:** Parsing `<address> <op>` records.
//! 4. **Observer:** The reporting interface towards a front end.
//! 5. **Simulator:** Runs traces, schedules fault injection, forwards events.

/// Multi-level cache hierarchy.
pub mod hierarchy;

/// Main memory model.
pub mod memory;

/// Reporting interface.
pub mod observer;

/// Simulator driver.
pub mod simulator;

/// Trace parsing.
pub mod trace;

pub use hierarchy::CacheHierarchy;
pub use memory::MainMemory;
pub use observer::{AccessRecord, FlushKind, NullObserver, ServedBy, SimEvent, SimObserver};
pub use simulator::{RunSummary, Simulator};
pub use trace::{Trace, TraceOp};
