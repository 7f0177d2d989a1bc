//! Fault-tolerant cache hierarchy simulator library.
//!
//! This crate implements a trace-driven, multi-level cache simulator with the following:
//! 1. **Storage:** Set-associative levels with FIFO, LRU and random replacement.
//! 2. **Protection:** Parity, Hamming, SEC-DED and MLREPS codes on the last level.
//! 3. **Faults:** Single-bit and burst injection into data or check bits.
//! 4. **Write-Back:** Eviction, periodic early and reactive emergency flushing.
//! 5. **Simulation:** Trace parsing, configuration, statistics and an observer interface.

/// Common types and constants (addresses, access types, errors).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Hierarchy building blocks (cache levels, codecs, fault injection, write-back timing).
pub mod core;
/// Hierarchy orchestration, memory, traces, observers and the simulator driver.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Multi-level cache hierarchy; executes one trace operation at a time.
pub use crate::sim::CacheHierarchy;
/// Top-level driver; owns the hierarchy and the observer.
pub use crate::sim::Simulator;
/// Statistics snapshot.
pub use crate::stats::SimStats;
