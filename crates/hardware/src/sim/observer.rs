//! Reporting interface between the simulation and its front end.
//!
//! The simulation never renders anything. After each trace operation it
//! hands an [`AccessRecord`] and a statistics snapshot to a [`SimObserver`],
//! and forwards the notable [`SimEvent`]s raised while the operation (or an
//! injection round) ran. Both callbacks default to no-ops.

use crate::common::AccessType;
use crate::core::units::ecc::FaultVerdict;
use crate::stats::SimStats;

/// Where the data of an access came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServedBy {
    /// A cache level (0 = L1).
    Level(usize),
    /// Main memory.
    Memory,
}

/// Summary of one executed trace operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRecord {
    /// Tick at which the operation ran (1-based).
    pub tick: u64,
    /// Accessed address.
    pub address: u64,
    /// Read or write.
    pub op: AccessType,
    /// Innermost component that held the data.
    pub served_by: ServedBy,
    /// Latency charged to the operation.
    pub cycles: u64,
}

impl AccessRecord {
    /// `true` when L1 held the line.
    pub fn l1_hit(&self) -> bool {
        self.served_by == ServedBy::Level(0)
    }
}

/// Why a batch of protected lines was written to memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlushKind {
    /// Periodic early write-back.
    Early,
    /// Reactive emergency write-back.
    Emergency,
}

/// Notable internal events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    /// A valid line was displaced.
    Eviction {
        /// Level index.
        level: usize,
        /// Base address of the displaced line.
        address: u64,
        /// The line was written back first.
        dirty: bool,
    },
    /// A decode of a protected line saw an error.
    Decode {
        /// Level index.
        level: usize,
        /// Base address of the line.
        address: u64,
        /// Line state at decode time.
        dirty: bool,
        /// Classification of the decode.
        verdict: FaultVerdict,
    },
    /// Dirty protected lines were flushed to memory.
    Flush {
        /// Early or emergency.
        kind: FlushKind,
        /// Lines written.
        lines: u64,
        /// Lines whose data could not be decoded.
        failed: u64,
    },
    /// An emergency request arrived during the cooldown.
    EmergencySuppressed {
        /// Tick of the request.
        tick: u64,
    },
    /// A fault injection round finished.
    Injection {
        /// Bits flipped.
        injected: u64,
        /// Attempts that found no valid line.
        failed_attempts: u64,
    },
}

/// Sink for simulation notifications.
pub trait SimObserver {
    /// Called after every trace operation.
    ///
    /// # Arguments
    ///
    /// * `record` - The operation just executed.
    /// * `stats` - Statistics including that operation.
    fn on_access(&mut self, record: &AccessRecord, stats: &SimStats) {
        let _ = (record, stats);
    }

    /// Called for every event, in the order raised.
    fn on_event(&mut self, event: &SimEvent) {
        let _ = event;
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SimObserver for NullObserver {}
