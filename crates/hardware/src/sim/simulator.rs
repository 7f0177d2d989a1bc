//! Simulator: owns the cache hierarchy and the observer side-by-side.
//!
//! The hierarchy buffers events while it works; the simulator drains them to
//! the observer after each operation and each injection round, so the
//! observer never needs a reference into the hierarchy.

use std::fmt;
use std::path::Path;

use super::hierarchy::CacheHierarchy;
use super::observer::{AccessRecord, NullObserver, SimObserver};
use super::trace::{self, Trace, TraceOp};
use crate::common::{AccessType, ConfigError, SimResult};
use crate::config::Config;
use crate::core::units::fault::InjectionReport;
use crate::stats::SimStats;

/// Outcome of running a whole trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records executed.
    pub executed: u64,
    /// Malformed records skipped.
    pub skipped: u64,
    /// Injection rounds performed.
    pub injection_rounds: u64,
}

/// Top-level simulator: hierarchy + reporting sink + injection interval.
pub struct Simulator {
    hierarchy: CacheHierarchy,
    observer: Box<dyn SimObserver>,
    fault_interval: u64,
    operations: u64,
    injection_rounds: u64,
}

impl fmt::Debug for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("hierarchy", &self.hierarchy)
            .field("fault_interval", &self.fault_interval)
            .field("operations", &self.operations)
            .finish_non_exhaustive()
    }
}

impl Simulator {
    /// Creates a simulator with a [`NullObserver`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            hierarchy: CacheHierarchy::new(config)?,
            observer: Box::new(NullObserver),
            fault_interval: config.fault.interval,
            operations: 0,
            injection_rounds: 0,
        })
    }

    /// Replaces the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn SimObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Executes one operation and notifies the observer.
    ///
    /// When a fault interval is configured, an injection round runs after
    /// every `interval`-th operation.
    pub fn step(&mut self, address: u64, op: AccessType) -> AccessRecord {
        let record = self.hierarchy.execute(address, op);
        self.operations += 1;
        self.flush_events();
        self.observer.on_access(&record, self.hierarchy.stats());

        if self.fault_interval > 0 && self.operations % self.fault_interval == 0 {
            let _ = self.inject_faults();
        }
        record
    }

    /// Runs one configured injection round now.
    pub fn inject_faults(&mut self) -> InjectionReport {
        self.injection_rounds += 1;
        let report = self.hierarchy.inject_faults();
        self.flush_events();
        report
    }

    /// Executes a sequence of parsed records.
    pub fn run<I>(&mut self, ops: I) -> RunSummary
    where
        I: IntoIterator<Item = TraceOp>,
    {
        let rounds_before = self.injection_rounds;
        let mut executed = 0;
        for op in ops {
            let _ = self.step(op.address, op.op);
            executed += 1;
        }
        RunSummary {
            executed,
            skipped: 0,
            injection_rounds: self.injection_rounds - rounds_before,
        }
    }

    /// Executes a parsed trace, counting its skipped records.
    pub fn run_trace(&mut self, trace: Trace) -> RunSummary {
        let skipped = trace.errors.len() as u64;
        RunSummary { skipped, ..self.run(trace.ops) }
    }

    /// Loads, parses and executes a trace file.
    ///
    /// # Returns
    ///
    /// The run summary, or an error if the file cannot be read.
    pub fn run_trace_file(&mut self, path: &Path) -> SimResult<RunSummary> {
        let trace = trace::load_trace(path)?;
        Ok(self.run_trace(trace))
    }

    fn flush_events(&mut self) {
        for event in self.hierarchy.take_events() {
            self.observer.on_event(&event);
        }
    }

    /// Statistics snapshot.
    pub const fn stats(&self) -> &SimStats {
        self.hierarchy.stats()
    }

    /// The simulated hierarchy.
    pub const fn hierarchy(&self) -> &CacheHierarchy {
        &self.hierarchy
    }

    /// The simulated hierarchy, mutable (for targeted experiments).
    pub const fn hierarchy_mut(&mut self) -> &mut CacheHierarchy {
        &mut self.hierarchy
    }

    /// Operations executed so far.
    pub const fn operations(&self) -> u64 {
        self.operations
    }
}
