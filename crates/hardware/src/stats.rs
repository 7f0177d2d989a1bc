//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters of a cache simulation. It provides:
//! 1. **Per-Level:** Reads, writes, hits, misses, evictions, write-backs and
//!    clean/dirty line gauges for every cache level.
//! 2. **Memory:** Line-granular reads and writes reaching main memory.
//! 3. **Fault Tolerance:** Injected bits and the classification of every
//!    decode that saw an error.
//! 4. **Write-Back:** Early and emergency flush rounds and their outcomes.
//!
//! Snapshots are plain data (`Clone`, `Serialize`) so a front end can keep or
//! export them without touching the simulation.

use std::fmt::Write as _;

use serde::Serialize;

/// Counters of one cache level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    /// Read accesses presented to the level.
    pub reads: u64,
    /// Write accesses presented to the level.
    pub writes: u64,
    /// Accesses that found their line.
    pub hits: u64,
    /// Accesses that had to allocate.
    pub misses: u64,
    /// Valid lines displaced by a fill.
    pub evictions: u64,
    /// Dirty data pushed to the next level (eviction or flush).
    pub write_backs: u64,
    /// Valid clean lines after the last operation.
    pub clean_lines: u64,
    /// Valid dirty lines after the last operation.
    pub dirty_lines: u64,
}

impl LevelStats {
    /// Total accesses presented to the level.
    pub const fn accesses(&self) -> u64 {
        self.reads + self.writes
    }

    /// Miss ratio in percent; zero when the level was never accessed.
    pub fn miss_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 { 0.0 } else { self.misses as f64 / total as f64 * 100.0 }
    }
}

/// Main memory traffic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    /// Block reads served by memory.
    pub reads: u64,
    /// Block writes absorbed by memory.
    pub writes: u64,
}

/// Fault-tolerance counters.
///
/// Every decode that finds an error lands in exactly one of `corrected`,
/// `detected_*`, `fail_correct` or `undetected_*`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FaultStats {
    /// Bits flipped by the injector.
    pub injected: u64,
    /// Injection attempts that hit an invalid line.
    pub failed_injections: u64,
    /// Errors repaired to the correct value.
    pub corrected: u64,
    /// Errors detected in clean lines (repaired by refetch).
    ///
    /// Parity locates nothing, so every parity detection lands here, including
    /// detections in dirty lines when the scheme is `Parity`. Those still count
    /// towards `unrecoverable`.
    pub detected_clean: u64,
    /// Errors detected in dirty lines by a locating code (data lost).
    pub detected_dirty: u64,
    /// Repairs that produced wrong data or could not be attempted.
    pub fail_correct: u64,
    /// Corrupted clean data delivered without any error signal.
    pub undetected_clean: u64,
    /// Corrupted dirty data delivered without any error signal.
    pub undetected_dirty: u64,
    /// Accesses that continued with best-effort dirty data.
    pub unrecoverable: u64,
}

impl FaultStats {
    /// Errors detected, clean and dirty.
    pub const fn detected(&self) -> u64 {
        self.detected_clean + self.detected_dirty
    }

    /// Errors that escaped detection, clean and dirty.
    pub const fn undetected(&self) -> u64 {
        self.undetected_clean + self.undetected_dirty
    }
}

/// Early and emergency write-back counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WriteBackStats {
    /// Early flush rounds performed.
    pub early_rounds: u64,
    /// Emergency flush rounds performed.
    pub emergency_rounds: u64,
    /// Emergency requests dropped during a cooldown.
    pub emergency_suppressed: u64,
    /// Lines written to memory by early or emergency rounds.
    pub lines_flushed: u64,
    /// Flushed lines whose data could not be decoded.
    pub failed_write_backs: u64,
}

/// Statistics of one simulation.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SimStats {
    /// Trace operations executed.
    pub operations: u64,
    /// Accumulated access latency in cycles.
    pub cycles: u64,
    /// Per-level counters, L1 first.
    pub levels: Vec<LevelStats>,
    /// Main memory traffic.
    pub memory: MemoryStats,
    /// Fault-tolerance counters.
    pub faults: FaultStats,
    /// Write-back scheduling counters.
    pub write_back: WriteBackStats,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"levels"`, `"faults"`, `"writeback"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "levels", "faults", "writeback"];

const RULE: &str = "==========================================================";
const THIN_RULE: &str = "----------------------------------------------------------";

impl SimStats {
    /// Creates zeroed statistics for `levels` cache levels.
    pub fn new(levels: usize) -> Self {
        Self { levels: vec![LevelStats::default(); levels], ..Self::default() }
    }

    /// Counters of the protected (last) level.
    pub fn protected_level(&self) -> Option<&LevelStats> {
        self.levels.last()
    }

    /// Average cycles per trace operation.
    pub fn average_latency(&self) -> f64 {
        if self.operations == 0 { 0.0 } else { self.cycles as f64 / self.operations as f64 }
    }

    /// Renders the requested sections as text.
    ///
    /// # Arguments
    ///
    /// * `sections` - Section names from [`STATS_SECTIONS`], or empty for all.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let mut out = String::new();

        let _ = writeln!(out, "\n{RULE}");
        let _ = writeln!(out, "CACHE FAULT-TOLERANCE SIMULATION STATISTICS");
        let _ = writeln!(out, "{RULE}");
        if want("summary") {
            let _ = writeln!(out, "sim_ops                  {}", self.operations);
            let _ = writeln!(out, "sim_cycles               {}", self.cycles);
            let _ = writeln!(out, "avg_latency              {:.4}", self.average_latency());
            let _ = writeln!(out, "mem.reads                {}", self.memory.reads);
            let _ = writeln!(out, "mem.writes               {}", self.memory.writes);
            let _ = writeln!(out, "{THIN_RULE}");
        }
        if want("levels") {
            let _ = writeln!(out, "CACHE HIERARCHY");
            for (i, level) in self.levels.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  L{:<5} accesses: {:<10} | hits: {:<10} | miss_rate: {:.2}%",
                    i + 1,
                    level.accesses(),
                    level.hits,
                    level.miss_rate()
                );
                let _ = writeln!(
                    out,
                    "         evictions: {:<9} | write_backs: {:<4} | clean/dirty: {}/{}",
                    level.evictions, level.write_backs, level.clean_lines, level.dirty_lines
                );
            }
            let _ = writeln!(out, "{THIN_RULE}");
        }
        if want("faults") {
            let f = &self.faults;
            let _ = writeln!(out, "FAULT TOLERANCE");
            let _ = writeln!(out, "  fault.injected         {}", f.injected);
            let _ = writeln!(out, "  fault.failed_inject    {}", f.failed_injections);
            let _ = writeln!(out, "  ecc.corrected          {}", f.corrected);
            let _ = writeln!(out, "  ecc.detected_clean     {}", f.detected_clean);
            let _ = writeln!(out, "  ecc.detected_dirty     {}", f.detected_dirty);
            let _ = writeln!(out, "  ecc.fail_correct       {}", f.fail_correct);
            let _ = writeln!(out, "  ecc.undetected_clean   {}", f.undetected_clean);
            let _ = writeln!(out, "  ecc.undetected_dirty   {}", f.undetected_dirty);
            let _ = writeln!(out, "  ecc.unrecoverable      {}", f.unrecoverable);
            let _ = writeln!(out, "{THIN_RULE}");
        }
        if want("writeback") {
            let w = &self.write_back;
            let _ = writeln!(out, "WRITE-BACK");
            let _ = writeln!(out, "  wb.early_rounds        {}", w.early_rounds);
            let _ = writeln!(out, "  wb.emergency_rounds    {}", w.emergency_rounds);
            let _ = writeln!(out, "  wb.emergency_dropped   {}", w.emergency_suppressed);
            let _ = writeln!(out, "  wb.lines_flushed       {}", w.lines_flushed);
            let _ = writeln!(out, "  wb.failed              {}", w.failed_write_backs);
        }
        let _ = writeln!(out, "{RULE}");
        out
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// # Arguments
    ///
    /// * `sections` - Slice of section names to print, or empty for all.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
