//! Multi-level cache hierarchy.
//!
//! This module moves data between the cache levels and main memory. It provides:
//! 1. **Access Resolution:** A recursive walk from L1 towards memory. Level `k`
//!    either hits or allocates a line (evicting a victim) and fills it from
//!    level `k + 1`, where `k == levels.len()` is main memory.
//! 2. **Write Handling:** Write-back (dirty until flushed) or write-through
//!    (forwarded at once), both with write-allocate.
//! 3. **Protection:** The last level stores code bits. Clean lines use the
//!    clean codec, dirty lines the configured one, and every read of protected
//!    data decodes first. Decode outcomes are tallied and never abort an access.
//! 4. **Write-Back Scheduling:** Early rounds on a period, emergency rounds when
//!    a dirty line shows an error.
//! 5. **Fault Injection:** Bit flips into the protected level between operations.

use std::ops::Range;

use rand::SeedableRng;
use tracing::{debug, trace, warn};

use super::memory::MainMemory;
use super::observer::{AccessRecord, FlushKind, ServedBy, SimEvent};
use crate::common::constants::{splitmix64, word_mask};
use crate::common::{AccessType, ConfigError, SimRng};
use crate::config::{Config, EccScheme, WritePolicy};
use crate::core::units::cache::CacheLevel;
use crate::core::units::cache::line::CacheLine;
use crate::core::units::ecc::{self, DecodeStatus, EccCodec, FaultVerdict};
use crate::core::units::fault::{CodeWidths, ErrorType, FaultInjector, InjectionReport};
use crate::core::units::writeback::{EmergencyDecision, WriteBackScheduler};
use crate::stats::SimStats;

/// Cache levels, memory, codecs and the bookkeeping that ties them together.
#[derive(Debug)]
pub struct CacheHierarchy {
    levels: Vec<CacheLevel>,
    memory: MainMemory,
    clean_codec: Box<dyn EccCodec>,
    dirty_codec: Box<dyn EccCodec>,
    injector: FaultInjector,
    fault_count: u32,
    scheduler: WriteBackScheduler,
    rng: SimRng,
    stats: SimStats,
    events: Vec<SimEvent>,
    tick: u64,
    word_bytes: u64,
    word_mask: u64,
    emergency_pending: bool,
    flushing: bool,
}

impl CacheHierarchy {
    /// Builds a hierarchy with every line invalid.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated before use.
    ///
    /// # Returns
    ///
    /// The hierarchy, or the first [`ConfigError`] found.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let word_bits = config.ecc.word_bits;

        let levels = config
            .levels
            .iter()
            .enumerate()
            .map(|(i, level)| CacheLevel::new(i, level, word_bits))
            .collect::<Result<Vec<_>, _>>()?;

        let clean_codec = ecc::build(config.ecc.scheme.clean_variant(), word_bits);
        let dirty_codec = ecc::build(config.ecc.scheme, word_bits);
        let widths = CodeWidths {
            word_bits,
            clean_check_bits: clean_codec.check_bits(),
            dirty_check_bits: dirty_codec.check_bits(),
        };

        debug!(
            levels = levels.len(),
            scheme = ?config.ecc.scheme,
            word_bits,
            seed = config.general.seed,
            "cache hierarchy built"
        );

        Ok(Self {
            stats: SimStats::new(levels.len()),
            levels,
            memory: MainMemory::new(word_bits, config.memory.latency),
            clean_codec,
            dirty_codec,
            injector: FaultInjector::new(ErrorType::from(&config.fault), widths),
            fault_count: config.fault.count,
            scheduler: WriteBackScheduler::new(&config.write_back),
            rng: SimRng::seed_from_u64(config.general.seed),
            events: Vec::new(),
            tick: 0,
            word_bytes: u64::from(word_bits / 8),
            word_mask: word_mask(word_bits),
            emergency_pending: false,
            flushing: false,
        })
    }

    /// Executes one trace operation.
    ///
    /// Advances the tick, resolves the access through the levels, then runs
    /// any emergency or early write-back that became due.
    ///
    /// # Arguments
    ///
    /// * `address` - Byte address; aligned down to its word.
    /// * `op` - Read or write. Writes store a value derived from the address
    ///   and the tick.
    pub fn execute(&mut self, address: u64, op: AccessType) -> AccessRecord {
        self.tick += 1;
        // Due on every `early_period`-th tick, counting this one.
        let early_due = self.scheduler.advance();
        let word_addr = address & !(self.word_bytes - 1);

        let served_by = match op {
            AccessType::Read => self.read_block(0, word_addr, 1).1,
            AccessType::Write => {
                let value = self.store_value(word_addr);
                self.write_block(0, word_addr, &[value])
            }
        };
        let cycles = self.latency_to(served_by);
        self.stats.cycles += cycles;
        self.stats.operations += 1;

        if self.emergency_pending {
            self.emergency_write_back();
        }
        if early_due {
            self.early_write_back();
        }
        self.refresh_gauges();

        trace!(tick = self.tick, address, %op, ?served_by, cycles, "access");
        AccessRecord { tick: self.tick, address, op, served_by, cycles }
    }

    /// Value written by a store to `address` at the current tick.
    fn store_value(&self, address: u64) -> u64 {
        splitmix64(address ^ self.tick.rotate_left(32)) & self.word_mask
    }

    /// Latency of an access served by `served_by`.
    fn latency_to(&self, served_by: ServedBy) -> u64 {
        let through = match served_by {
            ServedBy::Level(k) => k + 1,
            ServedBy::Memory => self.levels.len(),
        };
        let caches: u64 = self.levels[..through].iter().map(|l| l.latency).sum();
        match served_by {
            ServedBy::Level(_) => caches,
            ServedBy::Memory => caches + self.memory.latency,
        }
    }

    /// Reads `len` words at `base` through level `k`.
    ///
    /// # Returns
    ///
    /// The words and the component that held them.
    fn read_block(&mut self, k: usize, base: u64, len: usize) -> (Vec<u64>, ServedBy) {
        if k == self.levels.len() {
            self.stats.memory.reads += 1;
            return (self.memory.read_block(base, len), ServedBy::Memory);
        }
        self.stats.levels[k].reads += 1;
        let (idx, served_by) = self.resolve(k, base);
        let data = self.line_data(k, idx);
        let start = self.levels[k].word_index(base);
        (data[start..start + len].to_vec(), served_by)
    }

    /// Writes `words` at `base` through level `k`.
    ///
    /// Write-back levels mark the line dirty. Write-through levels keep it
    /// clean and forward the words to level `k + 1`.
    fn write_block(&mut self, k: usize, base: u64, words: &[u64]) -> ServedBy {
        if k == self.levels.len() {
            self.stats.memory.writes += 1;
            self.memory.write_block(base, words);
            return ServedBy::Memory;
        }
        self.stats.levels[k].writes += 1;
        let (idx, served_by) = self.resolve(k, base);
        let mut data = self.line_data(k, idx);
        let start = self.levels[k].word_index(base);
        data[start..start + words.len()].copy_from_slice(words);

        match self.levels[k].write_policy {
            WritePolicy::WriteBack => self.store_line(k, idx, data, true),
            WritePolicy::WriteThrough => {
                let dirty = self.levels[k].line(idx).dirty;
                self.store_line(k, idx, data, dirty);
                let _ = self.write_block(k + 1, base, words);
            }
        }
        served_by
    }

    /// Finds or allocates the line for `address` at level `k`.
    ///
    /// Counts exactly one hit or miss. A miss allocates a line and fills it
    /// from level `k + 1`.
    fn resolve(&mut self, k: usize, address: u64) -> (usize, ServedBy) {
        if let Some(idx) = self.levels[k].lookup(address) {
            self.stats.levels[k].hits += 1;
            self.levels[k].touch(idx, self.tick);
            return (idx, ServedBy::Level(k));
        }
        self.stats.levels[k].misses += 1;

        let idx = self.allocate(k, address);
        let base = self.levels[k].decoder().line_base(address);
        let words = self.levels[k].words_per_line();
        let (data, served_by) = self.read_block(k + 1, base, words);
        self.levels[k].fill(idx, base, data, self.tick);
        if k == self.protected_level() {
            let check = self.clean_codec.encode(&self.levels[k].line(idx).data);
            self.levels[k].line_mut(idx).check = check;
        }
        (idx, served_by)
    }

    /// Picks the line to reuse for `address`, evicting its occupant.
    fn allocate(&mut self, k: usize, address: u64) -> usize {
        let set = self.levels[k].decoder().set_index(address);
        let idx = self.levels[k].select_victim(set, &mut self.rng);
        if self.levels[k].line(idx).valid {
            self.evict(k, idx);
        }
        idx
    }

    /// Writes back (if dirty) and invalidates line `idx` of level `k`.
    fn evict(&mut self, k: usize, idx: usize) {
        let address = self.levels[k].line_address(idx);
        let dirty = self.levels[k].line(idx).dirty;
        self.stats.levels[k].evictions += 1;

        if dirty {
            let data = self.line_data(k, idx);
            self.stats.levels[k].write_backs += 1;
            let _ = self.write_block(k + 1, address, &data);
        }
        debug!(level = k, address, dirty, "evicted line");
        self.events.push(SimEvent::Eviction { level: k, address, dirty });
        self.levels[k].line_mut(idx).invalidate();
    }

    /// Current contents of a line; decoded when the level is protected.
    fn line_data(&mut self, k: usize, idx: usize) -> Vec<u64> {
        if k == self.protected_level() {
            self.decode_line(k, idx).0
        } else {
            self.levels[k].line(idx).data.clone()
        }
    }

    /// Replaces a line's contents and re-encodes it for its new state.
    fn store_line(&mut self, k: usize, idx: usize, data: Vec<u64>, dirty: bool) {
        let check = (k == self.protected_level()).then(|| {
            let codec = if dirty { &self.dirty_codec } else { &self.clean_codec };
            codec.encode(&data)
        });
        let line = self.levels[k].line_mut(idx);
        line.dirty = dirty;
        line.reference.clone_from(&data);
        line.data = data;
        if let Some(check) = check {
            line.check = check;
        }
    }

    /// Decodes line `idx` of protected level `k` and tallies the outcome.
    ///
    /// A detected error in a clean line is repaired from memory. A detected
    /// error in a dirty line is unrecoverable and the best-effort data is kept.
    /// Afterwards the stored copy matches what was delivered, so every error
    /// is counted once. An error signalled in a dirty line requests an
    /// emergency write-back.
    ///
    /// # Returns
    ///
    /// The delivered words and the codec's status.
    pub(crate) fn decode_line(&mut self, k: usize, idx: usize) -> (Vec<u64>, DecodeStatus) {
        let line = self.levels[k].line(idx);
        let dirty = line.dirty;
        let codec = if dirty { self.dirty_codec.as_ref() } else { self.clean_codec.as_ref() };
        let result = ecc::decode_checked(codec, &line.data, &line.check, &line.reference);
        if result.verdict == FaultVerdict::NoError {
            return (result.data, result.status);
        }

        let address = self.levels[k].line_address(idx);
        let signalled = result.error_signalled();
        let faults = &mut self.stats.faults;
        match (result.verdict, dirty) {
            (FaultVerdict::Corrected, _) => faults.corrected += 1,
            // Parity cannot locate anything; its detections are tallied as clean.
            (FaultVerdict::Detected, true) if codec.scheme() != EccScheme::Parity => {
                faults.detected_dirty += 1;
            }
            (FaultVerdict::Detected, _) => faults.detected_clean += 1,
            (FaultVerdict::FailedCorrection, _) => faults.fail_correct += 1,
            (FaultVerdict::Undetected, true) => faults.undetected_dirty += 1,
            (FaultVerdict::Undetected, false) => faults.undetected_clean += 1,
            (FaultVerdict::NoError, _) => {}
        }

        let mut data = result.data;
        if result.status == DecodeStatus::DetectedUncorrectable {
            if dirty {
                faults.unrecoverable += 1;
                warn!(level = k, address, "uncorrectable error in dirty line, using best-effort data");
            } else {
                self.stats.memory.reads += 1;
                data = self.memory.read_block(address, data.len());
                debug!(level = k, address, "refetched clean line after detected error");
            }
        }
        debug!(level = k, address, dirty, verdict = ?result.verdict, "decode found an error");
        self.events.push(SimEvent::Decode { level: k, address, dirty, verdict: result.verdict });

        let check = codec.encode(&data);
        let line = self.levels[k].line_mut(idx);
        line.data.clone_from(&data);
        line.reference.clone_from(&data);
        line.check = check;

        if dirty && signalled {
            self.request_emergency();
        }
        (data, result.status)
    }

    fn request_emergency(&mut self) {
        if self.flushing {
            return;
        }
        match self.scheduler.request_emergency() {
            EmergencyDecision::Fire => {
                debug!(tick = self.tick, "emergency write-back requested");
                self.emergency_pending = true;
            }
            EmergencyDecision::Suppressed => {
                debug!(tick = self.tick, "emergency write-back suppressed by cooldown");
                self.stats.write_back.emergency_suppressed += 1;
                self.events.push(SimEvent::EmergencySuppressed { tick: self.tick });
            }
            EmergencyDecision::Disabled => {}
        }
    }

    /// Flushes every dirty line of the protected level to memory now.
    ///
    /// Runs automatically when the period elapses; callable directly as well.
    pub fn early_write_back(&mut self) {
        self.stats.write_back.early_rounds += 1;
        self.flush_dirty(FlushKind::Early);
    }

    /// Flushes every dirty line of the protected level to memory now.
    ///
    /// Runs automatically after a dirty-line error outside the cooldown;
    /// calling it directly bypasses the cooldown check.
    pub fn emergency_write_back(&mut self) {
        self.emergency_pending = false;
        self.stats.write_back.emergency_rounds += 1;
        self.flush_dirty(FlushKind::Emergency);
    }

    fn flush_dirty(&mut self, kind: FlushKind) {
        let p = self.protected_level();
        let dirty: Vec<usize> = (0..self.levels[p].num_lines())
            .filter(|&idx| {
                let line = self.levels[p].line(idx);
                line.valid && line.dirty
            })
            .collect();

        self.flushing = true;
        let mut failed = 0;
        for &idx in &dirty {
            let address = self.levels[p].line_address(idx);
            let (data, status) = self.decode_line(p, idx);
            if status == DecodeStatus::DetectedUncorrectable {
                failed += 1;
            }
            self.stats.levels[p].write_backs += 1;
            let _ = self.write_block(p + 1, address, &data);
            self.store_line(p, idx, data, false);
        }
        self.flushing = false;

        let lines = dirty.len() as u64;
        self.stats.write_back.lines_flushed += lines;
        self.stats.write_back.failed_write_backs += failed;
        debug!(?kind, lines, failed, "write-back round");
        self.events.push(SimEvent::Flush { kind, lines, failed });
    }

    /// Runs one configured injection round over the whole protected level.
    pub fn inject_faults(&mut self) -> InjectionReport {
        let lines = self.levels[self.protected_level()].num_lines();
        self.inject(0..lines, self.fault_count)
    }

    /// Injects `count` faults into protected lines in `range`.
    ///
    /// With emergency write-back enabled, every dirty line that was hit is
    /// decoded at once so the error can trigger a flush before the next
    /// operation.
    pub fn inject(&mut self, range: Range<usize>, count: u32) -> InjectionReport {
        let p = self.protected_level();
        let report = self.injector.inject(self.levels[p].lines_mut(), range, count, &mut self.rng);
        self.stats.faults.injected += report.injected;
        self.stats.faults.failed_injections += report.failed_attempts;
        self.events.push(SimEvent::Injection {
            injected: report.injected,
            failed_attempts: report.failed_attempts,
        });

        if self.scheduler.emergency_enabled() {
            let mut hit: Vec<usize> = report.hits.iter().filter(|h| h.dirty).map(|h| h.line).collect();
            hit.sort_unstable();
            hit.dedup();
            for idx in hit {
                let line = self.levels[p].line(idx);
                if line.valid && line.dirty {
                    let _ = self.decode_line(p, idx);
                }
            }
            if self.emergency_pending {
                self.emergency_write_back();
            }
        }
        self.refresh_gauges();
        report
    }

    fn refresh_gauges(&mut self) {
        for (level, stats) in self.levels.iter().zip(self.stats.levels.iter_mut()) {
            (stats.clean_lines, stats.dirty_lines) = level.occupancy();
        }
    }

    /// Index of the protected level (the last one).
    pub fn protected_level(&self) -> usize {
        self.levels.len() - 1
    }

    /// Statistics snapshot.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Ticks executed so far.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// All cache levels, L1 first.
    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    /// Cache level `k`.
    pub fn level(&self, k: usize) -> &CacheLevel {
        &self.levels[k]
    }

    /// Lines of the protected level, for targeted fault experiments.
    pub fn protected_lines_mut(&mut self) -> &mut [CacheLine] {
        let p = self.protected_level();
        self.levels[p].lines_mut()
    }

    /// Main memory.
    pub const fn memory(&self) -> &MainMemory {
        &self.memory
    }

    /// Write-back scheduler state.
    pub const fn scheduler(&self) -> &WriteBackScheduler {
        &self.scheduler
    }

    /// Codec for lines in the given state.
    pub fn codec(&self, dirty: bool) -> &dyn EccCodec {
        if dirty { self.dirty_codec.as_ref() } else { self.clean_codec.as_ref() }
    }

    /// Removes and returns the events raised since the last call.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
