//! # Write-Back Scheduling Tests
//!
//! Early (periodic) and emergency (error-triggered) flushes of the protected
//! level, the cooldown, and flushes of lines that no longer decode.

use ftcache_core::common::AccessType::{Read, Write};
use ftcache_core::common::SimRng;
use ftcache_core::config::{Config, EccScheme, FaultPattern, FaultTarget, WritePolicy};
use ftcache_core::core::units::fault::{CodeWidths, ErrorType, FaultInjector};
use ftcache_core::sim::{CacheHierarchy, FlushKind, SimEvent};
use pretty_assertions::assert_eq;
use rand::SeedableRng;

use crate::common::{one_line, protected_two_level};

fn early(period: u64) -> Config {
    let mut config = one_line(EccScheme::None);
    config.write_back.early = true;
    config.write_back.early_period = period;
    config
}

fn emergency(cooldown: u64) -> Config {
    let mut config = one_line(EccScheme::SecDed);
    config.write_back.emergency = true;
    config.write_back.dirty_interval_time = cooldown;
    config.fault.count = 1;
    config
}

// ══════════════════════════════════════════════════════════
// 1. Early Write-Back
// ══════════════════════════════════════════════════════════

#[test]
fn early_round_cleans_dirty_lines_on_period() {
    let mut h = CacheHierarchy::new(&early(3)).unwrap();
    let _ = h.execute(0, Write);
    let _ = h.execute(0, Read);
    assert_eq!(h.stats().levels[0].dirty_lines, 1);

    let _ = h.execute(0, Read);
    let stats = h.stats();
    assert_eq!(stats.write_back.early_rounds, 1);
    assert_eq!(stats.write_back.lines_flushed, 1);
    assert_eq!(stats.levels[0].dirty_lines, 0);
    assert_eq!(stats.levels[0].write_backs, 1);
    assert_eq!(stats.levels[0].evictions, 0);
    assert_eq!(stats.memory.writes, 1);

    let line = h.level(0).line(0);
    assert!(line.valid);
    assert_eq!(h.memory().read_word(0), line.data[0]);
    assert!(h.take_events().contains(&SimEvent::Flush { kind: FlushKind::Early, lines: 1, failed: 0 }));
}

#[test]
fn early_rounds_run_without_dirty_lines() {
    let mut h = CacheHierarchy::new(&early(3)).unwrap();
    for _ in 0..9 {
        let _ = h.execute(4, Read);
    }
    assert_eq!(h.stats().write_back.early_rounds, 3);
    assert_eq!(h.stats().write_back.lines_flushed, 0);
    assert_eq!(h.stats().memory.writes, 0);
}

#[test]
fn disabled_early_write_back_never_flushes() {
    let mut config = early(3);
    config.write_back.early = false;
    let mut h = CacheHierarchy::new(&config).unwrap();
    let _ = h.execute(0, Write);
    for _ in 0..10 {
        let _ = h.execute(0, Read);
    }
    assert_eq!(h.stats().write_back.early_rounds, 0);
    assert!(h.level(0).line(0).dirty);
}

// ══════════════════════════════════════════════════════════
// 2. Emergency Write-Back
// ══════════════════════════════════════════════════════════

#[test]
fn injected_dirty_error_triggers_immediate_flush() {
    let mut h = CacheHierarchy::new(&emergency(10)).unwrap();
    let _ = h.execute(0, Write);

    let report = h.inject(0..1, 1);
    assert_eq!(report.injected, 1);
    let stats = h.stats();
    assert_eq!(stats.faults.corrected, 1);
    assert_eq!(stats.write_back.emergency_rounds, 1);
    assert_eq!(stats.write_back.lines_flushed, 1);
    assert_eq!(stats.levels[0].dirty_lines, 0);
    assert!(!h.level(0).line(0).dirty);
    assert_eq!(h.memory().read_word(0), h.level(0).line(0).data[0]);
}

#[test]
fn cooldown_suppresses_then_expires() {
    let mut h = CacheHierarchy::new(&emergency(10)).unwrap();
    let _ = h.execute(0, Write);
    let _ = h.inject(0..1, 1);
    assert!(h.scheduler().cooling());

    let _ = h.execute(4, Write);
    let _ = h.inject(0..1, 1);
    let stats = h.stats();
    assert_eq!(stats.faults.corrected, 2);
    assert_eq!(stats.write_back.emergency_rounds, 1);
    assert_eq!(stats.write_back.emergency_suppressed, 1);
    assert_eq!(stats.levels[0].dirty_lines, 1);

    // Fired during tick 1; the cooldown ends at tick 11.
    for _ in 0..9 {
        let _ = h.execute(4, Read);
    }
    assert!(!h.scheduler().cooling());
    let _ = h.inject(0..1, 1);
    assert_eq!(h.stats().write_back.emergency_rounds, 2);
    assert_eq!(h.stats().levels[0].dirty_lines, 0);
}

#[test]
fn zero_cooldown_never_suppresses() {
    let mut h = CacheHierarchy::new(&emergency(0)).unwrap();
    for addr in [0, 4, 8] {
        let _ = h.execute(addr, Write);
        let _ = h.inject(0..1, 1);
    }
    assert_eq!(h.stats().write_back.emergency_rounds, 3);
    assert_eq!(h.stats().write_back.emergency_suppressed, 0);
}

#[test]
fn error_found_by_access_triggers_flush_after_it() {
    let mut h = CacheHierarchy::new(&emergency(10)).unwrap();
    let _ = h.execute(0, Write);
    h.protected_lines_mut()[0].data[1] ^= 1 << 3;

    let record = h.execute(0, Read);
    assert_eq!(record.tick, 2);
    assert_eq!(h.stats().faults.corrected, 1);
    assert_eq!(h.stats().write_back.emergency_rounds, 1);
    assert!(!h.level(0).line(0).dirty);
    assert_eq!(h.stats().memory.writes, 1);
}

/// The injector flips the bit directly, so nothing decodes it until the read.
#[test]
fn latent_dirty_error_triggers_flush_when_read() {
    let mut h = CacheHierarchy::new(&emergency(10)).unwrap();
    let _ = h.execute(0, Write);
    assert_eq!(h.codec(true).scheme(), EccScheme::SecDed);
    assert_eq!(h.codec(false).scheme(), EccScheme::Parity);

    let widths = CodeWidths {
        word_bits: 32,
        clean_check_bits: h.codec(false).check_bits(),
        dirty_check_bits: h.codec(true).check_bits(),
    };
    let injector = FaultInjector::new(
        ErrorType { target: FaultTarget::Data, pattern: FaultPattern::Single, burst_len: 1 },
        widths,
    );
    let mut rng = SimRng::seed_from_u64(3);
    let report = injector.inject(h.protected_lines_mut(), 0..1, 1, &mut rng);
    assert_eq!(report.injected, 1);
    assert!(h.level(0).line(0).is_corrupted());
    assert_eq!(h.stats().write_back.emergency_rounds, 0);

    let _ = h.execute(0, Read);
    let stats = h.stats();
    assert_eq!(stats.faults.corrected, 1);
    assert_eq!(stats.write_back.emergency_rounds, 1);
    assert_eq!(stats.memory.writes, 1);
    assert!(!h.level(0).line(0).dirty);
    assert!(!h.level(0).line(0).is_corrupted());
}

#[test]
fn clean_line_errors_do_not_trigger() {
    let mut h = CacheHierarchy::new(&emergency(10)).unwrap();
    let _ = h.execute(0, Read);
    let _ = h.inject(0..1, 1);
    let _ = h.execute(0, Read);
    assert_eq!(h.stats().faults.detected_clean, 1);
    assert_eq!(h.stats().write_back.emergency_rounds, 0);
}

#[test]
fn disabled_emergency_leaves_error_latent() {
    let mut config = emergency(10);
    config.write_back.emergency = false;
    let mut h = CacheHierarchy::new(&config).unwrap();
    let _ = h.execute(0, Write);
    let _ = h.inject(0..1, 1);

    assert_eq!(h.stats().faults.corrected, 0);
    assert_eq!(h.stats().write_back.emergency_rounds, 0);
    assert!(h.level(0).line(0).is_corrupted());
}

// ══════════════════════════════════════════════════════════
// 3. Failed Write-Backs
// ══════════════════════════════════════════════════════════

#[test]
fn flushing_undecodable_line_counts_failure() {
    let mut h = CacheHierarchy::new(&emergency(10)).unwrap();
    let _ = h.execute(0, Write);
    h.protected_lines_mut()[0].data[0] ^= (1 << 0) | (1 << 26);
    let _ = h.take_events();

    h.early_write_back();
    let stats = h.stats();
    assert_eq!(stats.write_back.failed_write_backs, 1);
    assert_eq!(stats.faults.detected_dirty, 1);
    assert_eq!(stats.faults.unrecoverable, 1);
    assert_eq!(stats.memory.writes, 1);
    assert_eq!(stats.write_back.emergency_rounds, 0, "no emergency from inside a flush");
    assert_eq!(stats.write_back.emergency_suppressed, 0);
    assert!(!h.level(0).line(0).dirty);
    assert!(h.take_events().contains(&SimEvent::Flush { kind: FlushKind::Early, lines: 1, failed: 1 }));
}

#[test]
fn direct_emergency_call_bypasses_cooldown() {
    let mut h = CacheHierarchy::new(&emergency(10)).unwrap();
    let _ = h.execute(0, Write);
    h.emergency_write_back();
    let _ = h.execute(4, Write);
    h.emergency_write_back();
    assert_eq!(h.stats().write_back.emergency_rounds, 2);
    assert_eq!(h.stats().write_back.lines_flushed, 2);
}

// ══════════════════════════════════════════════════════════
// 4. Protected L2
// ══════════════════════════════════════════════════════════

/// L1 victims land dirty in L2; the early round flushes L2, not L1.
#[test]
fn early_round_flushes_protected_l2() {
    let mut config = protected_two_level(EccScheme::SecDed);
    config.write_back.early = true;
    config.write_back.early_period = 4;
    let mut h = CacheHierarchy::new(&config).unwrap();

    let _ = h.execute(0, Write);
    let written = h.level(0).line(h.level(0).lookup(0).unwrap()).data[0];
    let _ = h.execute(128, Read);
    let _ = h.execute(256, Read);

    let l2_idx = h.level(1).lookup(0).unwrap();
    assert!(h.level(1).line(l2_idx).dirty);
    assert_eq!(h.stats().levels[0].write_backs, 1);
    assert_eq!(h.stats().memory.writes, 0);

    let _ = h.execute(512, Read);
    let stats = h.stats();
    assert_eq!(stats.write_back.early_rounds, 1);
    assert_eq!(stats.write_back.lines_flushed, 1);
    assert_eq!(stats.levels[1].write_backs, 1);
    assert_eq!(stats.levels[1].dirty_lines, 0);
    assert_eq!(stats.memory.writes, 1);
    assert!(!h.level(1).line(l2_idx).dirty);
    assert_eq!(h.memory().read_word(0), written);
}

#[test]
fn write_through_l1_feeds_dirty_l2_that_early_round_cleans() {
    let mut config = protected_two_level(EccScheme::Hamming);
    config.levels[0].write_policy = WritePolicy::WriteThrough;
    config.write_back.early = true;
    config.write_back.early_period = 2;
    let mut h = CacheHierarchy::new(&config).unwrap();

    let _ = h.execute(8, Write);
    assert_eq!(h.stats().levels[1].dirty_lines, 1);
    let _ = h.execute(8, Read);
    assert_eq!(h.stats().levels[1].dirty_lines, 0);
    assert_eq!(h.memory().read_word(8), h.level(0).line(h.level(0).lookup(8).unwrap()).data[2]);
}
