//! # Write-Back Scheduler Tests
//!
//! Early rounds fall due every `early_period` ticks; emergency requests fire
//! once and are then suppressed for `dirty_interval_time` ticks, after which
//! the early counter restarts.

use ftcache_core::config::WriteBackConfig;
use ftcache_core::core::units::writeback::{EmergencyDecision, WriteBackScheduler};

fn scheduler(early: bool, period: u64, emergency: bool, cooldown: u64) -> WriteBackScheduler {
    WriteBackScheduler::new(&WriteBackConfig {
        early,
        early_period: period,
        emergency,
        dirty_interval_time: cooldown,
    })
}

#[test]
fn early_due_every_period() {
    let mut s = scheduler(true, 3, false, 0);
    let due: Vec<bool> = (0..9).map(|_| s.advance()).collect();
    assert_eq!(due, [false, false, true, false, false, true, false, false, true]);
    assert_eq!(s.ticks(), 9);
}

#[test]
fn early_disabled_never_due() {
    let mut s = scheduler(false, 1, false, 0);
    assert!((0..100).all(|_| !s.advance()));
}

#[test]
fn emergency_disabled() {
    let mut s = scheduler(false, 1, false, 10);
    assert_eq!(s.request_emergency(), EmergencyDecision::Disabled);
    assert!(!s.cooling());
}

#[test]
fn emergency_fires_then_cools_down() {
    let mut s = scheduler(false, 1, true, 4);
    assert_eq!(s.request_emergency(), EmergencyDecision::Fire);
    assert!(s.cooling());
    assert_eq!(s.request_emergency(), EmergencyDecision::Suppressed);

    for _ in 0..3 {
        let _ = s.advance();
        assert_eq!(s.request_emergency(), EmergencyDecision::Suppressed);
    }
    let _ = s.advance();
    assert!(!s.cooling());
    assert_eq!(s.request_emergency(), EmergencyDecision::Fire);
}

#[test]
fn zero_cooldown_never_suppresses() {
    let mut s = scheduler(false, 1, true, 0);
    assert_eq!(s.request_emergency(), EmergencyDecision::Fire);
    assert_eq!(s.request_emergency(), EmergencyDecision::Fire);
}

#[test]
fn cooldown_end_resets_early_counter() {
    let mut s = scheduler(true, 10, true, 3);
    for _ in 0..5 {
        let _ = s.advance();
    }
    assert_eq!(s.since_early(), 5);
    assert_eq!(s.request_emergency(), EmergencyDecision::Fire);

    for _ in 0..3 {
        assert!(!s.advance());
    }
    assert!(!s.cooling());
    assert_eq!(s.since_early(), 0);

    let due: Vec<bool> = (0..10).map(|_| s.advance()).collect();
    assert_eq!(due.iter().position(|&d| d), Some(9));
}
