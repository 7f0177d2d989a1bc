//! # Configuration Tests
//!
//! Defaults, JSON deserialization (including enum aliases) and every
//! validation rule.

use ftcache_core::common::ConfigError;
use ftcache_core::config::*;
use pretty_assertions::assert_eq;

// ══════════════════════════════════════════════════════════
// 1. Defaults
// ══════════════════════════════════════════════════════════

#[test]
fn default_hierarchy_is_two_levels() {
    let config = Config::default();
    assert_eq!(config.levels.len(), 2);

    let l1 = &config.levels[0];
    assert_eq!((l1.size_bytes, l1.line_bytes, l1.ways, l1.latency), (1024, 32, 2, 1));
    assert_eq!(l1.policy, ReplacementPolicy::Lru);
    assert_eq!(l1.write_policy, WritePolicy::WriteBack);

    let l2 = &config.levels[1];
    assert_eq!((l2.size_bytes, l2.line_bytes, l2.ways, l2.latency), (8192, 32, 4, 10));
    assert_eq!(config.memory.latency, 100);
    config.validate().unwrap();
}

#[test]
fn protection_and_scheduling_defaults() {
    let config = Config::default();
    assert_eq!(config.ecc.scheme, EccScheme::None);
    assert_eq!(config.ecc.word_bits, 32);
    assert!(!config.write_back.early);
    assert!(!config.write_back.emergency);
    assert_eq!(config.write_back.early_period, 1000);
    assert_eq!(config.write_back.dirty_interval_time, 100);
    assert_eq!(config.fault.target, FaultTarget::Data);
    assert_eq!(config.fault.pattern, FaultPattern::Single);
    assert_eq!(config.fault.burst_len, 2);
    assert_eq!(config.fault.count, 0);
    assert_eq!(config.fault.interval, 0);
    assert_eq!(config.general.seed, 0);
}

#[test]
fn clean_variant_is_parity_when_protected() {
    assert_eq!(EccScheme::None.clean_variant(), EccScheme::None);
    for scheme in [EccScheme::Parity, EccScheme::Hamming, EccScheme::SecDed, EccScheme::Mlreps] {
        assert_eq!(scheme.clean_variant(), EccScheme::Parity);
    }
}

// ══════════════════════════════════════════════════════════
// 2. JSON
// ══════════════════════════════════════════════════════════

#[test]
fn empty_document_gives_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.levels.len(), 2);
    assert_eq!(config.ecc.word_bits, 32);
}

#[test]
fn full_document_parses() {
    let json = r#"{
        "levels": [
            { "size_bytes": 512, "line_bytes": 16, "ways": 4, "policy": "FIFO", "latency": 2 },
            { "size_bytes": 4096, "line_bytes": 32, "ways": 8, "policy": "RAND",
              "write_policy": "WriteThrough", "latency": 12 }
        ],
        "memory": { "latency": 150 },
        "ecc": { "scheme": "SECDED", "word_bits": 16 },
        "write_back": { "early": true, "early_period": 50, "emergency": true, "dirty_interval_time": 20 },
        "fault": { "target": "Both", "pattern": "Burst", "burst_len": 3, "count": 4, "interval": 10 },
        "general": { "seed": 42 }
    }"#;
    let config = Config::from_json(json).unwrap();

    assert_eq!(config.levels[0].policy, ReplacementPolicy::Fifo);
    assert_eq!(config.levels[0].write_policy, WritePolicy::WriteBack);
    assert_eq!(config.levels[1].policy, ReplacementPolicy::Random);
    assert_eq!(config.levels[1].write_policy, WritePolicy::WriteThrough);
    assert_eq!(config.memory.latency, 150);
    assert_eq!(config.ecc.scheme, EccScheme::SecDed);
    assert_eq!(config.ecc.word_bits, 16);
    assert!(config.write_back.early && config.write_back.emergency);
    assert_eq!(config.write_back.early_period, 50);
    assert_eq!(config.fault.pattern, FaultPattern::Burst);
    assert_eq!(config.fault.target, FaultTarget::Both);
    assert_eq!(config.fault.burst_len, 3);
    assert_eq!(config.general.seed, 42);
}

#[test]
fn scheme_aliases() {
    for (text, scheme) in [
        ("\"Parity\"", EccScheme::Parity),
        ("\"Hamming\"", EccScheme::Hamming),
        ("\"SEC-DED\"", EccScheme::SecDed),
        ("\"SecDed\"", EccScheme::SecDed),
        ("\"MLREPS\"", EccScheme::Mlreps),
        ("\"Mlreps\"", EccScheme::Mlreps),
    ] {
        let parsed: EccScheme = serde_json::from_str(text).unwrap();
        assert_eq!(parsed, scheme, "{text}");
    }
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = Config::from_json("{ \"levels\": 3 }").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

// ══════════════════════════════════════════════════════════
// 3. Validation
// ══════════════════════════════════════════════════════════

fn with_levels(levels: Vec<CacheConfig>) -> Config {
    Config { levels, ..Config::default() }
}

#[test]
fn rejects_empty_and_too_deep_hierarchies() {
    let err = with_levels(vec![]).validate().unwrap_err();
    assert!(matches!(err, ConfigError::LevelCount { got: 0, max: 3 }));

    let err = with_levels(vec![CacheConfig::default(); 4]).validate().unwrap_err();
    assert!(matches!(err, ConfigError::LevelCount { got: 4, .. }));

    with_levels(vec![CacheConfig::default(); 3]).validate().unwrap();
}

#[test]
fn rejects_bad_geometry_with_level_index() {
    let bad = CacheConfig { size_bytes: 3000, ..CacheConfig::default() };
    let err = with_levels(vec![CacheConfig::default(), bad]).validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotPowerOfTwo { level: 1, .. }));
}

#[test]
fn rejects_lines_shrinking_towards_memory() {
    let l1 = CacheConfig { line_bytes: 64, ..CacheConfig::default() };
    let l2 = CacheConfig { size_bytes: 4096, line_bytes: 32, ..CacheConfig::default() };
    let err = with_levels(vec![l1, l2]).validate().unwrap_err();
    assert!(matches!(err, ConfigError::LineSizeShrinks { level: 1, line_bytes: 32, upper_line_bytes: 64 }));
}

#[test]
fn rejects_unsupported_word_width() {
    let mut config = Config::default();
    config.ecc.word_bits = 12;
    assert!(matches!(config.validate().unwrap_err(), ConfigError::WordBits(12)));
}

#[test]
fn rejects_word_wider_than_line() {
    let mut config = with_levels(vec![CacheConfig { size_bytes: 64, line_bytes: 4, ways: 1, ..CacheConfig::default() }]);
    config.ecc.word_bits = 64;
    assert!(matches!(config.validate().unwrap_err(), ConfigError::WordWiderThanLine { .. }));
}

#[test]
fn rejects_zero_early_period_only_when_enabled() {
    let mut config = Config::default();
    config.write_back.early_period = 0;
    config.validate().unwrap();

    config.write_back.early = true;
    assert!(matches!(config.validate().unwrap_err(), ConfigError::ZeroEarlyPeriod));
}

#[test]
fn rejects_zero_length_bursts() {
    let mut config = Config::default();
    config.fault.burst_len = 0;
    config.validate().unwrap();

    config.fault.pattern = FaultPattern::Burst;
    assert!(matches!(config.validate().unwrap_err(), ConfigError::ZeroBurstLength));
}
