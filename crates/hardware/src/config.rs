//! Configuration system for the cache simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline geometry, latencies, write-back periods and fault settings.
//! 2. **Structures:** Hierarchical config for cache levels, memory, ECC, write-back, faults.
//! 3. **Enums:** Replacement policy, write policy, ECC scheme, and fault shape selectors.
//! 4. **Validation:** [`Config::validate`] rejects invalid combinations before any trace runs.
//!
//! Configuration is supplied as JSON (see [`Config::from_json`]) or built with `Config::default()`.

use serde::Deserialize;

use crate::common::constants::{MAX_LEVELS, SUPPORTED_WORD_BITS};
use crate::common::{AddressDecoder, ConfigError};

/// Default configuration constants for the simulator.
///
/// These values define the baseline configuration when not explicitly
/// overridden in a JSON configuration document.
mod defaults {
    /// Default L1 capacity (1 KiB).
    pub const L1_SIZE: u64 = 1024;

    /// Default L2 capacity (8 KiB).
    pub const L2_SIZE: u64 = 8 * 1024;

    /// Default line size in bytes.
    pub const CACHE_LINE: u64 = 32;

    /// Default L1 associativity.
    pub const L1_WAYS: u64 = 2;

    /// Default L2 associativity.
    pub const L2_WAYS: u64 = 4;

    /// L1 access latency in cycles.
    ///
    /// L1 : L2 : memory latencies follow a 1 : 10 : 100 ratio.
    pub const L1_LATENCY: u64 = 1;

    /// L2 access latency in cycles.
    pub const L2_LATENCY: u64 = 10;

    /// Main memory access latency in cycles.
    pub const MEMORY_LATENCY: u64 = 100;

    /// Codec word width in bits (one parity bit / Hamming word per 32-bit word).
    pub const WORD_BITS: u32 = 32;

    /// Ticks between early write-back rounds.
    pub const EARLY_PERIOD: u64 = 1000;

    /// Cooldown in ticks after an emergency write-back.
    pub const DIRTY_INTERVAL_TIME: u64 = 100;

    /// Adjacent bits flipped by one burst fault.
    pub const BURST_LEN: u32 = 2;
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which cache line to evict
/// when a new line must be installed in a full cache set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// First In First Out: evicts the line that was filled earliest.
    #[serde(alias = "Fifo")]
    Fifo,
    /// Least Recently Used: evicts the line touched least recently.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Uniformly random way, drawn from the simulation RNG.
    #[serde(alias = "RAND", alias = "Random", alias = "Rand")]
    Random,
}

/// Write handling of one cache level.
///
/// Both variants allocate on a write miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum WritePolicy {
    /// Write hits mark the line dirty; memory is updated on write-back.
    #[default]
    WriteBack,
    /// Write hits update this level and are forwarded to the next level at once.
    WriteThrough,
}

/// Error-correcting code protecting the last cache level.
///
/// Dirty lines are encoded with the selected scheme; clean lines, which memory
/// can always restore, use parity whenever any scheme is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum EccScheme {
    /// No protection; decode is a pass-through.
    #[default]
    None,
    /// One even-parity bit per word (detection only).
    Parity,
    /// Single-error-correcting Hamming code per word.
    Hamming,
    /// Hamming plus an overall parity bit (single correct, double detect).
    #[serde(alias = "SECDED", alias = "SEC-DED", alias = "Secded")]
    SecDed,
    /// Triple modular redundancy with a per-bit majority vote.
    #[serde(alias = "MLREPS")]
    Mlreps,
}

impl EccScheme {
    /// Scheme applied to clean lines when `self` protects dirty lines.
    pub const fn clean_variant(self) -> Self {
        match self {
            Self::None => Self::None,
            _ => Self::Parity,
        }
    }
}

/// Which stored bits a fault may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum FaultTarget {
    /// Data bits only.
    #[default]
    Data,
    /// Check (code) bits only.
    Check,
    /// Data and check bits, uniformly over both.
    Both,
}

/// Spatial shape of one fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum FaultPattern {
    /// A single isolated bit flip.
    #[default]
    Single,
    /// `burst_len` adjacent bit flips.
    Burst,
}

/// Root configuration structure for the simulator.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Cache levels, L1 first.
    #[serde(default = "Config::default_levels")]
    pub levels: Vec<CacheConfig>,
    /// Main memory parameters.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// ECC scheme and codec word width.
    #[serde(default)]
    pub ecc: EccConfig,
    /// Early and emergency write-back scheduling.
    #[serde(default)]
    pub write_back: WriteBackConfig,
    /// Fault injection settings.
    #[serde(default)]
    pub fault: FaultConfig,
    /// Run-wide settings.
    #[serde(default)]
    pub general: GeneralConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            levels: Self::default_levels(),
            memory: MemoryConfig::default(),
            ecc: EccConfig::default(),
            write_back: WriteBackConfig::default(),
            fault: FaultConfig::default(),
            general: GeneralConfig::default(),
        }
    }
}

impl Config {
    fn default_levels() -> Vec<CacheConfig> {
        vec![
            CacheConfig::default(),
            CacheConfig {
                size_bytes: defaults::L2_SIZE,
                ways: defaults::L2_WAYS,
                latency: defaults::L2_LATENCY,
                ..CacheConfig::default()
            },
        ]
    }

    /// Parses and validates a JSON configuration document.
    ///
    /// # Arguments
    ///
    /// * `text` - JSON text; omitted fields take their defaults.
    ///
    /// # Returns
    ///
    /// The validated configuration, or the first [`ConfigError`] found.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every cross-field constraint.
    ///
    /// Rejects level counts outside `1..=MAX_LEVELS`, non-power-of-two
    /// geometry, ways that do not divide the line count, lines that shrink
    /// towards memory, unsupported word widths, a zero early period when early
    /// write-back is on, and zero-length bursts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() || self.levels.len() > MAX_LEVELS {
            return Err(ConfigError::LevelCount { got: self.levels.len(), max: MAX_LEVELS });
        }
        if !SUPPORTED_WORD_BITS.contains(&self.ecc.word_bits) {
            return Err(ConfigError::WordBits(self.ecc.word_bits));
        }
        let word_bytes = u64::from(self.ecc.word_bits / 8);

        let mut upper_line = 0;
        for (level, cache) in self.levels.iter().enumerate() {
            let _ = AddressDecoder::new(level, cache.size_bytes, cache.line_bytes, cache.ways)?;
            if cache.line_bytes < upper_line {
                return Err(ConfigError::LineSizeShrinks {
                    level,
                    line_bytes: cache.line_bytes,
                    upper_line_bytes: upper_line,
                });
            }
            if cache.line_bytes < word_bytes {
                return Err(ConfigError::WordWiderThanLine {
                    level,
                    line_bytes: cache.line_bytes,
                    word_bits: self.ecc.word_bits,
                });
            }
            upper_line = cache.line_bytes;
        }

        if self.write_back.early && self.write_back.early_period == 0 {
            return Err(ConfigError::ZeroEarlyPeriod);
        }
        if self.fault.pattern == FaultPattern::Burst && self.fault.burst_len == 0 {
            return Err(ConfigError::ZeroBurstLength);
        }
        Ok(())
    }
}

/// Configuration of one cache level.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Total capacity in bytes (power of two).
    #[serde(default = "CacheConfig::default_size")]
    pub size_bytes: u64,

    /// Line size in bytes (power of two).
    #[serde(default = "CacheConfig::default_line")]
    pub line_bytes: u64,

    /// Associativity (power of two, divides the line count).
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: u64,

    /// Victim selection for full sets.
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// Write hit handling.
    #[serde(default)]
    pub write_policy: WritePolicy,

    /// Access latency in cycles.
    #[serde(default = "CacheConfig::default_latency")]
    pub latency: u64,
}

impl CacheConfig {
    fn default_size() -> u64 {
        defaults::L1_SIZE
    }

    fn default_line() -> u64 {
        defaults::CACHE_LINE
    }

    fn default_ways() -> u64 {
        defaults::L1_WAYS
    }

    fn default_latency() -> u64 {
        defaults::L1_LATENCY
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::L1_SIZE,
            line_bytes: defaults::CACHE_LINE,
            ways: defaults::L1_WAYS,
            policy: ReplacementPolicy::default(),
            write_policy: WritePolicy::default(),
            latency: defaults::L1_LATENCY,
        }
    }
}

/// Main memory parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Access latency in cycles.
    #[serde(default = "MemoryConfig::default_latency")]
    pub latency: u64,
}

impl MemoryConfig {
    fn default_latency() -> u64 {
        defaults::MEMORY_LATENCY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { latency: defaults::MEMORY_LATENCY }
    }
}

/// ECC selection.
#[derive(Debug, Clone, Deserialize)]
pub struct EccConfig {
    /// Scheme protecting dirty lines of the last level.
    #[serde(default)]
    pub scheme: EccScheme,

    /// Codec word width in bits: 8, 16, 32 or 64.
    #[serde(default = "EccConfig::default_word_bits")]
    pub word_bits: u32,
}

impl EccConfig {
    fn default_word_bits() -> u32 {
        defaults::WORD_BITS
    }
}

impl Default for EccConfig {
    fn default() -> Self {
        Self { scheme: EccScheme::default(), word_bits: defaults::WORD_BITS }
    }
}

/// Early and emergency write-back scheduling.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteBackConfig {
    /// Periodically flush every dirty line of the last level.
    #[serde(default)]
    pub early: bool,

    /// Ticks between early flush rounds.
    #[serde(default = "WriteBackConfig::default_early_period")]
    pub early_period: u64,

    /// Flush dirty lines as soon as a decode finds an error in a dirty line.
    #[serde(default)]
    pub emergency: bool,

    /// Cooldown after an emergency flush during which further triggers are ignored.
    #[serde(default = "WriteBackConfig::default_dirty_interval_time")]
    pub dirty_interval_time: u64,
}

impl WriteBackConfig {
    fn default_early_period() -> u64 {
        defaults::EARLY_PERIOD
    }

    fn default_dirty_interval_time() -> u64 {
        defaults::DIRTY_INTERVAL_TIME
    }
}

impl Default for WriteBackConfig {
    fn default() -> Self {
        Self {
            early: false,
            early_period: defaults::EARLY_PERIOD,
            emergency: false,
            dirty_interval_time: defaults::DIRTY_INTERVAL_TIME,
        }
    }
}

/// Fault injection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FaultConfig {
    /// Bits eligible for flipping.
    #[serde(default)]
    pub target: FaultTarget,

    /// Single flip or burst.
    #[serde(default)]
    pub pattern: FaultPattern,

    /// Adjacent flips per burst.
    #[serde(default = "FaultConfig::default_burst_len")]
    pub burst_len: u32,

    /// Injection attempts per round.
    #[serde(default)]
    pub count: u32,

    /// Trace operations between rounds; 0 disables periodic injection.
    #[serde(default)]
    pub interval: u64,
}

impl FaultConfig {
    fn default_burst_len() -> u32 {
        defaults::BURST_LEN
    }
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            target: FaultTarget::default(),
            pattern: FaultPattern::default(),
            burst_len: defaults::BURST_LEN,
            count: 0,
            interval: 0,
        }
    }
}

/// Run-wide settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Seed of the simulation RNG.
    #[serde(default)]
    pub seed: u64,
}
