//! Cache hierarchy building blocks.
//!
//! Everything below [`crate::sim`]: level storage, replacement, codecs, fault
//! injection and write-back timing. None of it knows about traces or
//! observers.

/// Storage and protection units (cache, ECC, fault injection, write-back).
pub mod units;

pub use self::units::cache::CacheLevel;
pub use self::units::ecc::{DecodeStatus, EccCodec, FaultVerdict};
pub use self::units::fault::{ErrorType, FaultInjector, InjectionReport};
pub use self::units::writeback::{EmergencyDecision, WriteBackScheduler};
