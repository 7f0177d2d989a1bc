//! Early and emergency write-back scheduling.
//!
//! The scheduler only keeps time and decides; the hierarchy performs the
//! flushes. It provides:
//! 1. **Early Write-Back:** A periodic flush of every dirty protected line,
//!    due once `early_period` ticks have elapsed since the last one.
//! 2. **Emergency Write-Back:** A reactive flush requested when a decode finds
//!    an error in a dirty line, followed by a cooldown of `dirty_interval_time`
//!    ticks during which further requests are suppressed. The early-flush
//!    counter restarts when the cooldown ends.

use crate::config::WriteBackConfig;

/// Answer to an emergency flush request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergencyDecision {
    /// Flush now; the cooldown has started.
    Fire,
    /// A cooldown is active; the request is dropped.
    Suppressed,
    /// Emergency write-back is not enabled.
    Disabled,
}

/// Tick-driven write-back timer.
#[derive(Debug, Clone)]
pub struct WriteBackScheduler {
    early: bool,
    early_period: u64,
    emergency: bool,
    dirty_interval_time: u64,
    ticks: u64,
    since_early: u64,
    since_emergency: u64,
    cooling: bool,
}

impl WriteBackScheduler {
    /// Creates a scheduler with all counters at zero.
    pub const fn new(config: &WriteBackConfig) -> Self {
        Self {
            early: config.early,
            early_period: config.early_period,
            emergency: config.emergency,
            dirty_interval_time: config.dirty_interval_time,
            ticks: 0,
            since_early: 0,
            since_emergency: 0,
            cooling: false,
        }
    }

    /// Advances time by one tick.
    ///
    /// # Returns
    ///
    /// `true` when an early write-back round is due. The early counter is
    /// reset in that case.
    ///
    /// The counter includes the current tick, so a round is due once it
    /// reaches `early_period` (every `early_period`-th tick), which is the
    /// first tick on which the elapsed time exceeds `early_period - 1`.
    pub const fn advance(&mut self) -> bool {
        self.ticks += 1;
        self.since_early += 1;

        if self.cooling {
            self.since_emergency += 1;
            if self.since_emergency >= self.dirty_interval_time {
                self.cooling = false;
                self.since_early = 0;
            }
        }

        if self.early && self.since_early >= self.early_period {
            self.since_early = 0;
            return true;
        }
        false
    }

    /// Asks for an emergency flush.
    pub const fn request_emergency(&mut self) -> EmergencyDecision {
        if !self.emergency {
            return EmergencyDecision::Disabled;
        }
        if self.cooling {
            return EmergencyDecision::Suppressed;
        }
        self.cooling = self.dirty_interval_time > 0;
        self.since_emergency = 0;
        EmergencyDecision::Fire
    }

    /// Ticks elapsed since creation.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks since the last early round (or the end of the last cooldown).
    pub const fn since_early(&self) -> u64 {
        self.since_early
    }

    /// Ticks since the last emergency flush, counted during cooldown only.
    pub const fn since_emergency(&self) -> u64 {
        self.since_emergency
    }

    /// `true` while emergency requests are being suppressed.
    pub const fn cooling(&self) -> bool {
        self.cooling
    }

    /// `true` when emergency write-back is enabled.
    pub const fn emergency_enabled(&self) -> bool {
        self.emergency
    }
}
