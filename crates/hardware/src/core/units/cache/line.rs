//! Cache line storage.

/// One cache line: tag, replacement order, status flags, data and code bits.
///
/// `order` is a single counter whose meaning is fixed by the level's policy:
/// fill tick under FIFO, last-access tick under LRU, unused under RAND.
///
/// `reference` is the ground-truth copy of the line. Faults only ever touch
/// `data` and `check`, so comparing a decode against `reference` exposes
/// mis-corrections and undetected corruption.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// Tag bits of the cached address.
    pub tag: u64,
    /// Replacement order counter.
    pub order: u64,
    /// Line holds meaningful data.
    pub valid: bool,
    /// Line differs from the next level and must be written back.
    pub dirty: bool,
    /// Stored words, possibly corrupted by injected faults.
    pub data: Vec<u64>,
    /// Code bits per word, from the codec matching the clean/dirty state.
    pub check: Vec<u128>,
    /// Fault-free copy of `data`.
    pub reference: Vec<u64>,
}

impl CacheLine {
    /// Creates an invalid line holding `words` zeroed words.
    pub fn new(words: usize) -> Self {
        Self {
            data: vec![0; words],
            check: vec![0; words],
            reference: vec![0; words],
            ..Self::default()
        }
    }

    /// Returns the line to the INVALID state.
    pub fn invalidate(&mut self) {
        self.tag = 0;
        self.order = 0;
        self.valid = false;
        self.dirty = false;
        self.data.fill(0);
        self.check.fill(0);
        self.reference.fill(0);
    }

    /// `true` when the stored data diverges from the reference copy.
    pub fn is_corrupted(&self) -> bool {
        self.data != self.reference
    }
}
