//! Holding area for samples submitted by producers but not yet merged into
//! the committed store.
//!
//! Producers push here under a cheap mutex so the hot append path never
//! waits on the store's reader/writer lock.  Whichever producer next wins a
//! non-blocking `try_write` on the store drains the whole queue in one pass.
//!
//! The queue is unbounded.  Samples must never be dropped here because the
//! committed store has to end up with every appended sample exactly once;
//! see `CadenceBuilder::pending_limit` for bounding the backlog.

use crate::sample::Sample;
use crate::store::committed::CommittedStore;

/// FIFO of samples awaiting merge.
///
/// Not synchronised by itself: the cadence buffer keeps it behind a
/// `Mutex`.
pub struct PendingQueue {
    samples: Vec<Sample>,
}

impl PendingQueue {
    pub fn new() -> Self {
        PendingQueue {
            samples: Vec::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Moves every pending sample, in submission order, into `store`.
    ///
    /// Returns the number of samples merged.  The queue's allocation is kept
    /// for the next batch.
    pub fn drain_into(&mut self, store: &mut CommittedStore) -> usize {
        let n = self.samples.len();
        for sample in self.samples.drain(..) {
            store.append(sample);
        }
        n
    }
}

impl Default for PendingQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
