//! The cadence buffer façade.
//!
//! ## Locking
//!
//! Two independent locks guard two pieces of state:
//!
//! - `pending: Mutex<PendingQueue>`: producers deposit samples here.  It is
//!   only ever held for a push plus, at most, one drain.
//! - `store: RwLock<CommittedStore>`: readers share it, drains and
//!   evictions take it exclusively.
//!
//! Acquisition order is always `pending` then `store`.  `append` holds the
//! queue mutex across the push and the `try_write` attempt, so concurrent
//! producers never interleave and a producer that wins the store lock drains
//! everything pending at that instant, its own sample included.
//!
//! `append` never parks on the store lock unless a pending limit is
//! configured and reached.  If a reader or an eviction holds the lock, the
//! sample stays queued and is merged by a later drain.  Readers must
//! therefore not assume a sample is visible as soon as `append` returns.

use std::iter::Copied;
use std::slice;
use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use tracing::{debug, trace, warn};

use crate::buffer::pending::PendingQueue;
use crate::builder::CadenceBuilder;
use crate::error::{CadenceError, Result};
use crate::metrics::stats::{CadenceStats, StatsCounter};
use crate::sample::{BoundingRect, Sample};
use crate::store::committed::CommittedStore;

static SHARED: OnceLock<CadenceBuffer> = OnceLock::new();

// ---------------------------------------------------------------------------
// Buffer interior
// ---------------------------------------------------------------------------

/// Shared interior of a [`CadenceBuffer`].
pub(crate) struct Inner {
    pub(crate) store: RwLock<CommittedStore>,
    pub(crate) pending: Mutex<PendingQueue>,
    pub(crate) pending_limit: Option<usize>,
    pub(crate) metrics: StatsCounter,
}

// ---------------------------------------------------------------------------
// CadenceBuffer handle
// ---------------------------------------------------------------------------

/// A thread-safe, append-optimised buffer of time-ordered samples.
///
/// Cloning is cheap and every clone refers to the same buffer, so one
/// instance can be built at start-up and handed to producers, the
/// maintenance task and the renderer.
///
/// # Example
/// ```
/// use cadence::{BoundingRect, CadenceBuffer, Sample};
///
/// let buffer = CadenceBuffer::new();
/// buffer.append(Sample::new(0.0, 1.0));
/// buffer.append((1.0, 3.0));
/// buffer.append((2.0, 2.0));
///
/// let view = buffer.read();
/// assert_eq!(view.len(), 3);
/// assert_eq!(view.value(1).unwrap(), Sample::new(1.0, 3.0));
/// assert_eq!(
///     view.bounding_rect(),
///     BoundingRect::Valid { left: 0.0, top: 1.0, right: 2.0, bottom: 3.0 }
/// );
/// ```
pub struct CadenceBuffer {
    inner: Arc<Inner>,
}

impl Clone for CadenceBuffer {
    fn clone(&self) -> Self {
        CadenceBuffer {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl CadenceBuffer {
    /// Creates a buffer with the default configuration.
    pub fn new() -> Self {
        CadenceBuilder::new().build()
    }

    /// Returns a [`CadenceBuilder`] for constructing a configured buffer.
    pub fn builder() -> CadenceBuilder {
        CadenceBuilder::new()
    }

    pub(crate) fn new_with(initial_capacity: usize, pending_limit: Option<usize>) -> Self {
        CadenceBuffer {
            inner: Arc::new(Inner {
                store: RwLock::new(CommittedStore::with_capacity(initial_capacity)),
                pending: Mutex::new(PendingQueue::new()),
                pending_limit,
                metrics: StatsCounter::new(),
            }),
        }
    }

    /// Returns the process-wide buffer, creating it with the default
    /// configuration on first use.
    ///
    /// Prefer building a buffer at the composition root and passing clones
    /// around; this exists for collaborators that cannot be handed one.
    pub fn shared() -> &'static CadenceBuffer {
        SHARED.get_or_init(CadenceBuffer::new)
    }

    // -----------------------------------------------------------------------
    // Hot path: append
    // -----------------------------------------------------------------------

    /// Queues `sample` and opportunistically merges the queue into the
    /// committed store.
    ///
    /// Returns `true` if this call drained the queue, `false` if the store
    /// was busy and the merge was deferred.  Either way the sample is never
    /// lost.
    ///
    /// With a pending limit configured, a call that finds the backlog at the
    /// limit blocks until it can drain.  Do not call `append` while holding a
    /// [`ReadGuard`] on the same thread in that configuration.
    pub fn append(&self, sample: impl Into<Sample>) -> bool {
        let sample = sample.into();
        self.inner.metrics.record_append();

        let mut pending = self.inner.pending.lock();
        pending.push(sample);
        if self.drain_locked(&mut pending) {
            return true;
        }

        match self.inner.pending_limit {
            Some(limit) if pending.len() >= limit => {
                warn!(
                    pending = pending.len(),
                    limit, "pending backlog at limit, blocking on store lock"
                );
                let mut store = self.inner.store.write();
                let merged = pending.drain_into(&mut store);
                self.inner.metrics.record_drain();
                self.inner.metrics.record_forced();
                trace!(merged, committed = store.len(), "forced drain");
                true
            }
            _ => false,
        }
    }

    /// Attempts to merge the pending queue without blocking on the store.
    ///
    /// Returns `true` if the drain happened (even if nothing was pending).
    pub fn try_drain(&self) -> bool {
        let mut pending = self.inner.pending.lock();
        self.drain_locked(&mut pending)
    }

    /// Merges the pending queue, blocking until the store lock is free.
    ///
    /// Returns the number of samples merged.  Intended for maintenance and
    /// shutdown paths, never for a real-time producer.
    pub fn flush(&self) -> usize {
        let mut pending = self.inner.pending.lock();
        let mut store = self.inner.store.write();
        let merged = pending.drain_into(&mut store);
        self.inner.metrics.record_drain();
        trace!(merged, committed = store.len(), "flushed pending samples");
        merged
    }

    /// Caller must hold the queue mutex.
    fn drain_locked(&self, pending: &mut PendingQueue) -> bool {
        let Some(mut store) = self.inner.store.try_write() else {
            self.inner.metrics.record_deferred();
            trace!(pending = pending.len(), "store busy, drain deferred");
            return false;
        };
        let merged = pending.drain_into(&mut store);
        self.inner.metrics.record_drain();
        trace!(merged, committed = store.len(), "drained pending samples");
        true
    }

    // -----------------------------------------------------------------------
    // Maintenance
    // -----------------------------------------------------------------------

    /// Drops committed samples that fell out of the window ending at
    /// `limit`.
    ///
    /// The newest sample with `x < limit` is kept as the window's left
    /// anchor together with every later sample.  If no sample lies below
    /// `limit`, or only the very first one does, nothing is dropped.  The
    /// bounding rectangle is recomputed from the retained samples.
    ///
    /// Blocks until the exclusive lock is available.  The pending queue is
    /// left alone; anything queued is merged by a later drain.
    ///
    /// Returns the number of samples dropped.
    pub fn evict_stale(&self, limit: f64) -> usize {
        let mut store = self.inner.store.write();
        let dropped = store.evict_stale(limit);
        self.inner.metrics.record_eviction(dropped as u64);
        debug!(limit, dropped, retained = store.len(), "evicted stale samples");
        dropped
    }

    /// Empties the committed store.
    ///
    /// The bounding rectangle keeps its last value and the pending queue is
    /// not touched.
    pub fn clear_all(&self) {
        let mut store = self.inner.store.write();
        let cleared = store.len();
        store.clear();
        debug!(cleared, "cleared committed samples");
    }

    // -----------------------------------------------------------------------
    // Readers
    // -----------------------------------------------------------------------

    /// Takes the store lock in shared mode.
    ///
    /// Every read through the returned guard sees the same committed data;
    /// drains and evictions wait until it is dropped.  Blocks while an
    /// exclusive operation is in progress.
    pub fn read(&self) -> ReadGuard<'_> {
        ReadGuard {
            store: self.inner.store.read(),
        }
    }

    /// Like [`read`](Self::read), but returns `None` instead of waiting for
    /// an exclusive holder.
    pub fn try_read(&self) -> Option<ReadGuard<'_>> {
        self.inner
            .store
            .try_read()
            .map(|store| ReadGuard { store })
    }

    /// Number of committed samples, read under a short-lived shared lock.
    ///
    /// The one-shot accessors take the lock recursively, so they are safe to
    /// call while this thread already holds a [`ReadGuard`] and a writer is
    /// queued behind it.
    pub fn len(&self) -> usize {
        self.inner.store.read_recursive().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.store.read_recursive().is_empty()
    }

    /// Current bounding rectangle, read under a short-lived shared lock.
    pub fn bounding_rect(&self) -> BoundingRect {
        self.inner.store.read_recursive().bounds()
    }

    /// Number of samples queued but not yet committed.
    pub fn pending_len(&self) -> usize {
        self.inner.pending.lock().len()
    }

    pub fn stats(&self) -> CadenceStats {
        self.inner.metrics.snapshot()
    }

    #[cfg(test)]
    pub(crate) fn ptr_eq(&self, other: &CadenceBuffer) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for CadenceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// ReadGuard
// ---------------------------------------------------------------------------

/// A consistent view of the committed samples.
///
/// Holds the store lock in shared mode until dropped.
pub struct ReadGuard<'a> {
    store: RwLockReadGuard<'a, CommittedStore>,
}

impl ReadGuard<'_> {
    /// Number of committed samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the committed sample at `index`.
    pub fn value(&self, index: usize) -> Result<Sample> {
        self.store.get(index).ok_or(CadenceError::OutOfRange {
            index,
            len: self.store.len(),
        })
    }

    /// The bounding rectangle of the committed samples.
    ///
    /// [`BoundingRect::Invalid`] means no data.
    #[inline]
    pub fn bounding_rect(&self) -> BoundingRect {
        self.store.bounds()
    }

    #[inline]
    pub fn samples(&self) -> &[Sample] {
        self.store.as_slice()
    }

    pub fn iter(&self) -> Copied<slice::Iter<'_, Sample>> {
        self.store.as_slice().iter().copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn uncontested_append_commits_immediately() {
        let buffer = CadenceBuffer::new();
        assert!(buffer.append((0.0, 1.0)));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.pending_len(), 0);
    }

    #[test]
    fn append_under_reader_is_deferred_not_lost() {
        let buffer = CadenceBuffer::new();
        buffer.append((0.0, 0.0));

        let view = buffer.read();
        assert!(!buffer.append((1.0, 1.0)), "store is read-locked");
        assert!(!buffer.try_drain());
        assert_eq!(view.len(), 1);
        assert_eq!(buffer.pending_len(), 1);
        drop(view);

        assert!(buffer.try_drain());
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.pending_len(), 0);
    }

    #[test]
    fn flush_drains_without_new_append() {
        let buffer = CadenceBuffer::new();
        {
            let _view = buffer.read();
            buffer.append((0.0, 0.0));
            buffer.append((1.0, 0.0));
        }
        assert_eq!(buffer.flush(), 2);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.flush(), 0);
    }

    #[test]
    fn value_out_of_range_is_an_error() {
        let buffer = CadenceBuffer::new();
        buffer.append((0.0, 0.0));
        let view = buffer.read();
        assert_eq!(
            view.value(1),
            Err(CadenceError::OutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn eviction_skips_pending_samples() {
        let buffer = CadenceBuffer::new();
        for x in 0..5 {
            buffer.append((x as f64, 0.0));
        }
        {
            let _view = buffer.read();
            buffer.append((5.0, 0.0));
        }
        assert_eq!(buffer.evict_stale(3.5), 3);
        assert_eq!(buffer.len(), 2, "pending sample must not be merged by eviction");
        assert_eq!(buffer.pending_len(), 1);
    }

    #[test]
    fn clear_all_keeps_rect_and_pending() {
        let buffer = CadenceBuffer::new();
        buffer.append((0.0, 2.0));
        let rect = buffer.bounding_rect();
        {
            let _view = buffer.read();
            buffer.append((1.0, 3.0));
        }
        buffer.clear_all();
        assert!(buffer.is_empty());
        assert_eq!(buffer.bounding_rect(), rect);
        assert_eq!(buffer.pending_len(), 1);
    }

    #[test]
    fn try_read_fails_while_exclusive_lock_is_held() {
        let buffer = CadenceBuffer::new();
        let _store = buffer.inner.store.write();
        assert!(buffer.try_read().is_none());
    }

    #[test]
    fn pending_limit_forces_blocking_drain() {
        let buffer = CadenceBuffer::builder().pending_limit(2).build();
        let view = buffer.read();

        let producer = {
            let b = buffer.clone();
            thread::spawn(move || {
                let first = b.append((0.0, 0.0));
                let second = b.append((1.0, 0.0));
                (first, second)
            })
        };

        // Both drain attempts are recorded as deferred before the second
        // append parks on the write lock.
        while buffer.stats().deferred_drains < 2 {
            thread::yield_now();
        }
        assert_eq!(view.len(), 0);
        drop(view);

        let (first, second) = producer.join().unwrap();
        assert!(!first, "first append defers");
        assert!(second, "second append hits the limit and waits");

        assert_eq!(buffer.len(), 2);
        let stats = buffer.stats();
        assert_eq!(stats.forced_drains, 1);
        assert_eq!(stats.deferred_drains, 2);
    }

    #[test]
    fn one_shot_accessors_do_not_deadlock_behind_waiting_writer() {
        let buffer = CadenceBuffer::new();
        buffer.append((0.0, 1.0));
        buffer.append((2.0, 3.0));

        let view = buffer.read();
        let evictor = {
            let b = buffer.clone();
            thread::spawn(move || b.evict_stale(1.0))
        };
        // Give the evictor time to queue on the write lock.
        thread::sleep(Duration::from_millis(50));

        assert_eq!(buffer.len(), 2);
        assert!(!buffer.is_empty());
        assert_eq!(buffer.bounding_rect(), view.bounding_rect());
        drop(view);

        assert_eq!(evictor.join().unwrap(), 0);
    }

    #[test]
    fn clones_share_state() {
        let a = CadenceBuffer::new();
        let b = a.clone();
        a.append((0.0, 0.0));
        assert!(a.ptr_eq(&b));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn shared_instance_is_unique() {
        let a = CadenceBuffer::shared();
        let b = CadenceBuffer::shared();
        assert!(std::ptr::eq(a, b));
        assert!(a.ptr_eq(b));
    }
}
