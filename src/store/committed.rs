use crate::eviction;
use crate::sample::{BoundingRect, Sample};

// ---------------------------------------------------------------------------
// CommittedStore
// ---------------------------------------------------------------------------

/// The reader-visible, ordered sample sequence plus its bounding rectangle.
///
/// Not synchronised by itself: the cadence buffer keeps it behind an
/// `RwLock` and only mutates it while holding the exclusive side.
pub struct CommittedStore {
    values: Vec<Sample>,
    bounds: BoundingRect,
}

impl CommittedStore {
    pub fn with_capacity(capacity: usize) -> Self {
        CommittedStore {
            values: Vec::with_capacity(capacity),
            bounds: BoundingRect::Invalid,
        }
    }

    /// Appends `sample` and grows the bounding rectangle in O(1).
    #[inline]
    pub fn append(&mut self, sample: Sample) {
        self.values.push(sample);
        self.bounds.extend(sample);
    }

    /// Empties the sequence.
    ///
    /// The bounding rectangle is left as it was; resetting it is up to the
    /// caller.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Drops every sample before the eviction window for `limit` and
    /// recomputes the bounding rectangle over what is left.
    ///
    /// Returns the number of samples dropped.
    pub fn evict_stale(&mut self, limit: f64) -> usize {
        let start = eviction::window_start(&self.values, limit);
        self.values.drain(..start);

        self.bounds = BoundingRect::Invalid;
        for &sample in &self.values {
            self.bounds.extend(sample);
        }
        start
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Sample> {
        self.values.get(index).copied()
    }

    #[inline]
    pub fn bounds(&self) -> BoundingRect {
        self.bounds
    }

    #[inline]
    pub fn as_slice(&self) -> &[Sample] {
        &self.values
    }
}

impl Default for CommittedStore {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn store_of(points: &[(f64, f64)]) -> CommittedStore {
        let mut store = CommittedStore::default();
        for &p in points {
            store.append(p.into());
        }
        store
    }

    #[test]
    fn append_preserves_order_and_bounds() {
        let store = store_of(&[(0.0, 1.0), (1.0, 3.0), (2.0, 2.0)]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(1), Some(Sample::new(1.0, 3.0)));
        assert_eq!(
            store.bounds(),
            BoundingRect::Valid {
                left: 0.0,
                top: 1.0,
                right: 2.0,
                bottom: 3.0
            }
        );
    }

    #[test]
    fn clear_keeps_bounding_rect() {
        let mut store = store_of(&[(0.0, 1.0), (1.0, 3.0)]);
        let before = store.bounds();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.bounds(), before, "clear must not reset the rect");
    }

    #[test]
    fn evict_recomputes_bounds_for_tail() {
        let mut store = store_of(&[(0.0, 1.0), (1.0, 3.0), (2.0, 2.0)]);
        let dropped = store.evict_stale(2.0);
        assert_eq!(dropped, 1);
        assert_eq!(store.as_slice(), &[Sample::new(1.0, 3.0), Sample::new(2.0, 2.0)]);
        assert_eq!(
            store.bounds(),
            BoundingRect::Valid {
                left: 1.0,
                top: 2.0,
                right: 2.0,
                bottom: 3.0
            }
        );
    }

    #[test]
    fn evict_on_empty_store_invalidates_bounds() {
        let mut store = store_of(&[(0.0, 1.0)]);
        store.clear();
        assert_eq!(store.evict_stale(10.0), 0);
        assert_eq!(store.bounds(), BoundingRect::Invalid);
    }

    #[test]
    fn append_after_clear_keeps_stale_left_edge() {
        // The rect survives `clear`, so the next append only moves the
        // right edge and widens y.
        let mut store = store_of(&[(0.0, 1.0)]);
        store.clear();
        store.append(Sample::new(5.0, 0.5));
        assert_eq!(
            store.bounds(),
            BoundingRect::Valid {
                left: 0.0,
                top: 0.5,
                right: 5.0,
                bottom: 1.0
            }
        );
    }
}
