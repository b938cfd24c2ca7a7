//! Sliding-window eviction rule.
//!
//! The window keeps the newest sample whose `x` is below the limit as a left
//! anchor, plus everything after it.  A live chart can then pin its left edge
//! to a point just outside the visible range, so the trace enters the plot
//! from the border instead of starting mid-screen.
//!
//! Boundary behaviour:
//!
//! | committed data                      | retained            |
//! |-------------------------------------|---------------------|
//! | no sample has `x < limit`           | everything          |
//! | only index 0 has `x < limit`        | everything          |
//! | newest sample below limit at `i>0`  | `values[i..]`       |
//! | empty                               | nothing             |
//!
//! The newest sample is always retained while the store is non-empty.

use crate::sample::Sample;

/// Returns the index of the first sample to keep when evicting with `limit`.
///
/// Scans from the newest sample backwards and stops at the first one with
/// `x < limit`.  Returns `0` when no such sample exists.
pub fn window_start(values: &[Sample], limit: f64) -> usize {
    values.iter().rposition(|s| s.x < limit).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
