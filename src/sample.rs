//! The unit of data and the running envelope over committed data.

/// One `(time, value)` observation.
///
/// Samples have no identity beyond their coordinates; equality and ordering
/// are by value.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Sample {
    /// Time.
    pub x: f64,
    /// Measured value.
    pub y: f64,
}

impl Sample {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Sample { x, y }
    }
}

impl From<(f64, f64)> for Sample {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Sample { x, y }
    }
}

// ---------------------------------------------------------------------------
// BoundingRect
// ---------------------------------------------------------------------------

/// Running min/max envelope over all committed samples.
///
/// `top` is the smallest `y` and `bottom` the largest, following screen
/// coordinates.  `Invalid` means no sample has been committed since the last
/// reset and must be treated as "no data".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum BoundingRect {
    #[default]
    Invalid,
    Valid {
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
    },
}

impl BoundingRect {
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, BoundingRect::Valid { .. })
    }

    /// `right - left`, or `None` while invalid.
    pub fn width(&self) -> Option<f64> {
        match *self {
            BoundingRect::Invalid => None,
            BoundingRect::Valid { left, right, .. } => Some(right - left),
        }
    }

    /// `bottom - top`, or `None` while invalid.
    pub fn height(&self) -> Option<f64> {
        match *self {
            BoundingRect::Invalid => None,
            BoundingRect::Valid { top, bottom, .. } => Some(bottom - top),
        }
    }

    /// Returns `true` if `sample` lies inside the rectangle (edges included).
    pub fn contains(&self, sample: Sample) -> bool {
        match *self {
            BoundingRect::Invalid => false,
            BoundingRect::Valid {
                left,
                top,
                right,
                bottom,
            } => sample.x >= left && sample.x <= right && sample.y >= top && sample.y <= bottom,
        }
    }

    /// Grows the rectangle to account for a newly committed sample.
    ///
    /// O(1).  Only the right edge follows `x`: samples are assumed to arrive
    /// with non-decreasing `x`, so `left` stays pinned to the first sample.
    #[inline]
    pub fn extend(&mut self, sample: Sample) {
        match self {
            BoundingRect::Invalid => {
                *self = BoundingRect::Valid {
                    left: sample.x,
                    top: sample.y,
                    right: sample.x,
                    bottom: sample.y,
                };
            }
            BoundingRect::Valid {
                top, right, bottom, ..
            } => {
                *right = sample.x;
                if sample.y > *bottom {
                    *bottom = sample.y;
                }
                if sample.y < *top {
                    *top = sample.y;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
