use crate::cadence::CadenceBuffer;

/// Default number of samples the committed store reserves up front.
pub const DEFAULT_INITIAL_CAPACITY: usize = 1_000;

/// Builder for configuring and constructing a [`CadenceBuffer`].
///
/// # Example
/// ```
/// use cadence::CadenceBuilder;
///
/// let buffer = CadenceBuilder::new()
///     .initial_capacity(10_000)
///     .pending_limit(4_096)
///     .build();
/// assert_eq!(buffer.len(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct CadenceBuilder {
    initial_capacity: usize,
    pending_limit: Option<usize>,
}

impl CadenceBuilder {
    pub fn new() -> Self {
        CadenceBuilder {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            pending_limit: None,
        }
    }

    /// Number of samples the committed store reserves before the first
    /// append (default: 1000).
    pub fn initial_capacity(mut self, n: usize) -> Self {
        self.initial_capacity = n;
        self
    }

    /// Bounds the pending backlog.
    ///
    /// When a non-blocking drain attempt fails and `n` or more samples are
    /// still pending, `append` blocks on the store's exclusive lock and
    /// drains instead of deferring again.  Unset by default, in which case
    /// `append` never blocks on the store lock and the backlog is unbounded.
    pub fn pending_limit(mut self, n: usize) -> Self {
        assert!(n > 0, "pending_limit must be greater than 0");
        self.pending_limit = Some(n);
        self
    }

    pub fn build(self) -> CadenceBuffer {
        CadenceBuffer::new_with(self.initial_capacity, self.pending_limit)
    }
}

impl Default for CadenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
