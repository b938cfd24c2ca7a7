//! Thread-safe, append-optimised buffer of time-ordered `(x, y)` samples
//! feeding a live chart while producer threads keep appending.
//!
//! Producers call [`CadenceBuffer::append`], which never waits on readers.
//! The renderer takes a [`ReadGuard`] for a consistent view, and a
//! maintenance task calls [`CadenceBuffer::evict_stale`] to keep memory
//! bounded on long-running streams.

mod buffer;
mod builder;
mod cadence;
mod error;
mod eviction;
mod metrics;
mod sample;
mod store;

pub use builder::{CadenceBuilder, DEFAULT_INITIAL_CAPACITY};
pub use cadence::{CadenceBuffer, ReadGuard};
pub use error::{CadenceError, Result};
pub use eviction::window_start;
pub use metrics::stats::CadenceStats;
pub use sample::{BoundingRect, Sample};
