use thiserror::Error;

/// Errors returned by the cadence buffer.
///
/// A failed drain attempt inside `append` is not an error; it is the normal
/// deferred-merge path and is reported as `false` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CadenceError {
    /// A committed sample was requested at an index past the end.
    #[error("sample index {index} out of range for {len} committed samples")]
    OutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, CadenceError>;
