//! Batch engine error types.

use thiserror::Error;

/// Errors reported by [`PolygonBatch`](crate::PolygonBatch).
///
/// Every violation surfaces synchronously to the caller; nothing is
/// logged-and-continued or retried internally.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Session-bracket misuse: a draw or flush outside `begin`/`end`,
    /// a nested `begin`, or an `end` without `begin`. Indicates a caller bug.
    #[error("invalid batch state: {0}")]
    InvalidState(&'static str),

    /// Requested vertex count exceeds the signed 16-bit index space.
    #[error("can't have more than 32767 vertices per batch: {max_vertices}")]
    InvalidArgument { max_vertices: usize },

    /// A deliberately unimplemented legacy draw overload was called.
    #[error("unsupported draw operation: {0}")]
    Unsupported(&'static str),

    /// The fixed two-color shader failed to compile. Fatal: there is no
    /// fallback shader.
    #[error("error compiling shader: {log}")]
    ShaderCompile { log: String },
}

pub type BatchResult<T> = Result<T, BatchError>;
