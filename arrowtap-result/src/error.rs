use std::{fmt, io};
use thiserror::Error;

/// Unified error type for all arrowtap operations.
///
/// This enum encompasses every failure mode across the stack, from schema
/// translation through per-value conversion to source-engine lifecycle
/// management. Each variant includes context-specific information to help
/// diagnose and handle the error appropriately.
///
/// # Error Handling Strategy
///
/// Errors propagate upward through the call stack using Rust's `?` operator.
/// At the stream boundary they are recorded in the stream's error slot and
/// move the stream into a permanent error state; at the C stream interop
/// boundary they become a nonzero status code plus a `get_last_error`
/// message. Internal code can match on specific variants for fine-grained
/// handling.
///
/// # Thread Safety
///
/// `Error` implements `Send` and `Sync`, allowing errors to be safely passed
/// between threads.
#[derive(Error, Debug)]
pub enum Error {
    /// A source column type has no Arrow counterpart.
    ///
    /// The mapping from source types to Arrow types is a fixed table; any
    /// tag outside it fails schema translation. The message names the
    /// offending type and column.
    #[error("unsupported source type: {0}")]
    Schema(String),

    /// Decimal precision or scale at or beyond the supported bound.
    ///
    /// Arrow's `Decimal128` carries at most 38 significant digits, so both
    /// precision and scale must be strictly less than 39. The translator
    /// rejects anything wider before a single value is converted.
    #[error("numeric precision/scale ({precision}, {scale}) exceeds the supported maximum of 38 digits")]
    PrecisionRange { precision: u32, scale: u32 },

    /// A value could not be appended to its column buffer.
    ///
    /// Fatal to the chunk being built: partially shaped chunks are never
    /// yielded, and the stream will not produce further batches. The variant
    /// names the column and the value kind that failed.
    #[error("cannot convert {kind} value in column {column}: {reason}")]
    Conversion {
        column: String,
        kind: &'static str,
        reason: String,
    },

    /// A date or timestamp value falls outside the representable range.
    ///
    /// Source dates are unsigned Julian day numbers and source timestamps
    /// are unsigned microsecond counts; values beyond the signed target
    /// range cannot be rebased onto the Unix epoch.
    #[error("value out of range: {0}")]
    Range(String),

    /// Failure to open, execute against, or cleanly release the source.
    ///
    /// Open and execute failures occur before any stream object exists and
    /// surface directly to the caller of the top-level entry point. Release
    /// failures leave the underlying process's resources leaked.
    #[error("source resource error: {0}")]
    Resource(String),

    /// Arrow library error during columnar data operations.
    ///
    /// Raised when assembling record batches or exporting across the C data
    /// interface; typically indicates a schema/array mismatch.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// I/O error during file or path operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Internal error indicating a bug or unexpected state.
    ///
    /// This error should never occur during normal operation. It indicates a
    /// violated invariant, such as a row whose arity drifts from the cursor's
    /// column metadata mid-stream.
    #[error("an internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create a conversion error for a specific column and value kind from
    /// any displayable reason.
    #[inline]
    pub fn conversion<R: fmt::Display>(column: &str, kind: &'static str, reason: R) -> Self {
        Error::Conversion {
            column: column.to_string(),
            kind,
            reason: reason.to_string(),
        }
    }

    /// Create a resource error from any displayable error.
    ///
    /// Convenience for adapting engine-side failures while preserving the
    /// original message.
    #[inline]
    pub fn resource<E: fmt::Display>(err: E) -> Self {
        Error::Resource(err.to_string())
    }
}
