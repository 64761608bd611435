//! Engine lifecycle traits: open a session, execute, pull chunks, close.

use std::path::Path;

use arrowtap_result::Result;

use crate::params::ProcessParams;
use crate::types::{RowChunk, SourceColumn};

/// Entry point into a concrete source engine.
///
/// `open` spawns or attaches the engine's helper process and connects it to
/// the database at `path`. Failures here are resource errors and surface
/// directly to the caller; no stream object exists yet.
pub trait QueryEngine {
    type Session: EngineSession;

    fn open(&self, path: &Path, params: ProcessParams) -> Result<Self::Session>;
}

/// One exclusive connection to an open engine.
///
/// A session is owned by exactly one stream for its whole lifetime and is
/// never shared. `close` releases the connection and whatever process
/// resources back it; implementations must tolerate it being called at most
/// once (the stream guarantees exactly once).
pub trait EngineSession {
    type Cursor: RowCursor;

    /// Request an explicit result chunk size, in rows.
    ///
    /// Only invoked for nonzero caller overrides; without it the engine
    /// groups rows into its native chunks.
    fn set_chunk_size(&mut self, rows: usize);

    /// Execute a query, returning a forward-only cursor over its results.
    fn execute(&mut self, query: &str) -> Result<Self::Cursor>;

    /// Release the connection and the engine process's resources.
    fn close(&mut self) -> Result<()>;
}

/// Forward-only, single-pass cursor over query results.
///
/// Rows arrive grouped into native chunks. The column metadata is fixed for
/// the cursor's lifetime; every row's values match it in order and count.
/// A cursor is never restartable: once `next_chunk` returns `Ok(None)` the
/// results are exhausted for good.
pub trait RowCursor {
    /// Result schema metadata, stable across the cursor's lifetime.
    fn columns(&self) -> &[SourceColumn];

    /// Pull the next native chunk, or `Ok(None)` at end of results.
    ///
    /// May block on the engine's storage I/O.
    fn next_chunk(&mut self) -> Result<Option<RowChunk>>;
}
