//! Chunked query-result to Arrow streaming for embedded analytical engines.
//!
//! Executes a query through an [`arrowtap_engine::QueryEngine`] and exposes
//! the results as a pull-based stream of Arrow
//! [`RecordBatch`](arrow::array::RecordBatch)es: one batch per native result
//! chunk (or per explicit `chunk_size` override), built column by column
//! through typed Arrow builders and handed to the consumer without copying.
//!
//! # Usage
//!
//! ```rust,ignore
//! use arrowtap_engine::ProcessParams;
//! use arrowtap_stream::read_from_query;
//!
//! let mut handle = read_from_query(
//!     &engine,
//!     path,
//!     "SELECT * FROM spaceship",
//!     ProcessParams::new(),
//!     0, // native chunking
//! )?;
//! while let Some(batch) = handle.next_batch()? {
//!     consume(batch);
//! }
//! handle.release()?;
//! ```
//!
//! # Type mapping
//!
//! | source type                      | Arrow type                            |
//! |----------------------------------|---------------------------------------|
//! | small-int / int / big-int        | `Int16` / `Int32` / `Int64`           |
//! | object-id                        | `UInt32`                              |
//! | float / double                   | `Float32` / `Float64`                 |
//! | geography, bytes                 | `LargeBinary`                         |
//! | varchar, char, text, json        | `LargeUtf8`                           |
//! | boolean                          | `Boolean`                             |
//! | date                             | `Date32`                              |
//! | timestamp / timestamp-with-tz    | `Timestamp(us)` / `Timestamp(us, UTC)`|
//! | interval                         | `Interval(MonthDayNano)`              |
//! | time                             | `Time64(us)`                          |
//! | numeric(p, s), p and s < 39      | `Decimal128(p, s)`                    |
//!
//! Dates and timestamps are rebased from the engine's Julian epoch onto the
//! Unix epoch during conversion.

#![forbid(unsafe_code)]

use std::path::Path;

use arrowtap_engine::{EngineSession, ProcessParams, QueryEngine};
use arrowtap_result::Result;

mod convert;

pub mod handle;
pub mod schema;
pub mod stream;

pub use handle::{StreamHandle, StreamReader};
pub use schema::{translate_schema, NUMERIC_DIGIT_LIMIT};
pub use stream::QueryStream;

/// Execute `query` against the database at `path` and stream the results.
///
/// `params` is normalized per the engine contract before the session opens
/// (see [`ProcessParams::normalized`]). `chunk_size` of zero defers to the
/// source's native chunking; a positive value requests that many rows per
/// chunk from the engine.
///
/// Failures to open the session or execute the query surface directly from
/// this call; no stream object exists yet. On success the returned
/// [`StreamHandle`] exclusively owns the session and cursor; the caller
/// releases it exactly once.
pub fn read_from_query<E: QueryEngine>(
    engine: &E,
    path: &Path,
    query: &str,
    params: ProcessParams,
    chunk_size: usize,
) -> Result<StreamHandle<E::Session>> {
    let params = params.normalized();
    tracing::debug!(path = %path.display(), chunk_size, "opening source session");

    let mut session = engine.open(path, params)?;
    if chunk_size > 0 {
        session.set_chunk_size(chunk_size);
    }

    let cursor = match session.execute(query) {
        Ok(cursor) => cursor,
        Err(err) => {
            // The session never reaches a stream; close it before surfacing.
            let _ = session.close();
            return Err(err);
        }
    };

    Ok(StreamHandle::new(QueryStream::new(session, cursor)))
}
