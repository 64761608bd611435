//! Owned result handle and the Arrow C stream interop shim.

use std::sync::Arc;

use arrow::array::{RecordBatch, RecordBatchReader};
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::ffi_stream::FFI_ArrowArrayStream;

use arrowtap_engine::EngineSession;
use arrowtap_result::Result;

use crate::stream::QueryStream;

/// Opaque owner of one query's result stream.
///
/// Returned by [`read_from_query`](crate::read_from_query); ownership
/// transfers to the caller, who releases it exactly once, explicitly via
/// [`StreamHandle::release`] or implicitly on drop. A second release is a
/// no-op and never double-closes the engine session.
pub struct StreamHandle<S: EngineSession> {
    stream: QueryStream<S>,
}

impl<S: EngineSession> std::fmt::Debug for StreamHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

impl<S: EngineSession> StreamHandle<S> {
    pub(crate) fn new(stream: QueryStream<S>) -> Self {
        Self { stream }
    }

    /// The translated result schema; idempotent, never advances the cursor.
    pub fn schema(&mut self) -> Result<SchemaRef> {
        self.stream.schema()
    }

    /// Pull the next converted batch, or `Ok(None)` once exhausted.
    pub fn next_batch(&mut self) -> Result<Option<RecordBatch>> {
        self.stream.next_batch()
    }

    /// The most recently recorded failure message, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.stream.last_error()
    }

    /// Release the stream and the engine resources behind it. Idempotent.
    pub fn release(&mut self) -> Result<()> {
        self.stream.close()
    }

    /// Convert into a [`RecordBatchReader`] for in-process consumers.
    ///
    /// Resolves the schema up front (the reader contract requires an
    /// infallible schema accessor), so an untranslatable result schema
    /// fails here rather than mid-iteration.
    pub fn into_reader(mut self) -> Result<StreamReader<S>> {
        let schema = self.stream.schema()?;
        Ok(StreamReader {
            stream: self.stream,
            schema,
        })
    }

    /// Export as an Arrow C stream.
    ///
    /// This is the literal interop boundary: the returned struct carries
    /// its own release callback and error slot, and consumers drive it
    /// through the C ABI's get_schema/get_next/get_last_error/release
    /// convention. Releasing the C stream closes the engine session.
    pub fn into_ffi(self) -> Result<FFI_ArrowArrayStream>
    where
        S: Send + 'static,
        S::Cursor: Send + 'static,
    {
        let reader = self.into_reader()?;
        Ok(FFI_ArrowArrayStream::new(Box::new(reader)))
    }
}

/// [`RecordBatchReader`] adapter over a [`QueryStream`].
pub struct StreamReader<S: EngineSession> {
    stream: QueryStream<S>,
    schema: SchemaRef,
}

impl<S: EngineSession> Iterator for StreamReader<S> {
    type Item = std::result::Result<RecordBatch, ArrowError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.stream.next_batch() {
            Ok(Some(batch)) => Some(Ok(batch)),
            Ok(None) => None,
            Err(err) => Some(Err(ArrowError::ExternalError(Box::new(err)))),
        }
    }
}

impl<S: EngineSession> RecordBatchReader for StreamReader<S> {
    fn schema(&self) -> SchemaRef {
        Arc::clone(&self.schema)
    }
}
