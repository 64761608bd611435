//! Pull-based chunk producer over an engine cursor.

use std::sync::Arc;

use arrow::array::{ArrayRef, RecordBatch, RecordBatchOptions};
use arrow::datatypes::SchemaRef;

use arrowtap_engine::{EngineSession, RowCursor};
use arrowtap_result::{Error, Result};

use crate::convert::ColumnWriter;
use crate::schema::translate_schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Streaming,
    Exhausted,
    Errored,
    Released,
}

/// Streaming view over one query's results.
///
/// Owns the engine session and its cursor exclusively; nothing else may
/// advance them. Each [`QueryStream::next_batch`] call pulls one native
/// chunk from the cursor, converts every row through fresh per-column
/// writers, and finalizes them into one immutable [`RecordBatch`] whose
/// ownership transfers to the caller.
///
/// The stream is strictly single-threaded and synchronous: every call
/// blocks until complete, and the only cancellation primitive is
/// [`QueryStream::close`], which is safe only between chunk requests.
pub struct QueryStream<S: EngineSession> {
    session: Option<S>,
    cursor: Option<S::Cursor>,
    schema: Option<SchemaRef>,
    phase: Phase,
    last_error: Option<String>,
}

impl<S: EngineSession> QueryStream<S> {
    pub(crate) fn new(session: S, cursor: S::Cursor) -> Self {
        Self {
            session: Some(session),
            cursor: Some(cursor),
            schema: None,
            phase: Phase::Streaming,
            last_error: None,
        }
    }

    /// The translated result schema.
    ///
    /// A pure function of the cursor's metadata: resolved once, cached, and
    /// returned as clones of the same `Arc` thereafter. Never advances the
    /// cursor, so interleaving schema requests with chunk requests is safe.
    pub fn schema(&mut self) -> Result<SchemaRef> {
        if let Some(schema) = &self.schema {
            return Ok(Arc::clone(schema));
        }
        let cursor = self
            .cursor
            .as_ref()
            .ok_or_else(|| Error::Resource("stream already released".to_string()))?;
        match translate_schema(cursor.columns()) {
            Ok(schema) => {
                self.schema = Some(Arc::clone(&schema));
                Ok(schema)
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Pull and convert the next chunk, or `Ok(None)` once exhausted.
    ///
    /// End of results is a signal, not an error, and it is sticky: every
    /// call after the first `Ok(None)` returns `Ok(None)` again. Any
    /// failure while pulling or converting records its message, moves the
    /// stream into a permanent error state, and is returned; a partially
    /// converted chunk is never yielded.
    pub fn next_batch(&mut self) -> Result<Option<RecordBatch>> {
        match self.phase {
            Phase::Exhausted => return Ok(None),
            Phase::Errored => {
                return Err(Error::Resource(format!(
                    "stream terminated by previous error: {}",
                    self.last_error.as_deref().unwrap_or("unknown")
                )));
            }
            Phase::Released => {
                return Err(Error::Resource("stream already released".to_string()));
            }
            Phase::Streaming => {}
        }

        match self.pull_batch() {
            Ok(batch) => Ok(batch),
            Err(err) => {
                self.last_error = Some(err.to_string());
                self.phase = Phase::Errored;
                tracing::error!(error = %err, "chunk build failed; stream terminated");
                Err(err)
            }
        }
    }

    fn pull_batch(&mut self) -> Result<Option<RecordBatch>> {
        let cursor = self
            .cursor
            .as_mut()
            .ok_or_else(|| Error::Internal("active stream has no cursor".to_string()))?;

        let Some(chunk) = cursor.next_chunk()? else {
            self.phase = Phase::Exhausted;
            tracing::debug!("cursor exhausted");
            return Ok(None);
        };

        let schema = self.schema()?;
        let mut writers: Vec<ColumnWriter> = schema
            .fields()
            .iter()
            .map(|field| ColumnWriter::for_field(field, chunk.len()))
            .collect::<Result<_>>()?;

        for row in &chunk {
            if row.len() != writers.len() {
                return Err(Error::Internal(format!(
                    "row arity {} does not match {} schema columns",
                    row.len(),
                    writers.len()
                )));
            }
            for (idx, value) in row.iter().enumerate() {
                writers[idx].append(schema.field(idx).name(), value)?;
            }
        }

        let arrays: Vec<ArrayRef> = writers.iter_mut().map(ColumnWriter::finish).collect();
        let options = RecordBatchOptions::new().with_row_count(Some(chunk.len()));
        let batch = RecordBatch::try_new_with_options(Arc::clone(&schema), arrays, &options)?;
        tracing::trace!(
            rows = batch.num_rows(),
            columns = batch.num_columns(),
            "built record batch"
        );
        Ok(Some(batch))
    }

    /// The most recently recorded failure message, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Release the cursor and close the engine session.
    ///
    /// Idempotent: the first call closes the session, every later call is a
    /// no-op. Dropping the stream closes implicitly.
    pub fn close(&mut self) -> Result<()> {
        self.cursor = None;
        self.phase = Phase::Released;
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };
        match session.close() {
            Ok(()) => {
                tracing::debug!("source session released");
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                tracing::error!(error = %err, "source session close failed");
                Err(err)
            }
        }
    }
}

impl<S: EngineSession> Drop for QueryStream<S> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
