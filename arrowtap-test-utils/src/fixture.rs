//! Scripted in-memory engine implementing the executor contract.
//!
//! `FixtureEngine` plays the role of the embedded source engine for tests
//! and demos: a fixed result schema and row set, grouped into native chunks,
//! honoring the explicit chunk-size override, with observable lifecycle
//! counters and injectable open/execute failures.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use arrowtap_engine::{
    EngineSession, ProcessParams, QueryEngine, Row, RowChunk, RowCursor, SourceColumn,
};
use arrowtap_result::{Error, Result};

const DEFAULT_NATIVE_CHUNK_ROWS: usize = 1024;

/// In-memory engine used for tests and demos.
#[derive(Clone)]
pub struct FixtureEngine {
    columns: Vec<SourceColumn>,
    rows: Vec<Row>,
    native_chunk_rows: usize,
    open_error: Option<String>,
    execute_error: Option<String>,
    close_calls: Arc<AtomicUsize>,
    opened_params: Arc<Mutex<Option<ProcessParams>>>,
}

impl FixtureEngine {
    pub fn new(columns: Vec<SourceColumn>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            native_chunk_rows: DEFAULT_NATIVE_CHUNK_ROWS,
            open_error: None,
            execute_error: None,
            close_calls: Arc::new(AtomicUsize::new(0)),
            opened_params: Arc::new(Mutex::new(None)),
        }
    }

    /// Override the engine's native result chunk size, in rows.
    pub fn with_native_chunk_rows(mut self, rows: usize) -> Self {
        self.native_chunk_rows = rows.max(1);
        self
    }

    /// Make `open` fail with a resource error.
    pub fn with_open_error(mut self, message: impl Into<String>) -> Self {
        self.open_error = Some(message.into());
        self
    }

    /// Make `execute` fail with a resource error.
    pub fn with_execute_error(mut self, message: impl Into<String>) -> Self {
        self.execute_error = Some(message.into());
        self
    }

    /// How many times a session of this engine has been closed.
    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    /// The parameters the engine was most recently opened with.
    pub fn opened_params(&self) -> Option<ProcessParams> {
        self.opened_params
            .lock()
            .expect("fixture params lock poisoned")
            .clone()
    }
}

impl QueryEngine for FixtureEngine {
    type Session = FixtureSession;

    fn open(&self, _path: &Path, params: ProcessParams) -> Result<Self::Session> {
        *self
            .opened_params
            .lock()
            .expect("fixture params lock poisoned") = Some(params);

        if let Some(message) = &self.open_error {
            return Err(Error::Resource(message.clone()));
        }

        Ok(FixtureSession {
            columns: self.columns.clone(),
            rows: self.rows.clone(),
            native_chunk_rows: self.native_chunk_rows,
            chunk_override: None,
            execute_error: self.execute_error.clone(),
            close_calls: Arc::clone(&self.close_calls),
        })
    }
}

/// One scripted connection produced by [`FixtureEngine::open`].
pub struct FixtureSession {
    columns: Vec<SourceColumn>,
    rows: Vec<Row>,
    native_chunk_rows: usize,
    chunk_override: Option<usize>,
    execute_error: Option<String>,
    close_calls: Arc<AtomicUsize>,
}

impl EngineSession for FixtureSession {
    type Cursor = FixtureCursor;

    fn set_chunk_size(&mut self, rows: usize) {
        self.chunk_override = Some(rows.max(1));
    }

    fn execute(&mut self, _query: &str) -> Result<Self::Cursor> {
        if let Some(message) = &self.execute_error {
            return Err(Error::Resource(message.clone()));
        }

        let chunk_rows = self.chunk_override.unwrap_or(self.native_chunk_rows);
        let chunks: Vec<RowChunk> = self
            .rows
            .chunks(chunk_rows)
            .map(|chunk| chunk.to_vec())
            .collect();

        Ok(FixtureCursor {
            columns: self.columns.clone(),
            chunks,
            position: 0,
        })
    }

    fn close(&mut self) -> Result<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Forward-only cursor over the fixture's pre-chunked rows.
pub struct FixtureCursor {
    columns: Vec<SourceColumn>,
    chunks: Vec<RowChunk>,
    position: usize,
}

impl RowCursor for FixtureCursor {
    fn columns(&self) -> &[SourceColumn] {
        &self.columns
    }

    fn next_chunk(&mut self) -> Result<Option<RowChunk>> {
        if self.position >= self.chunks.len() {
            return Ok(None);
        }
        let chunk = std::mem::take(&mut self.chunks[self.position]);
        self.position += 1;
        Ok(Some(chunk))
    }
}
