//! Source engine contract for the arrowtap streaming converter.
//!
//! The conversion core never talks to a concrete database engine directly.
//! It is generic over the traits in this crate: a [`QueryEngine`] opens an
//! [`EngineSession`] against a database file, the session executes a query
//! and hands back a forward-only [`RowCursor`] partitioned into native
//! chunks. The traits mirror the lifecycle of an embedded engine that runs
//! as a helper process: open spawns/attaches, close releases the connection
//! and the process's resources.
//!
//! The value model ([`Value`], [`SqlType`]) intentionally exposes the
//! engine's raw representations (Julian day numbers for dates, microseconds
//! since the Julian epoch for timestamps, exact fixed-point strings for
//! numerics) so the conversion layer owns every epoch/precision transform.

pub mod params;
pub mod session;
pub mod types;

pub use params::ProcessParams;
pub use session::{EngineSession, QueryEngine, RowCursor};
pub use types::{Row, RowChunk, SourceColumn, SourceInterval, SqlType, Value};
