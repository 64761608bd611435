//! Error types and result definitions for the arrowtap streaming converter.
//!
//! This crate provides the unified error type ([`Error`]) and result type alias
//! ([`Result<T>`]) used throughout all arrowtap crates. All operations that
//! could fail return `Result<T>`, where the error variant contains detailed
//! information about what went wrong.
//!
//! # Error Categories
//!
//! - **Schema translation failures** ([`Error::Schema`]): source types with no
//!   Arrow counterpart.
//! - **Decimal parameter failures** ([`Error::PrecisionRange`]): precision or
//!   scale at or beyond the supported bound.
//! - **Value conversion failures** ([`Error::Conversion`]): a single value
//!   could not be appended to its column.
//! - **Representable-range failures** ([`Error::Range`]): date or timestamp
//!   values outside the target range.
//! - **Source resource failures** ([`Error::Resource`]): opening, executing
//!   against, or releasing the source engine.
//! - **Ambient wrappers** ([`Error::Arrow`], [`Error::Io`]).
//! - **Internal errors** ([`Error::Internal`]): bugs or unexpected states.

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
