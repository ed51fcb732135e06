//! QuadCellError: unified error type for quad-cell public APIs
//!
//! This error type is used throughout the quad-cell library to provide robust,
//! non-panicking error handling for all public APIs. Per-call geometric outcomes
//! (a point landing outside the cell, a degenerate Newton solve, a line parallel
//! to the cell plane) are not errors; they are reported through the result types
//! of the individual operations.

use thiserror::Error;

/// Unified error type for quad-cell operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuadCellError {
    /// Attempted to construct a PointId with a zero value (invalid).
    #[error("PointId must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidPointId,
    /// Edge index outside `0..4`.
    #[error("edge index out of range: {0} (a quadrilateral has edges 0..=3)")]
    EdgeIndexOutOfRange(usize),
    /// Geometry too degenerate for the requested quantity.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}
