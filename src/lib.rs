//! # quad-cell
//!
//! quad-cell is a small Rust library for evaluating bilinear quadrilateral
//! cells, designed as the per-cell geometric core of mesh and geometry
//! pipelines for scientific computing and PDE codes. It provides parametric
//! mappings (forward and Newton-based inverse), shape functions, boundary
//! classification, case-table isocontour extraction, line intersection, and
//! sub-triangulation for a single cell's four corners at a time.
//!
//! ## Features
//! - [`cell::quad::Quad`]: the cell value type and its six evaluators
//! - Tagged [`cell::quad::PositionResult`] outcomes instead of integer codes
//! - Pluggable [`cell::contour::ContourSink`] output for contour extraction
//! - Stateless [`geometry`] helpers (vector, plane, segment math)
//! - Strong [`topology::point::PointId`] handles for corner vertices
//!
//! ## Determinism
//!
//! Every operation is a pure function of its inputs; contour output is
//! appended in fixed case-table order, so results are reproducible across
//! runs and safe to compute on separate threads per cell.
//!
//! ## Usage
//! Add `quad-cell` as a dependency in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! quad-cell = "0.4"
//! ```
//!
//! ```rust
//! use quad_cell::prelude::*;
//!
//! let ids = [1, 2, 3, 4].map(|i| PointId::new(i).unwrap());
//! let quad = Quad::new(
//!     [
//!         [0.0, 0.0, 0.0],
//!         [1.0, 0.0, 0.0],
//!         [1.0, 1.0, 0.0],
//!         [0.0, 1.0, 0.0],
//!     ],
//!     ids,
//! );
//! assert!(quad.evaluate_position([0.25, 0.5, 0.0]).is_inside());
//! ```

// Re-export our major subsystems:
pub mod cell;
pub mod geometry;
pub mod quad_error;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::cell::contour::{ContourBuffers, ContourSink};
    pub use crate::cell::quad::{
        BoundaryEdge, LineIntersection, PositionInfo, PositionResult, Quad, QuadEdge, Triangle,
    };
    pub use crate::quad_error::QuadCellError;
    pub use crate::topology::point::PointId;
}
