//! Cell evaluators.
//!
//! Currently this covers the bilinear quadrilateral; the surrounding mesh
//! layer is expected to dispatch by cell type and hand each quad's corner
//! data to [`quad::Quad`].

pub mod contour;
pub mod quad;

pub use contour::{ContourBuffers, ContourSink};
pub use quad::Quad;
