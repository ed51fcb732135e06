//! Bilinear quadrilateral cell evaluation.
//!
//! A [`Quad`] stores four corner positions and their vertex identifiers,
//! ordered counter-clockwise around the cell. The parametric coordinate
//! `(r, s)` spans the cell bilinearly:
//! `(0,0) → p0, (1,0) → p1, (1,1) → p2, (0,1) → p3`, with the interior at
//! `[0, 1]^2`. The cell may be non-planar or non-convex; position evaluation
//! assumes near-planarity and works on the plane of the first three corners.
//!
//! All operations are pure `&self` functions; the only mutation goes through
//! the caller-supplied sink during contour extraction.

use crate::cell::contour::ContourSink;
use crate::geometry::{plane, segment, vector};
use crate::quad_error::QuadCellError;
use crate::topology::point::PointId;

const MAX_ITERATION: usize = 10;
const CONVERGED: f64 = 1e-3;
const EPS: f64 = 1e-12;

/// A quadrilateral cell: four counter-clockwise corner positions plus their
/// vertex identifiers.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Quad {
    points: [[f64; 3]; 4],
    point_ids: [PointId; 4],
}

/// Payload shared by the `Inside` and `Outside` outcomes of position
/// evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionInfo {
    /// Converged parametric coordinate `(r, s)`.
    pub pcoords: [f64; 2],
    /// Closest point on the cell: the plane projection when inside, the
    /// nearest corner or edge point when outside.
    pub closest_point: [f64; 3],
    /// Squared distance from the query point to `closest_point`.
    pub dist2: f64,
    /// Shape-function weights at `pcoords`.
    pub weights: [f64; 4],
}

/// Outcome of [`Quad::evaluate_position`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PositionResult {
    /// The query point projects into the cell footprint.
    Inside(PositionInfo),
    /// Newton converged outside `[0, 1]^2`; the payload carries the nearest
    /// cell feature and the distance to it.
    Outside(PositionInfo),
    /// Singular Newton Jacobian or iteration budget exhausted. Any parametric
    /// coordinate computed along the way is untrustworthy.
    Degenerate,
}

impl PositionResult {
    /// True only for the `Inside` outcome.
    pub fn is_inside(&self) -> bool {
        matches!(self, PositionResult::Inside(_))
    }
}

/// Nearest boundary edge in parametric space, from [`Quad::cell_boundary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundaryEdge {
    /// Vertex identifiers of the nearest edge.
    pub point_ids: [PointId; 2],
    /// Whether the parametric coordinate lies within `[0, 1]^2`. When false
    /// the edge is an extrapolated guess.
    pub on_cell: bool,
}

/// An edge of the cell as a 2-point segment, from [`Quad::edge`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadEdge {
    /// Endpoint positions.
    pub points: [[f64; 3]; 2],
    /// Endpoint vertex identifiers.
    pub point_ids: [PointId; 2],
}

/// One triangle of a quadrilateral split, from [`Quad::triangulate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    /// Corner positions.
    pub points: [[f64; 3]; 3],
    /// Corner vertex identifiers.
    pub point_ids: [PointId; 3],
}

/// A line/cell intersection, from [`Quad::intersect_with_line`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineIntersection {
    /// Parameter along the query line (`0` at `p1`, `1` at `p2`).
    pub t: f64,
    /// Intersection point on the cell plane.
    pub point: [f64; 3],
    /// Parametric coordinate of the intersection.
    pub pcoords: [f64; 2],
}

impl Quad {
    /// Create a cell from four counter-clockwise corners and their vertex
    /// identifiers.
    pub fn new(points: [[f64; 3]; 4], point_ids: [PointId; 4]) -> Self {
        Self { points, point_ids }
    }

    /// Corner position `corner` (`0..=3`). Panics on an out-of-range index.
    #[inline]
    pub fn point(&self, corner: usize) -> [f64; 3] {
        self.points[corner]
    }

    /// Vertex identifier of corner `corner` (`0..=3`). Panics on an
    /// out-of-range index.
    #[inline]
    pub fn point_id(&self, corner: usize) -> PointId {
        self.point_ids[corner]
    }

    /// All four corner positions.
    pub fn points(&self) -> &[[f64; 3]; 4] {
        &self.points
    }

    /// All four vertex identifiers.
    pub fn point_ids(&self) -> &[PointId; 4] {
        &self.point_ids
    }

    /// Bilinear interpolation weights at `(r, s)`.
    ///
    /// The weights sum to 1 for any real `(r, s)` and extrapolate outside
    /// `[0, 1]^2`.
    pub fn shape_functions(pcoords: [f64; 2]) -> [f64; 4] {
        let [r, s] = pcoords;
        let rm = 1.0 - r;
        let sm = 1.0 - s;
        [rm * sm, r * sm, r * s, rm * s]
    }

    /// Parametric derivatives of the weights, as `(∂w/∂r, ∂w/∂s)`.
    pub fn shape_derivatives(pcoords: [f64; 2]) -> ([f64; 4], [f64; 4]) {
        let [r, s] = pcoords;
        let rm = 1.0 - r;
        let sm = 1.0 - s;
        ([-sm, sm, s, -s], [-rm, -r, r, rm])
    }

    /// Forward map: world position of the parametric coordinate `(r, s)`.
    pub fn evaluate_location(&self, pcoords: [f64; 2]) -> [f64; 3] {
        let weights = Self::shape_functions(pcoords);
        let mut x = [0.0; 3];
        for (w, pt) in weights.iter().zip(self.points.iter()) {
            x[0] += w * pt[0];
            x[1] += w * pt[1];
            x[2] += w * pt[2];
        }
        x
    }

    /// Inverse map: find the `(r, s)` whose forward map best matches `x` and
    /// classify the query against the cell footprint.
    ///
    /// The query is projected onto the plane of the first three corners, then
    /// Newton iteration from `(0.5, 0.5)` solves the in-plane 2x2 system built
    /// from the two world axes least aligned with the normal (the projection
    /// makes the 3-to-2 reduction over-determined; dropping the dominant
    /// normal axis keeps the best-conditioned pair of equations). Convergence
    /// requires both coordinate deltas below `1e-3` within 10 iterations.
    ///
    /// An exactly singular Jacobian or a failure to converge yields
    /// [`PositionResult::Degenerate`]. Otherwise the point is classified
    /// `Inside` (closest point is the plane projection) or `Outside` (closest
    /// point is the nearest corner or edge, by the sign pattern of the
    /// out-of-range coordinates).
    pub fn evaluate_position(&self, x: [f64; 3]) -> PositionResult {
        let n = plane::normal(self.points[0], self.points[1], self.points[2]);
        let projected = plane::project_point(x, self.points[0], n);
        let axes = in_plane_axes(n);

        let mut params = [0.5, 0.5];
        let mut pcoords = [0.5, 0.5];
        let mut converged = false;
        for _ in 0..MAX_ITERATION {
            let weights = Self::shape_functions(pcoords);
            let (dr, ds) = Self::shape_derivatives(pcoords);

            let mut fcol = [0.0; 2];
            let mut rcol = [0.0; 2];
            let mut scol = [0.0; 2];
            for i in 0..4 {
                let pt = self.points[i];
                for j in 0..2 {
                    fcol[j] += pt[axes[j]] * weights[i];
                    rcol[j] += pt[axes[j]] * dr[i];
                    scol[j] += pt[axes[j]] * ds[i];
                }
            }
            for j in 0..2 {
                fcol[j] -= projected[axes[j]];
            }

            let det = vector::det2(rcol, scol);
            if det == 0.0 {
                log::warn!("singular Jacobian while inverting quad mapping");
                return PositionResult::Degenerate;
            }
            pcoords[0] = params[0] - vector::det2(fcol, scol) / det;
            pcoords[1] = params[1] - vector::det2(rcol, fcol) / det;

            if (pcoords[0] - params[0]).abs() < CONVERGED
                && (pcoords[1] - params[1]).abs() < CONVERGED
            {
                converged = true;
                break;
            }
            params = pcoords;
        }
        if !converged {
            log::debug!("quad position evaluation did not converge in {MAX_ITERATION} iterations");
            return PositionResult::Degenerate;
        }

        let weights = Self::shape_functions(pcoords);
        let [r, s] = pcoords;
        if (0.0..=1.0).contains(&r) && (0.0..=1.0).contains(&s) {
            return PositionResult::Inside(PositionInfo {
                pcoords,
                closest_point: projected,
                dist2: vector::distance2(projected, x),
                weights,
            });
        }

        let [p0, p1, p2, p3] = self.points;
        let (dist2, closest_point) = if r < 0.0 && s < 0.0 {
            (vector::distance2(x, p0), p0)
        } else if r > 1.0 && s < 0.0 {
            (vector::distance2(x, p1), p1)
        } else if r > 1.0 && s > 1.0 {
            (vector::distance2(x, p2), p2)
        } else if r < 0.0 && s > 1.0 {
            (vector::distance2(x, p3), p3)
        } else if r < 0.0 {
            let (d2, _, closest) = segment::distance2_to_segment(x, p0, p3);
            (d2, closest)
        } else if r > 1.0 {
            let (d2, _, closest) = segment::distance2_to_segment(x, p1, p2);
            (d2, closest)
        } else if s < 0.0 {
            let (d2, _, closest) = segment::distance2_to_segment(x, p0, p1);
            (d2, closest)
        } else {
            let (d2, _, closest) = segment::distance2_to_segment(x, p2, p3);
            (d2, closest)
        };
        PositionResult::Outside(PositionInfo {
            pcoords,
            closest_point,
            dist2,
            weights,
        })
    }

    /// Nearest cell edge to a parametric coordinate.
    ///
    /// The lines `r = s` and `r + s = 1` divide parametric space into four
    /// wedges, one per edge; the sign pattern of `r - s` and `1 - r - s`
    /// selects the wedge.
    pub fn cell_boundary(&self, pcoords: [f64; 2]) -> BoundaryEdge {
        let [r, s] = pcoords;
        let t1 = r - s;
        let t2 = 1.0 - r - s;
        let ids = &self.point_ids;
        let point_ids = if t1 >= 0.0 && t2 >= 0.0 {
            [ids[0], ids[1]]
        } else if t1 >= 0.0 && t2 < 0.0 {
            [ids[1], ids[2]]
        } else if t1 < 0.0 && t2 < 0.0 {
            [ids[2], ids[3]]
        } else {
            [ids[3], ids[0]]
        };
        let on_cell = (0.0..=1.0).contains(&r) && (0.0..=1.0).contains(&s);
        BoundaryEdge { point_ids, on_cell }
    }

    /// Extract the isocontour of a per-corner scalar field at `value`.
    ///
    /// Bit `i` of the case index is set when `cell_scalars[i] >= value`; the
    /// static case table maps the index to crossed edges, paired two per
    /// output line. Each crossing point is interpolated linearly along its
    /// edge and pushed into `sink` together with `value` as its scalar.
    /// Indices 0 and 15 (no corner / every corner at or above the isovalue)
    /// emit nothing.
    ///
    /// Every edge the table selects has one endpoint at or above the isovalue
    /// and one below, so the interpolation denominator is structurally nonzero
    /// for finite scalars; a non-finite or zero denominator falls back to the
    /// edge midpoint instead of propagating NaN.
    pub fn contour(&self, value: f64, cell_scalars: &[f64; 4], sink: &mut impl ContourSink) {
        let mut index = 0usize;
        for (i, scalar) in cell_scalars.iter().enumerate() {
            if *scalar >= value {
                index |= 1 << i;
            }
        }

        for pair in LINE_CASES[index].chunks_exact(2) {
            let mut endpoints = [0usize; 2];
            for (slot, &edge) in endpoints.iter_mut().zip(pair) {
                let (a, b) = QUAD_EDGES[edge];
                let den = cell_scalars[b] - cell_scalars[a];
                let t = if den != 0.0 && den.is_finite() {
                    (value - cell_scalars[a]) / den
                } else {
                    0.5
                };
                let (xa, xb) = (self.points[a], self.points[b]);
                let x = [
                    xa[0] + t * (xb[0] - xa[0]),
                    xa[1] + t * (xb[1] - xa[1]),
                    xa[2] + t * (xb[2] - xa[2]),
                ];
                *slot = sink.push_point(x);
                sink.push_scalar(value);
            }
            sink.push_line(endpoints);
        }
    }

    /// Edge `edge_id` of the cell as a 2-point segment.
    ///
    /// Edges are `(0,1), (1,2), (2,3), (3,0)` in counter-clockwise order.
    pub fn edge(&self, edge_id: usize) -> Result<QuadEdge, QuadCellError> {
        if edge_id >= QUAD_EDGES.len() {
            return Err(QuadCellError::EdgeIndexOutOfRange(edge_id));
        }
        let (a, b) = QUAD_EDGES[edge_id];
        Ok(QuadEdge {
            points: [self.points[a], self.points[b]],
            point_ids: [self.point_ids[a], self.point_ids[b]],
        })
    }

    /// Test whether a line crosses the cell within its footprint.
    ///
    /// The infinite line through `p1` and `p2` is intersected with the plane
    /// of the first three corners; `None` when the line is parallel to that
    /// plane. A hit additionally requires the intersection point to evaluate
    /// [`PositionResult::Inside`] with a squared projection distance within
    /// `tol * tol`.
    pub fn intersect_with_line(
        &self,
        p1: [f64; 3],
        p2: [f64; 3],
        tol: f64,
    ) -> Option<LineIntersection> {
        let n = plane::normal(self.points[0], self.points[1], self.points[2]);
        let (t, x) = plane::line_intersection(p1, p2, n, self.points[0])?;
        match self.evaluate_position(x) {
            PositionResult::Inside(info) if info.dist2 <= tol * tol => Some(LineIntersection {
                t,
                point: x,
                pcoords: info.pcoords,
            }),
            _ => None,
        }
    }

    /// Split the cell into two triangles along its shorter diagonal.
    ///
    /// The shorter diagonal yields the more equilateral pair, approximating a
    /// Delaunay-preferred split without a full Delaunay check.
    pub fn triangulate(&self) -> [Triangle; 2] {
        let d1 = vector::distance2(self.points[0], self.points[2]);
        let d2 = vector::distance2(self.points[1], self.points[3]);
        let corner_sets: [[usize; 3]; 2] = if d1 < d2 {
            [[0, 1, 2], [0, 2, 3]]
        } else {
            [[0, 1, 3], [1, 2, 3]]
        };
        corner_sets.map(|corners| Triangle {
            points: corners.map(|c| self.points[c]),
            point_ids: corners.map(|c| self.point_ids[c]),
        })
    }

    /// Unit normal of the plane through the first three corners.
    ///
    /// Collinear corners are an error; use this when degeneracy must be
    /// surfaced rather than silently propagated into a solve.
    pub fn normal(&self) -> Result<[f64; 3], QuadCellError> {
        let n = vector::cross(
            vector::sub(self.points[1], self.points[0]),
            vector::sub(self.points[2], self.points[0]),
        );
        let len = vector::norm(n);
        if len <= EPS {
            return Err(QuadCellError::InvalidGeometry("degenerate normal".into()));
        }
        Ok([n[0] / len, n[1] / len, n[2] / len])
    }

    /// Area of the cell, as the sum of its two triangle halves across the
    /// `p0`-`p2` diagonal. Exact for planar cells, an approximation for
    /// warped ones.
    pub fn area(&self) -> f64 {
        let [p0, p1, p2, p3] = self.points;
        0.5 * vector::norm(vector::cross(vector::sub(p1, p0), vector::sub(p2, p0)))
            + 0.5 * vector::norm(vector::cross(vector::sub(p2, p0), vector::sub(p3, p0)))
    }
}

/// The two world axes least aligned with `n`: all of `{0, 1, 2}` except the
/// component of `n` with the largest magnitude (ties keep the first).
fn in_plane_axes(n: [f64; 3]) -> [usize; 2] {
    let mut dominant = 0;
    let mut max_component = 0.0;
    for (i, c) in n.iter().enumerate() {
        if c.abs() > max_component {
            max_component = c.abs();
            dominant = i;
        }
    }
    match dominant {
        0 => [1, 2],
        1 => [0, 2],
        _ => [0, 1],
    }
}

/// Cell edges as corner-index pairs, counter-clockwise.
const QUAD_EDGES: [(usize, usize); 4] = [(0, 1), (1, 2), (2, 3), (3, 0)];

/// Marching-quadrilateral case table: for each 4-bit corner classification,
/// the crossed edges in `QUAD_EDGES` indexing, consumed pairwise as line
/// endpoints. Cases 5 and 10 are the ambiguous saddles and emit two lines.
const LINE_CASES: [&[usize]; 16] = [
    &[],
    &[0, 3],
    &[1, 0],
    &[1, 3],
    &[2, 1],
    &[0, 3, 2, 1],
    &[2, 0],
    &[2, 3],
    &[3, 2],
    &[0, 2],
    &[1, 0, 3, 2],
    &[1, 2],
    &[3, 1],
    &[0, 1],
    &[3, 0],
    &[],
];
