//! Spherical polygons as 2D ecliptic-plane projections.
//!
//! A sky polygon stores the `(nX, nY)` projections of its vertices; the
//! implicit `nZ` is fixed by the boundary's hemisphere tag. The containment
//! test is a horizontal-ray crossing count evaluated both to the left and to
//! the right of the query point, so edge and vertex points classify as
//! inside regardless of floating-point ambiguity.

use std::cmp::Ordering;

use nalgebra::{Vector2, Vector3};

use crate::cmp::{rel_cmp, rel_eq, EPS_REL};
use crate::error::ScanError;

/// Closed 2D polygon of ecliptic-plane projections; the edge from the last
/// vertex back to the first is implicit.
///
/// Invariants:
/// - at least one vertex; exactly two vertices is rejected (no area),
/// - every vertex satisfies `nX² + nY² <= 1` up to the relative tolerance.
#[derive(Clone, Debug)]
pub struct SkyPolygon {
    verts: Vec<Vector2<f64>>,
}

impl SkyPolygon {
    pub fn new(verts: Vec<Vector2<f64>>) -> Result<Self, ScanError> {
        if verts.is_empty() {
            return Err(ScanError::InvalidPolygon("no vertices"));
        }
        if verts.len() == 2 {
            return Err(ScanError::InvalidPolygon(
                "two vertices do not enclose an area",
            ));
        }
        for v in &verts {
            if rel_cmp(v.norm_squared(), 1.0, EPS_REL) == Ordering::Greater {
                return Err(ScanError::InvalidPolygon(
                    "vertex projection outside the unit disk",
                ));
            }
        }
        Ok(SkyPolygon { verts })
    }

    /// Project a list of ecliptic unit vectors onto the `(nX, nY)` plane.
    pub fn from_ecliptic_points(points: &[Vector3<f64>]) -> Result<Self, ScanError> {
        Self::new(points.iter().map(|p| Vector2::new(p.x, p.y)).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.verts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    #[inline]
    pub fn verts(&self) -> &[Vector2<f64>] {
        &self.verts
    }

    /// Point-in-polygon test.
    ///
    /// Counts intersections of the horizontal ray through `p` with the
    /// polygon edges, separately for intersections right and left of the
    /// point; `p` is inside if either parity is odd. Horizontal edges are
    /// skipped. A 1-vertex polygon matches by relative-ε equality on both
    /// coordinates.
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        let n = self.verts.len();
        if n == 1 {
            let v = self.verts[0];
            return rel_eq(v.x, p.x) && rel_eq(v.y, p.y);
        }
        debug_assert!(n >= 3, "two-vertex polygons are rejected at construction");

        let mut inside_left = 0u32;
        let mut inside_right = 0u32;
        for i in 0..n {
            let v1 = self.verts[i];
            let v2 = self.verts[(i + 1) % n];

            // candidate edges only: the ray at height p.y must cross [v1, v2]
            if p.y < v1.y.min(v2.y) || p.y >= v1.y.max(v2.y) || v1.y == v2.y {
                continue;
            }

            let xinter = v1.x + (p.y - v1.y) * (v2.x - v1.x) / (v2.y - v1.y);
            if xinter > p.x {
                inside_left += 1;
            }
            if xinter < p.x {
                inside_right += 1;
            }
        }
        inside_left % 2 == 1 || inside_right % 2 == 1
    }
}
