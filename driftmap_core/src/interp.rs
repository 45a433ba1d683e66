//! Scattered-data linear interpolation.
//!
//! Interpolates irregularly placed point observations onto arbitrary query
//! locations, the way the density engine needs it:
//! - a Delaunay triangulation (Bowyer-Watson) of the distinct sample points
//! - barycentric evaluation inside the triangle containing the query
//! - `None` outside the convex hull, so callers can apply their fill policy
//!
//! Degenerate configurations (fewer than 3 distinct points, or all points
//! collinear) produce no interpolator at all rather than panicking -
//! interpolation is best-effort and the caller falls back to the fill value.

use geo::{Area, ConvexHull, MultiPoint, Point};
use std::collections::{HashMap, HashSet};

/// Barycentric containment slack, in barycentric units.
///
/// Grid nodes landing exactly on a shared triangle edge must belong to one
/// of the two triangles despite rounding.
const BARY_EPS: f64 = 1e-9;

/// Relative area below which a point set is treated as collinear.
const DEGENERATE_AREA: f64 = 1e-12;

/// Piecewise-linear interpolant over a triangulated scattered point set.
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    /// Distinct sample points (exact duplicates collapsed)
    verts: Vec<[f64; 2]>,

    /// Observation value at each vertex
    values: Vec<f64>,

    /// Triangle vertex indices, counter-clockwise
    triangles: Vec<[usize; 3]>,
}

impl LinearInterpolator {
    /// Builds an interpolant from points and their observed values.
    ///
    /// Exact coordinate duplicates are collapsed to the first occurrence.
    /// Returns `None` when the distinct points cannot span a triangle
    /// (fewer than 3, or collinear within rounding).
    pub fn fit(points: &[[f64; 2]], values: &[f64]) -> Option<Self> {
        debug_assert_eq!(points.len(), values.len());

        let (verts, vals) = dedupe(points, values);
        if verts.len() < 3 || is_degenerate(&verts) {
            return None;
        }

        let triangles = triangulate(&verts);
        if triangles.is_empty() {
            return None;
        }

        Some(Self {
            verts,
            values: vals,
            triangles,
        })
    }

    /// Evaluates the interpolant at a query location.
    ///
    /// Returns `None` outside the convex hull of the fitted points.
    pub fn eval(&self, x: f64, y: f64) -> Option<f64> {
        for tri in &self.triangles {
            let [i, j, k] = *tri;
            let a = self.verts[i];
            let b = self.verts[j];
            let c = self.verts[k];

            let det = (b[1] - c[1]) * (a[0] - c[0]) + (c[0] - b[0]) * (a[1] - c[1]);
            if det.abs() < f64::MIN_POSITIVE {
                continue; // sliver triangle, no usable barycentrics
            }

            let l1 = ((b[1] - c[1]) * (x - c[0]) + (c[0] - b[0]) * (y - c[1])) / det;
            let l2 = ((c[1] - a[1]) * (x - c[0]) + (a[0] - c[0]) * (y - c[1])) / det;
            let l3 = 1.0 - l1 - l2;

            if l1 >= -BARY_EPS && l2 >= -BARY_EPS && l3 >= -BARY_EPS {
                return Some(l1 * self.values[i] + l2 * self.values[j] + l3 * self.values[k]);
            }
        }

        None
    }

    /// Number of distinct vertices in the triangulation.
    pub fn vertex_count(&self) -> usize {
        self.verts.len()
    }

    /// Number of triangles in the triangulation.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

/// Collapses exact coordinate duplicates, keeping the first value seen.
fn dedupe(points: &[[f64; 2]], values: &[f64]) -> (Vec<[f64; 2]>, Vec<f64>) {
    let mut seen: HashSet<(u64, u64)> = HashSet::with_capacity(points.len());
    let mut verts = Vec::with_capacity(points.len());
    let mut vals = Vec::with_capacity(points.len());

    for (p, &v) in points.iter().zip(values) {
        if seen.insert((p[0].to_bits(), p[1].to_bits())) {
            verts.push(*p);
            vals.push(v);
        }
    }

    (verts, vals)
}

/// Collinearity check via the convex hull area.
///
/// A point set whose hull encloses (relatively) no area cannot support a
/// 2-D triangulation.
fn is_degenerate(verts: &[[f64; 2]]) -> bool {
    let span = bbox_span(verts);
    if span == 0.0 {
        return true;
    }

    let multi = MultiPoint::from(
        verts
            .iter()
            .map(|p| Point::new(p[0], p[1]))
            .collect::<Vec<_>>(),
    );
    let hull = multi.convex_hull();

    hull.unsigned_area() < span * span * DEGENERATE_AREA
}

/// Largest bounding-box extent of the point set.
fn bbox_span(verts: &[[f64; 2]]) -> f64 {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for p in verts {
        min_x = min_x.min(p[0]);
        max_x = max_x.max(p[0]);
        min_y = min_y.min(p[1]);
        max_y = max_y.max(p[1]);
    }

    (max_x - min_x).max(max_y - min_y)
}

/// Bowyer-Watson incremental Delaunay triangulation.
///
/// Returns counter-clockwise triangles indexing into `pts`. Assumes the
/// input is already deduplicated and non-degenerate.
fn triangulate(pts: &[[f64; 2]]) -> Vec<[usize; 3]> {
    let n = pts.len();
    let span = bbox_span(pts).max(1.0);

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in pts {
        min_x = min_x.min(p[0]);
        max_x = max_x.max(p[0]);
        min_y = min_y.min(p[1]);
        max_y = max_y.max(p[1]);
    }
    let cx = (min_x + max_x) / 2.0;
    let cy = (min_y + max_y) / 2.0;

    // Super-triangle far outside the data so the cavity boundary at hull
    // vertices stays star-shaped
    let m = span * 64.0;
    let mut verts: Vec<[f64; 2]> = pts.to_vec();
    verts.push([cx - 2.0 * m, cy - m]);
    verts.push([cx + 2.0 * m, cy - m]);
    verts.push([cx, cy + 2.0 * m]);

    let mut triangles: Vec<[usize; 3]> = vec![oriented(&verts, [n, n + 1, n + 2])];

    for p in 0..n {
        let point = verts[p];

        // Step 1: triangles whose circumcircle contains the new point
        let mut bad: Vec<usize> = Vec::new();
        for (ti, tri) in triangles.iter().enumerate() {
            if in_circumcircle(&verts, *tri, point) {
                bad.push(ti);
            }
        }

        // Step 2: boundary of the cavity = edges used by exactly one bad triangle
        let mut edges: HashMap<(usize, usize), (u32, (usize, usize))> = HashMap::new();
        for &ti in &bad {
            let t = triangles[ti];
            for edge in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                let key = (edge.0.min(edge.1), edge.0.max(edge.1));
                let entry = edges.entry(key).or_insert((0, edge));
                entry.0 += 1;
            }
        }

        // Step 3: carve the cavity and re-triangulate it around the new point
        for &ti in bad.iter().rev() {
            triangles.swap_remove(ti);
        }
        for (count, edge) in edges.into_values() {
            if count == 1 {
                triangles.push(oriented(&verts, [edge.0, edge.1, p]));
            }
        }
    }

    // Drop everything still touching the super-triangle
    triangles.retain(|t| t.iter().all(|&v| v < n));
    triangles
}

/// Reorders a triangle counter-clockwise.
fn oriented(verts: &[[f64; 2]], tri: [usize; 3]) -> [usize; 3] {
    if signed_area(verts[tri[0]], verts[tri[1]], verts[tri[2]]) < 0.0 {
        [tri[0], tri[2], tri[1]]
    } else {
        tri
    }
}

/// Twice the signed area of the triangle (a, b, c); positive when CCW.
fn signed_area(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])
}

/// Strict circumcircle containment test for a CCW triangle.
fn in_circumcircle(verts: &[[f64; 2]], tri: [usize; 3], p: [f64; 2]) -> bool {
    let a = verts[tri[0]];
    let b = verts[tri[1]];
    let c = verts[tri[2]];

    let adx = a[0] - p[0];
    let ady = a[1] - p[1];
    let bdx = b[0] - p[0];
    let bdy = b[1] - p[1];
    let cdx = c[0] - p[0];
    let cdy = c[1] - p[1];

    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;

    let det = adx * (bdy * cd - bd * cdy) - ady * (bdx * cd - bd * cdx)
        + ad * (bdx * cdy - bdy * cdx);

    det > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scatter() -> Vec<[f64; 2]> {
        vec![
            [0.0, 0.0],
            [4.0, 0.0],
            [4.0, 4.0],
            [0.0, 4.0],
            [1.0, 2.0],
            [3.0, 1.0],
            [2.5, 3.2],
        ]
    }

    #[test]
    fn test_fit_rejects_too_few_points() {
        assert!(LinearInterpolator::fit(&[[0.0, 0.0], [1.0, 1.0]], &[1.0, 1.0]).is_none());
    }

    #[test]
    fn test_fit_rejects_collinear_points() {
        let pts = vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let vals = vec![1.0; 4];
        assert!(LinearInterpolator::fit(&pts, &vals).is_none());
    }

    #[test]
    fn test_fit_rejects_duplicates_of_two_points() {
        // Three inputs, but only two distinct coordinates
        let pts = vec![[0.0, 0.0], [1.0, 3.0], [0.0, 0.0]];
        let vals = vec![1.0; 3];
        assert!(LinearInterpolator::fit(&pts, &vals).is_none());
    }

    #[test]
    fn test_triangulation_covers_point_set() {
        let pts = scatter();
        let vals = vec![1.0; pts.len()];
        let interp = LinearInterpolator::fit(&pts, &vals).unwrap();

        assert_eq!(interp.vertex_count(), pts.len());
        // Euler: a triangulation of n points with h hull points has
        // 2n - h - 2 triangles; here n=7, h=4
        assert_eq!(interp.triangle_count(), 8);
    }

    #[test]
    fn test_reproduces_affine_function_exactly() {
        // Piecewise-linear interpolation is exact for affine data on any
        // triangulation of the points
        let pts = scatter();
        let f = |p: &[f64; 2]| 2.0 + 0.5 * p[0] - 0.25 * p[1];
        let vals: Vec<f64> = pts.iter().map(f).collect();

        let interp = LinearInterpolator::fit(&pts, &vals).unwrap();

        for &(x, y) in &[(1.0, 1.0), (2.0, 2.0), (3.5, 0.5), (0.5, 3.0), (2.0, 0.1)] {
            let got = interp.eval(x, y).unwrap();
            assert_relative_eq!(got, 2.0 + 0.5 * x - 0.25 * y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_vertices_evaluate_to_their_values() {
        let pts = scatter();
        let vals: Vec<f64> = (0..pts.len()).map(|i| i as f64).collect();
        let interp = LinearInterpolator::fit(&pts, &vals).unwrap();

        for (p, &v) in pts.iter().zip(&vals) {
            assert_relative_eq!(interp.eval(p[0], p[1]).unwrap(), v, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_unit_values_interpolate_to_unity_inside_hull() {
        let pts = scatter();
        let vals = vec![1.0; pts.len()];
        let interp = LinearInterpolator::fit(&pts, &vals).unwrap();

        for &(x, y) in &[(2.0, 2.0), (0.1, 0.1), (3.9, 3.9), (1.7, 0.4)] {
            assert_relative_eq!(interp.eval(x, y).unwrap(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_outside_hull_is_none() {
        let pts = scatter();
        let vals = vec![1.0; pts.len()];
        let interp = LinearInterpolator::fit(&pts, &vals).unwrap();

        assert!(interp.eval(-1.0, -1.0).is_none());
        assert!(interp.eval(5.0, 2.0).is_none());
        assert!(interp.eval(2.0, 4.7).is_none());
    }

    #[test]
    fn test_duplicates_collapse_but_interpolation_survives() {
        let pts = vec![[0.0, 0.0], [0.0, 0.0], [4.0, 0.0], [0.0, 4.0], [4.0, 0.0]];
        let vals = vec![1.0; 5];
        let interp = LinearInterpolator::fit(&pts, &vals).unwrap();

        assert_eq!(interp.vertex_count(), 3);
        assert_relative_eq!(interp.eval(1.0, 1.0).unwrap(), 1.0, epsilon = 1e-9);
    }
}
