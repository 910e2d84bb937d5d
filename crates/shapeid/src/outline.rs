//! Normalized polygon outline (distinct vertices in click order).
//!
//! Clicks arrive either closed (last point repeats the first) or open. After
//! normalization the ring is implicit: vertex `n-1` connects back to vertex 0.
//!
//! Invariants (for outlines built by `from_points`)
//! - No two consecutive vertices (ring-wise) are within `snap_dist`.
//! - No vertex lies on the segment between its two ring neighbours; such
//!   pass-through clicks are not corners and get dropped.
//! - Vertex order is preserved; orientation may be CW or CCW.
//!
//! Tolerances in the topology tests are relative to the outline's span
//! (largest vertex distance), so results do not change under scaling.

use serde::Serialize;

use crate::classify::ClassifyCfg;
use crate::geom::{compute_angle, cross, segments_intersect, signed_area, Vec2};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outline {
    vertices: Vec<Vec2>,
}

impl Outline {
    /// Normalize raw points: drop repeated clicks, closing clicks, then
    /// pass-through vertices.
    pub fn from_points(points: &[Vec2], cfg: &ClassifyCfg) -> Self {
        let snap = cfg.snap_dist.max(0.0);
        let mut vertices: Vec<Vec2> = Vec::with_capacity(points.len());
        for &p in points {
            if let Some(last) = vertices.last() {
                if (p - *last).norm() <= snap {
                    continue;
                }
            }
            vertices.push(p);
        }
        // a sloppy close can leave several clicks around the start
        while vertices.len() >= 2 {
            let last = vertices[vertices.len() - 1];
            if (last - vertices[0]).norm() > snap {
                break;
            }
            vertices.pop();
        }
        drop_pass_through(&mut vertices, cfg.eps);
        Self { vertices }
    }

    /// Wrap already-distinct vertices without normalization.
    pub fn from_vertices(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Ring edges `(v[i], v[i+1 mod n])`. Empty for fewer than two vertices.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        let count = if n < 2 { 0 } else { n };
        (0..count).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    pub fn edge_lengths(&self) -> Vec<f64> {
        self.edges().map(|(a, b)| (b - a).norm()).collect()
    }

    pub fn perimeter(&self) -> f64 {
        self.edge_lengths().iter().sum()
    }

    /// Shoelace area; positive when counter-clockwise.
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.vertices)
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area centroid, or the vertex mean when the outline has no area.
    pub fn centroid(&self) -> Option<Vec2> {
        let n = self.vertices.len();
        if n == 0 {
            return None;
        }
        let a = self.signed_area();
        if a.abs() < 1e-12 {
            let sum = self.vertices.iter().fold(Vec2::zeros(), |acc, p| acc + p);
            return Some(sum / n as f64);
        }
        let mut cx = 0.0;
        let mut cy = 0.0;
        for (p, q) in self.edges() {
            let c = p.x * q.y - q.x * p.y;
            cx += (p.x + q.x) * c;
            cy += (p.y + q.y) * c;
        }
        Some(Vec2::new(cx / (6.0 * a), cy / (6.0 * a)))
    }

    /// Farthest-apart vertex pair `(i, j, distance)`.
    fn farthest_pair(&self) -> (usize, usize, f64) {
        let v = &self.vertices;
        let mut best = (0usize, 0usize, 0.0f64);
        for i in 0..v.len() {
            for j in (i + 1)..v.len() {
                let d = (v[j] - v[i]).norm();
                if d > best.2 {
                    best = (i, j, d);
                }
            }
        }
        best
    }

    /// Largest distance between two vertices (0 for fewer than two).
    pub fn span(&self) -> f64 {
        self.farthest_pair().2
    }

    /// All vertices lie on the line through the two farthest-apart vertices.
    ///
    /// A vertex counts as on the line when its distance to it is at most
    /// `eps · span`.
    pub fn is_collinear(&self, eps: f64) -> bool {
        let v = &self.vertices;
        if v.len() < 3 {
            return true;
        }
        let (i, j, span) = self.farthest_pair();
        if span <= 0.0 {
            return true;
        }
        let (a, b) = (v[i], v[j]);
        // |cross| / span is the distance to the line through a, b
        v.iter().all(|&p| cross(a, b, p).abs() <= eps * span * span)
    }

    /// No two non-adjacent edges meet and no vertex folds back onto its edge.
    ///
    /// `eps` is relative: segment tests run with slack `eps · span²`, the
    /// unit of the cross products they compare.
    pub fn is_simple(&self, eps: f64) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return true;
        }
        let span = self.span();
        let tol = eps * span * span;
        let v = &self.vertices;
        for i in 0..n {
            let prev = v[(i + n - 1) % n];
            let next = v[(i + 1) % n];
            if compute_angle(v[i], prev, next) <= 1e-7 {
                return false;
            }
        }
        for i in 0..n {
            let (p1, p2) = (v[i], v[(i + 1) % n]);
            for j in (i + 2)..n {
                // edge n-1 shares vertex 0 with edge 0
                if i == 0 && j == n - 1 {
                    continue;
                }
                let (q1, q2) = (v[j], v[(j + 1) % n]);
                if segments_intersect(p1, p2, q1, q2, tol) {
                    return false;
                }
            }
        }
        true
    }

    /// Interior angle at every vertex, in degrees.
    ///
    /// Vertex `i` is measured between its ring neighbours `i-1` and `i+1`
    /// (vertex 0 pairs the last vertex with vertex 1). Reflex vertices, those
    /// turning against the ring orientation, report `360 - a`, so a simple
    /// polygon's angles sum to `(n-2)·180`.
    pub fn get_interior_angles(&self) -> Vec<f64> {
        let n = self.vertices.len();
        if n < 3 {
            return Vec::new();
        }
        let v = &self.vertices;
        let orient = self.signed_area().signum();
        (0..n)
            .map(|i| {
                let prev = v[(i + n - 1) % n];
                let next = v[(i + 1) % n];
                let a = compute_angle(v[i], prev, next);
                let turn = cross(prev, v[i], next);
                if orient != 0.0 && turn * orient < 0.0 {
                    360.0 - a
                } else {
                    a
                }
            })
            .collect()
    }

    /// Measurements used by reports.
    pub fn summary(&self) -> OutlineSummary {
        OutlineSummary {
            vertices: self.len(),
            interior_angles: self.get_interior_angles(),
            edge_lengths: self.edge_lengths(),
            area: self.area(),
            perimeter: self.perimeter(),
            centroid: self.centroid().map(|c| [c.x, c.y]),
        }
    }
}

/// Remove vertices sitting on the segment between their ring neighbours.
///
/// Stops at two vertices; a fully collinear click list ends as its two
/// extreme points.
fn drop_pass_through(vertices: &mut Vec<Vec2>, eps: f64) {
    let mut i = 0;
    while vertices.len() >= 3 && i < vertices.len() {
        let n = vertices.len();
        let prev = vertices[(i + n - 1) % n];
        let next = vertices[(i + 1) % n];
        if lies_between(prev, vertices[i], next, eps) {
            vertices.remove(i);
            // removal can straighten the vertex before it
            i = 0;
        } else {
            i += 1;
        }
    }
}

#[inline]
fn lies_between(a: Vec2, p: Vec2, b: Vec2, eps: f64) -> bool {
    let ab = b - a;
    let len2 = ab.norm_squared();
    len2 > 0.0 && cross(a, b, p).abs() <= eps * len2 && (p - a).dot(&(b - p)) > 0.0
}

/// Serializable snapshot of an outline's measurements.
#[derive(Clone, Debug, Serialize)]
pub struct OutlineSummary {
    pub vertices: usize,
    pub interior_angles: Vec<f64>,
    pub edge_lengths: Vec<f64>,
    pub area: f64,
    pub perimeter: f64,
    pub centroid: Option<[f64; 2]>,
}
