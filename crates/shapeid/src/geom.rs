//! Planar primitives shared by outline measurement and classification.
//!
//! All angles are in degrees; the classifier's tolerances are stated in
//! degrees as well.

use nalgebra::Vector2;

/// 2D point/vector.
pub type Vec2 = Vector2<f64>;

/// Unsigned angle at `mid` between the rays `mid→left` and `mid→right`, in [0, 180].
///
/// Returns 0 if either ray is degenerate.
pub fn compute_angle(mid: Vec2, left: Vec2, right: Vec2) -> f64 {
    let a = left - mid;
    let b = right - mid;
    let na = a.norm();
    let nb = b.norm();
    if !(na > 0.0 && nb > 0.0) {
        return 0.0;
    }
    // atan2 of (|a×b|, a·b) stays accurate near 0° and 180°, unlike acos.
    let det = a.x * b.y - a.y * b.x;
    det.abs().atan2(a.dot(&b)).to_degrees()
}

/// z-component of `(b - a) × (c - a)`; positive when `a, b, c` turn left.
#[inline]
pub fn cross(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// Shoelace area. Positive for counter-clockwise order.
pub fn signed_area(points: &[Vec2]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        acc += p.x * q.y - q.x * p.y;
    }
    0.5 * acc
}

/// Closed segment intersection `[p1,p2] ∩ [q1,q2] ≠ ∅`, collinear overlap included.
///
/// `eps` is compared against cross products, so it carries squared length
/// units; callers scale it to their geometry.
pub fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2, eps: f64) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);
    if ((d1 > eps && d2 < -eps) || (d1 < -eps && d2 > eps))
        && ((d3 > eps && d4 < -eps) || (d3 < -eps && d4 > eps))
    {
        return true;
    }
    (d1.abs() <= eps && on_segment(q1, q2, p1, eps))
        || (d2.abs() <= eps && on_segment(q1, q2, p2, eps))
        || (d3.abs() <= eps && on_segment(p1, p2, q1, eps))
        || (d4.abs() <= eps && on_segment(p1, p2, q2, eps))
}

/// `r` projects into `[a, b]` (collinearity checked by caller).
///
/// Dot products keep `eps` in the same squared units as the cross products.
#[inline]
fn on_segment(a: Vec2, b: Vec2, r: Vec2, eps: f64) -> bool {
    (r - a).dot(&(b - a)) >= -eps && (r - b).dot(&(a - b)) >= -eps
}

/// `|a - b| < tol`.
#[inline]
pub fn are_similar(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

/// Undirected direction of the segment `a→b` in degrees, in [0, 180).
pub fn direction_deg(a: Vec2, b: Vec2) -> f64 {
    let d = b - a;
    let th = d.y.atan2(d.x).to_degrees();
    let th = th.rem_euclid(180.0);
    if th >= 180.0 {
        0.0
    } else {
        th
    }
}

/// Distance between two undirected directions (degrees, mod 180), in [0, 90].
#[inline]
pub fn direction_gap(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(180.0);
    d.min(180.0 - d)
}
