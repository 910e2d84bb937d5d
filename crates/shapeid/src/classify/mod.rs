//! Shape decision tree.
//!
//! Keyed on the number of distinct vertices:
//! - 0 → not a valid shape, 1 → point, 2 (or all collinear) → straight line.
//! - 3 → triangle subtype from angles.
//! - 4 → quadrilateral subtype from angles, side lengths and parallel sides.
//! - 5 / 6 → pentagon / hexagon only when regular, otherwise not valid.
//! - 7+ → "circle".
//!
//! Self-intersecting quadrilaterals, pentagons and hexagons are not valid.

mod cfg;

use std::fmt;

use crate::geom::{are_similar, direction_deg, direction_gap, Vec2};
use crate::outline::Outline;

pub use cfg::ClassifyCfg;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriangleKind {
    Equilateral,
    RightIsosceles,
    Right,
    Isosceles,
    Scalene,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuadKind {
    Square,
    Rectangle,
    Rhombus,
    Parallelogram,
    Trapezium,
    Kite,
    Irregular,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Invalid,
    Point,
    Line,
    Triangle(TriangleKind),
    Quadrilateral(QuadKind),
    Pentagon,
    Hexagon,
    Circle,
}

impl Shape {
    #[inline]
    pub fn is_valid(&self) -> bool {
        !matches!(self, Shape::Invalid)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Shape::Invalid => "Not a valid Shape",
            Shape::Point => "Point",
            Shape::Line => "Straight Line",
            Shape::Triangle(TriangleKind::Equilateral) => "Equilateral Triangle",
            Shape::Triangle(TriangleKind::RightIsosceles) => "Right Isosceles Triangle",
            Shape::Triangle(TriangleKind::Right) => "Right Triangle",
            Shape::Triangle(TriangleKind::Isosceles) => "Isosceles Triangle",
            Shape::Triangle(TriangleKind::Scalene) => "Triangle",
            Shape::Quadrilateral(QuadKind::Square) => "Square",
            Shape::Quadrilateral(QuadKind::Rectangle) => "Rectangle",
            Shape::Quadrilateral(QuadKind::Rhombus) => "Rhombus",
            Shape::Quadrilateral(QuadKind::Parallelogram) => "Parallelogram",
            Shape::Quadrilateral(QuadKind::Trapezium) => "Trapezium",
            Shape::Quadrilateral(QuadKind::Kite) => "Kite",
            Shape::Quadrilateral(QuadKind::Irregular) => "Quadrilateral",
            Shape::Pentagon => "Pentagon",
            Shape::Hexagon => "Hexagon",
            Shape::Circle => "circle",
        };
        f.write_str(s)
    }
}

/// Normalize raw clicks, then classify.
pub fn detect_shape_points(points: &[Vec2], cfg: &ClassifyCfg) -> Shape {
    detect_shape(&Outline::from_points(points, cfg), cfg)
}

/// Run the decision tree on a normalized outline.
pub fn detect_shape(outline: &Outline, cfg: &ClassifyCfg) -> Shape {
    let n = outline.len();
    let shape = match n {
        0 => Shape::Invalid,
        1 => Shape::Point,
        2 => Shape::Line,
        _ if outline.is_collinear(cfg.eps) => Shape::Line,
        3 => Shape::Triangle(identify_triangle(outline, cfg)),
        4..=6 if !outline.is_simple(cfg.eps) => Shape::Invalid,
        4 => Shape::Quadrilateral(identify_quadrilateral(outline, cfg)),
        5 if is_regular_pentagon(outline, cfg) => Shape::Pentagon,
        6 if is_regular_hexagon(outline, cfg) => Shape::Hexagon,
        5 | 6 => Shape::Invalid,
        _ => Shape::Circle,
    };
    tracing::debug!(vertices = n, shape = %shape, "detect_shape");
    shape
}

/// Triangle subtype from its three interior angles.
///
/// Pre: `outline` has exactly three non-collinear vertices.
pub fn identify_triangle(outline: &Outline, cfg: &ClassifyCfg) -> TriangleKind {
    let a = outline.get_interior_angles();
    debug_assert_eq!(a.len(), 3, "identify_triangle needs three vertices");
    if a.len() != 3 {
        return TriangleKind::Scalene;
    }
    let tol = cfg.angle_tol;
    if are_similar(a[0], a[1], tol) && are_similar(a[0], a[2], tol) {
        return TriangleKind::Equilateral;
    }
    if let Some(k) = (0..3).find(|&k| are_similar(a[k], 90.0, tol)) {
        let (p, q) = (a[(k + 1) % 3], a[(k + 2) % 3]);
        return if are_similar(p, q, tol) {
            TriangleKind::RightIsosceles
        } else {
            TriangleKind::Right
        };
    }
    if (0..3).any(|k| are_similar(a[k], a[(k + 1) % 3], tol)) {
        TriangleKind::Isosceles
    } else {
        TriangleKind::Scalene
    }
}

/// Quadrilateral subtype from angles, side lengths and parallel sides.
///
/// Pre: `outline` is a simple polygon with four vertices.
pub fn identify_quadrilateral(outline: &Outline, cfg: &ClassifyCfg) -> QuadKind {
    let angles = outline.get_interior_angles();
    let lens = outline.edge_lengths();
    debug_assert_eq!(angles.len(), 4, "identify_quadrilateral needs four vertices");
    if angles.len() != 4 || lens.len() != 4 {
        return QuadKind::Irregular;
    }
    let tol = cfg.angle_tol;
    let sides = SideLengths::new(&lens, cfg.length_tol);
    let all_right = angles.iter().all(|&a| are_similar(a, 90.0, tol));
    let all_equal = sides.all_equal();
    if all_right {
        return if all_equal {
            QuadKind::Square
        } else {
            QuadKind::Rectangle
        };
    }
    if all_equal {
        return QuadKind::Rhombus;
    }
    let dirs: Vec<f64> = outline.edges().map(|(a, b)| direction_deg(a, b)).collect();
    let parallel = |i: usize, j: usize| direction_gap(dirs[i], dirs[j]) < tol;
    match (parallel(0, 2), parallel(1, 3)) {
        (true, true) => return QuadKind::Parallelogram,
        (true, false) | (false, true) => return QuadKind::Trapezium,
        (false, false) => {}
    }
    let kite = (sides.eq(0, 1) && sides.eq(2, 3)) || (sides.eq(1, 2) && sides.eq(3, 0));
    if kite {
        QuadKind::Kite
    } else {
        QuadKind::Irregular
    }
}

pub fn is_regular_pentagon(outline: &Outline, cfg: &ClassifyCfg) -> bool {
    is_regular_polygon(outline, 5, cfg)
}

pub fn is_regular_hexagon(outline: &Outline, cfg: &ClassifyCfg) -> bool {
    is_regular_polygon(outline, 6, cfg)
}

/// `n` vertices, every angle near `(n-2)·180/n`, every edge near the mean length.
pub fn is_regular_polygon(outline: &Outline, n: usize, cfg: &ClassifyCfg) -> bool {
    if n < 3 || outline.len() != n {
        return false;
    }
    let target = (n as f64 - 2.0) * 180.0 / n as f64;
    let angles_ok = outline
        .get_interior_angles()
        .iter()
        .all(|&a| are_similar(a, target, cfg.angle_tol));
    angles_ok && SideLengths::new(&outline.edge_lengths(), cfg.length_tol).all_equal()
}

/// Edge lengths compared against a tolerance relative to their mean.
struct SideLengths<'a> {
    lens: &'a [f64],
    mean: f64,
    slack: f64,
}

impl<'a> SideLengths<'a> {
    fn new(lens: &'a [f64], rel_tol: f64) -> Self {
        let mean = if lens.is_empty() {
            0.0
        } else {
            lens.iter().sum::<f64>() / lens.len() as f64
        };
        Self {
            lens,
            mean,
            slack: rel_tol * mean,
        }
    }

    #[inline]
    fn eq(&self, i: usize, j: usize) -> bool {
        (self.lens[i] - self.lens[j]).abs() <= self.slack
    }

    fn all_equal(&self) -> bool {
        self.lens.iter().all(|&l| (l - self.mean).abs() <= self.slack)
    }
}
