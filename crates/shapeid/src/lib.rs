//! Polygon shape identification.
//!
//! Takes the points of a (possibly closed) outline, normalizes them into
//! distinct vertices, and names the shape from its interior angles and edge
//! lengths: point, straight line, triangle, quadrilateral, regular pentagon,
//! regular hexagon, or "circle" for anything with more vertices.
//!
//! Layout
//! - `geom`: planar primitives (angles, cross products, segment tests).
//! - `outline`: click list → normalized vertex ring with measurements.
//! - `classify`: the decision tree and its tolerances (`ClassifyCfg`).
//! - `parse`: textual point lists.
//! - `rand`: reproducible jittered n-gons for tests and demos.

pub mod classify;
pub mod geom;
pub mod outline;
pub mod parse;
pub mod rand;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use classify::{detect_shape, detect_shape_points, ClassifyCfg, QuadKind, Shape, TriangleKind};
pub use geom::Vec2;
pub use outline::Outline;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::classify::{
        detect_shape, detect_shape_points, identify_quadrilateral, identify_triangle,
        is_regular_hexagon, is_regular_pentagon, ClassifyCfg, QuadKind, Shape, TriangleKind,
    };
    pub use crate::geom::{compute_angle, Vec2};
    pub use crate::outline::Outline;
    pub use crate::parse::{parse_points, ParseError};
    pub use crate::rand::{draw_polygon, ReplayToken, SampleCfg};
}
