//! Classification tolerances.
//!
//! Defaults follow the click-to-draw setting: a 5° window for angle
//! comparisons and a 10% window (relative to the mean edge) for lengths.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyCfg {
    /// Two angles are similar when they differ by less than this (degrees).
    pub angle_tol: f64,
    /// Two edges are similar when they differ by at most this fraction of the mean edge.
    pub length_tol: f64,
    /// Consecutive clicks closer than this collapse into one vertex.
    pub snap_dist: f64,
    /// Numeric slack for collinearity and segment tests.
    pub eps: f64,
}

impl Default for ClassifyCfg {
    fn default() -> Self {
        Self {
            angle_tol: 5.0,
            length_tol: 0.1,
            snap_dist: 1e-6,
            eps: 1e-9,
        }
    }
}

impl ClassifyCfg {
    /// Reject tolerances that would make every comparison pass or fail.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.angle_tol.is_finite() && self.angle_tol > 0.0 && self.angle_tol < 90.0) {
            return Err(format!("angle_tol must be in (0, 90), got {}", self.angle_tol));
        }
        if !(self.length_tol.is_finite() && self.length_tol >= 0.0 && self.length_tol < 1.0) {
            return Err(format!("length_tol must be in [0, 1), got {}", self.length_tol));
        }
        if !(self.snap_dist.is_finite() && self.snap_dist >= 0.0) {
            return Err(format!("snap_dist must be finite and >= 0, got {}", self.snap_dist));
        }
        if !(self.eps.is_finite() && self.eps >= 0.0) {
            return Err(format!("eps must be finite and >= 0, got {}", self.eps));
        }
        Ok(())
    }
}
