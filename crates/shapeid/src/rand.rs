//! Jittered regular polygons with replay tokens.
//!
//! Purpose
//! - Deterministic sample outlines for tests, benches and the CLI `sample`
//!   command. Zero jitter yields an exact regular n-gon.
//!
//! Model
//! - Start from `sides` equally spaced angles on [0, 2π), add bounded angular
//!   and radial jitter, emit vertices in counter-clockwise order.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::Vec2;

/// Sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct SampleCfg {
    pub sides: usize,
    pub radius: f64,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radial jitter (relative amplitude), clamped to [0, 0.99].
    /// Radii = `radius * (1 + u)` with `u∈[-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    pub random_phase: bool,
}

impl Default for SampleCfg {
    fn default() -> Self {
        Self {
            sides: 5,
            radius: 100.0,
            angle_jitter_frac: 0.0,
            radial_jitter: 0.0,
            random_phase: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw the vertices of a jittered regular polygon (CCW, not closed).
pub fn draw_polygon(cfg: SampleCfg, tok: ReplayToken) -> Vec<Vec2> {
    let mut rng = tok.to_std_rng();
    let n = cfg.sides;
    if n == 0 {
        return Vec::new();
    }
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.99);
    let r0 = cfg.radius.abs().max(1e-9);
    let delta = std::f64::consts::TAU / n as f64;
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * std::f64::consts::TAU
    } else {
        0.0
    };
    (0..n)
        .map(|k| {
            let th = phase + k as f64 * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let r = r0 * (1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * rj);
            Vec2::new(th.cos() * r, th.sin() * r)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{detect_shape_points, ClassifyCfg, Shape};
    use crate::geom::signed_area;

    #[test]
    fn reproducible_draw() {
        let cfg = SampleCfg {
            sides: 8,
            angle_jitter_frac: 0.2,
            radial_jitter: 0.1,
            ..SampleCfg::default()
        };
        let tok = ReplayToken { seed: 42, index: 7 };
        assert_eq!(draw_polygon(cfg, tok), draw_polygon(cfg, tok));
        let other = ReplayToken { seed: 42, index: 8 };
        assert_ne!(draw_polygon(cfg, tok), draw_polygon(cfg, other));
    }

    #[test]
    fn unjittered_draws_are_regular() {
        let c = ClassifyCfg::default();
        for index in 0..10 {
            let tok = ReplayToken { seed: 3, index };
            let pent = draw_polygon(SampleCfg::default(), tok);
            assert_eq!(detect_shape_points(&pent, &c), Shape::Pentagon);
            let hex = draw_polygon(
                SampleCfg {
                    sides: 6,
                    ..SampleCfg::default()
                },
                tok,
            );
            assert_eq!(detect_shape_points(&hex, &c), Shape::Hexagon);
        }
    }

    #[test]
    fn draws_are_counter_clockwise() {
        let cfg = SampleCfg {
            sides: 6,
            angle_jitter_frac: 0.4,
            radial_jitter: 0.5,
            ..SampleCfg::default()
        };
        for index in 0..20 {
            let pts = draw_polygon(cfg, ReplayToken { seed: 9, index });
            assert_eq!(pts.len(), 6);
            assert!(signed_area(&pts) > 0.0);
        }
    }
}
