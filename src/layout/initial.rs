//! Initial Layout Estimator
//!
//! Places `u` on the left edge and `v` on the right edge of the unit square,
//! orients `v` and `w` from the corner values of `f`, and puts `w` between
//! them where a bilinear model of `f` says the isopleths balance. The result
//! only has to start the optimizer near a feasible, non-self-intersecting
//! layout.

use enum_dispatch::enum_dispatch;
use glam::{DVec2, dvec2};

use super::{Layout, Sampling};
use crate::config::{NomogramConfig, Verbosity};
use crate::errors::{CheckStage, NomogenError};
use crate::log::{debug, info};
use crate::types::{Domain, ScaleId};

/// `f` at the four corners of the `u`, `v` domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerValues {
    u: Domain,
    v: Domain,
    /// `f(umin, vmin)`
    pub f00: f64,
    /// `f(umax, vmin)`
    pub f10: f64,
    /// `f(umin, vmax)`
    pub f01: f64,
    /// `f(umax, vmax)`
    pub f11: f64,
}

impl CornerValues {
    pub fn sample<F: Fn(f64, f64) -> f64>(f: &F, u: Domain, v: Domain) -> Self {
        CornerValues {
            u,
            v,
            f00: f(u.min(), v.min()),
            f10: f(u.max(), v.min()),
            f01: f(u.min(), v.max()),
            f11: f(u.max(), v.max()),
        }
    }

    /// The corners as `(u, v, w)` triples
    pub fn triples(&self) -> [(f64, f64, f64); 4] {
        [
            (self.u.min(), self.v.min(), self.f00),
            (self.u.max(), self.v.min(), self.f10),
            (self.u.min(), self.v.max(), self.f01),
            (self.u.max(), self.v.max(), self.f11),
        ]
    }

    /// Fail if any corner value falls outside the declared `w` domain
    pub fn check(&self, w: Domain) -> Result<(), NomogenError> {
        for (u, v, value) in self.triples() {
            if !w.admits(value) {
                return Err(NomogenError::RangeViolation {
                    stage: CheckStage::CornerCheck,
                    u,
                    v,
                    w: value,
                    min: w.min(),
                    max: w.max(),
                });
            }
        }
        Ok(())
    }
}

/// Directions in which the `v` and `w` scales run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    /// `w` grows in the same direction as `u` (upwards)
    pub w_aligned_with_u: bool,
    /// `v` runs from the top edge down to the bottom edge
    pub v_flipped: bool,
}

impl Orientation {
    pub fn from_corners(corners: &CornerValues) -> Self {
        let rises_with_u = corners.f10 > corners.f00;
        let rises_with_v = corners.f01 > corners.f00;
        Orientation {
            w_aligned_with_u: rises_with_u,
            v_flipped: rises_with_u ^ rises_with_v,
        }
    }
}

/// Bilinear surface `a + b*s + c*t + d*s*t` through the four corner values.
///
/// `s` is the height of a point on the `u` scale and `t` the height on the
/// `v` scale, both in `[0, 1]` after orientation, so `b` and `c` share a sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BilinearFit {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl BilinearFit {
    pub fn new(corners: &CornerValues, orientation: Orientation) -> Self {
        let (g00, g10, g01, g11) = if orientation.v_flipped {
            (corners.f01, corners.f11, corners.f00, corners.f10)
        } else {
            (corners.f00, corners.f10, corners.f01, corners.f11)
        };
        BilinearFit {
            a: g00,
            b: g10 - g00,
            c: g01 - g00,
            d: g11 - g10 - g01 + g00,
        }
    }

    /// `(df/ds, df/dt)` at `(s, t)`
    pub fn gradient(&self, s: f64, t: f64) -> DVec2 {
        dvec2(self.b + self.d * t, self.c + self.d * s)
    }

    /// Horizontal position at which a `w` point sees the same value along
    /// every isopleth through it, for the gradient at `(s, t)`.
    ///
    /// The lever arms `(p, q) = (1 - x, x)` must be parallel to the gradient
    /// `(gs, gt)`: `p + q = 1` and `gt*p - gs*q = 0`, solved by Cramer's rule.
    /// A singular system falls back to the middle of the square.
    pub fn balance_x(&self, s: f64, t: f64) -> f64 {
        let g = self.gradient(s, t);
        let det = -g.x - g.y;
        if det.abs() <= f64::EPSILON * (g.x.abs() + g.y.abs()) {
            return 0.5;
        }
        let q = -g.y / det;
        q.clamp(0.0, 1.0)
    }
}

/// Strategy for the horizontal course of the `w` scale
#[enum_dispatch]
pub trait WPlacement {
    /// `x` of the `w` scale at progress `p` (0 at the low corner, 1 at the high one)
    fn x_at(&self, fit: &BilinearFit, p: f64) -> f64;
}

/// Straight line between the two end estimates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinearFit;

impl WPlacement for LinearFit {
    fn x_at(&self, fit: &BilinearFit, p: f64) -> f64 {
        let x0 = fit.balance_x(0.0, 0.0);
        let x1 = fit.balance_x(1.0, 1.0);
        x0 + (x1 - x0) * p
    }
}

/// Parabola through the two end estimates and one at the centre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuadraticFit;

impl WPlacement for QuadraticFit {
    fn x_at(&self, fit: &BilinearFit, p: f64) -> f64 {
        let x0 = fit.balance_x(0.0, 0.0);
        let xm = fit.balance_x(0.5, 0.5);
        let x1 = fit.balance_x(1.0, 1.0);
        let l0 = 2.0 * (p - 0.5) * (p - 1.0);
        let lm = -4.0 * p * (p - 1.0);
        let l1 = 2.0 * p * (p - 0.5);
        (x0 * l0 + xm * lm + x1 * l1).clamp(0.0, 1.0)
    }
}

/// Which `w` placement to start from; the two are mutually exclusive
#[enum_dispatch(WPlacement)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialFit {
    Linear(LinearFit),
    Quadratic(QuadraticFit),
}

impl Default for InitialFit {
    fn default() -> Self {
        InitialFit::Linear(LinearFit)
    }
}

/// Starting point for the optimizer
#[derive(Debug, Clone, PartialEq)]
pub struct InitialEstimate {
    pub layout: Layout,
    pub orientation: Orientation,
    pub corners: CornerValues,
}

/// Lay out all three scales from the corner values.
///
/// The corners are expected to have passed [`CornerValues::check`].
pub fn estimate(
    config: &NomogramConfig,
    sampling: &Sampling,
    corners: CornerValues,
) -> InitialEstimate {
    let orientation = Orientation::from_corners(&corners);
    let fit = BilinearFit::new(&corners, orientation);
    let placement = config.initial_fit();
    let mut layout = Layout::zeros(sampling.len());

    let u = sampling.domain(ScaleId::U);
    let u_heights: Vec<f64> = sampling
        .nodes(ScaleId::U)
        .iter()
        .map(|&value| u.normalize(value))
        .collect();
    layout.xs_mut(ScaleId::U).fill(0.0);
    layout.ys_mut(ScaleId::U).copy_from_slice(&u_heights);

    let v = sampling.domain(ScaleId::V);
    let v_heights: Vec<f64> = sampling
        .nodes(ScaleId::V)
        .iter()
        .map(|&value| {
            let t = v.normalize(value);
            if orientation.v_flipped { 1.0 - t } else { t }
        })
        .collect();
    layout.xs_mut(ScaleId::V).fill(1.0);
    layout.ys_mut(ScaleId::V).copy_from_slice(&v_heights);

    let w = sampling.domain(ScaleId::W);
    let w_progress: Vec<f64> = sampling
        .nodes(ScaleId::W)
        .iter()
        .map(|&value| {
            let r = w.normalize(value);
            if orientation.w_aligned_with_u { r } else { 1.0 - r }
        })
        .collect();
    let w_xs: Vec<f64> = w_progress
        .iter()
        .map(|&p| placement.x_at(&fit, p).clamp(0.0, 1.0))
        .collect();
    layout.xs_mut(ScaleId::W).copy_from_slice(&w_xs);
    layout.ys_mut(ScaleId::W).copy_from_slice(&w_progress);

    if config.verbosity().shows(Verbosity::Summary) {
        info!(
            w_aligned_with_u = orientation.w_aligned_with_u,
            v_flipped = orientation.v_flipped,
            w_start_x = w_xs[0],
            w_end_x = w_xs[w_xs.len() - 1],
            "initial layout"
        );
    }
    if config.verbosity().shows(Verbosity::Detail) {
        debug!(?corners, ?fit, "corner fit");
    }

    InitialEstimate {
        layout,
        orientation,
        corners,
    }
}
