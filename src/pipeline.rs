//! End-to-end layout of a three-scale alignment nomogram
//!
//! corner check -> node sampling -> initial estimate -> cost minimization ->
//! grid verification -> tick sides. Every stage reads the one
//! [`NomogramConfig`]; any fatal condition stops the run with a
//! [`NomogenError`].

use crate::config::{NomogramConfig, Verbosity};
use crate::cost::{CostBreakdown, LayoutCost};
use crate::errors::{AccuracyWarning, NomogenError};
use crate::layout::{CornerValues, InitialEstimate, LayoutView, Orientation, Sampling, ScaleCurve, initial};
use crate::log::{info, warn};
use crate::optimize::{Bfgs, Termination};
use crate::ticks::{TickPlan, select_tick_sides};
use crate::types::ScaleId;
use crate::verify::{Verification, verify};

/// A fitted nomogram ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Nomogram {
    curves: [ScaleCurve; 3],
    pub orientation: Orientation,
    pub cost: CostBreakdown,
    pub termination: Termination,
    pub iterations: usize,
    pub verification: Verification,
    pub ticks: TickPlan,
}

impl Nomogram {
    pub fn scale(&self, id: ScaleId) -> &ScaleCurve {
        &self.curves[id.index()]
    }

    pub fn u(&self) -> &ScaleCurve {
        self.scale(ScaleId::U)
    }

    pub fn v(&self) -> &ScaleCurve {
        self.scale(ScaleId::V)
    }

    pub fn w(&self) -> &ScaleCurve {
        self.scale(ScaleId::W)
    }

    /// All three curves as `[u, v, w]`
    pub fn curves(&self) -> &[ScaleCurve; 3] {
        &self.curves
    }

    /// Accuracy advisory from verification, if any
    pub fn warning(&self) -> Option<&AccuracyWarning> {
        self.verification.warning.as_ref()
    }

    /// Estimated worst alignment error on the printed chart
    pub fn max_error_mm(&self) -> f64 {
        self.verification.max_error_mm
    }
}

/// Check the corners of the `u`, `v` domain against the `w` bounds
pub fn check_corners<F: Fn(f64, f64) -> f64>(
    f: &F,
    config: &NomogramConfig,
) -> Result<CornerValues, NomogenError> {
    let corners = CornerValues::sample(f, config.domain(ScaleId::U), config.domain(ScaleId::V));
    if config.verbosity().shows(Verbosity::Summary) {
        info!(
            f00 = corners.f00,
            f10 = corners.f10,
            f01 = corners.f01,
            f11 = corners.f11,
            "corner values"
        );
    }
    corners.check(config.domain(ScaleId::W))?;
    Ok(corners)
}

/// The starting layout handed to the optimizer, without optimizing
pub fn initial_layout<F: Fn(f64, f64) -> f64>(
    f: &F,
    config: &NomogramConfig,
) -> Result<InitialEstimate, NomogenError> {
    let corners = check_corners(f, config)?;
    let sampling = Sampling::new(config);
    Ok(initial::estimate(config, &sampling, corners))
}

/// Fit the three scale curves of the nomogram for `w = f(u, v)`.
///
/// The declared `w` bounds must enclose `f` over the whole `u`, `v` domain;
/// this is checked at the corners, at every node pair and over the
/// verification grid. An optimizer that stops short of convergence still
/// yields a nomogram, with the reason in [`Nomogram::termination`].
pub fn nomogen<F: Fn(f64, f64) -> f64>(
    f: F,
    config: &NomogramConfig,
) -> Result<Nomogram, NomogenError> {
    let verbosity = config.verbosity();
    let corners = check_corners(&f, config)?;
    let sampling = Sampling::new(config);
    let estimate = initial::estimate(config, &sampling, corners);

    let cost = LayoutCost::new(config, &sampling, &f, &estimate.layout)?;
    let minimum = Bfgs::new(config.optimizer(), verbosity)
        .minimize(&cost, estimate.layout.into_vars())?;
    let breakdown = cost.breakdown(&minimum.x)?;
    if verbosity.shows(Verbosity::Summary) {
        info!(
            cost = breakdown.total,
            alignment = breakdown.alignment,
            endpoints = breakdown.endpoints,
            iterations = minimum.iterations,
            termination = ?minimum.termination,
            "optimized layout"
        );
    }

    let mut curves = LayoutView::new(sampling.len(), &minimum.x).curves(&sampling);
    #[cfg(feature = "tracing")]
    if verbosity.shows(Verbosity::Detail) {
        for curve in &curves {
            crate::log::debug!(
                scale = %curve.id(),
                xs = ?curve.xs(),
                ys = ?curve.ys(),
                "fitted scale"
            );
        }
    }

    let verification = verify(config, &curves, &f)?;

    let ticks = select_tick_sides(&curves, estimate.orientation, config.tick_closeness());
    for curve in &mut curves {
        curve.set_tick_side(ticks.side(curve.id()));
    }
    if ticks.unresolved() && verbosity.shows(Verbosity::Summary) {
        warn!(
            uw_area = ?ticks.uw_area,
            wv_area = ?ticks.wv_area,
            "ambiguous endpoint pairing, treating those scales as apart"
        );
    }
    if verbosity.shows(Verbosity::Summary) {
        info!(
            u = %ticks.u,
            v = %ticks.v,
            w = %ticks.w,
            uw_area = ?ticks.uw_area,
            wv_area = ?ticks.wv_area,
            "tick sides"
        );
    }

    Ok(Nomogram {
        curves,
        orientation: estimate.orientation,
        cost: breakdown,
        termination: minimum.termination,
        iterations: minimum.iterations,
        verification,
        ticks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CheckStage;
    use crate::ticks::TickSide;

    #[test]
    fn corner_violation_stops_before_sampling() {
        let config = NomogramConfig::new((1.0, 5.0), (1.0, 5.0), (2.0, 9.0))
            .unwrap()
            .with_verbosity(Verbosity::Quiet);
        let err = nomogen(|u, v| u + v, &config).unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"f(5, 5) = 10 lies outside the declared w range [2, 9] (corner check)"
        );
        assert!(matches!(
            err,
            NomogenError::RangeViolation {
                stage: CheckStage::CornerCheck,
                ..
            }
        ));
    }

    #[test]
    fn initial_layout_places_u_left_and_v_right() {
        let config = NomogramConfig::new((1.0, 5.0), (1.0, 5.0), (2.0, 10.0)).unwrap();
        let estimate = initial_layout(&|u: f64, v: f64| u + v, &config).unwrap();
        let layout = estimate.layout;
        assert!(layout.xs(ScaleId::U).iter().all(|&x| x == 0.0));
        assert!(layout.xs(ScaleId::V).iter().all(|&x| x == 1.0));
    }

    #[test]
    fn sum_chart_needs_no_reshaping() {
        let config = NomogramConfig::new((1.0, 5.0), (1.0, 5.0), (2.0, 10.0))
            .unwrap()
            .with_nodes(5)
            .unwrap()
            .with_verbosity(Verbosity::Quiet);
        let nomogram = nomogen(|u, v| u + v, &config).unwrap();
        assert_eq!(nomogram.termination, Termination::Converged);
        assert!(nomogram.warning().is_none());
        assert!(nomogram.max_error_mm() < 1e-6);
        assert_eq!(nomogram.w().tick_side(), nomogram.ticks.w);
        assert_eq!(nomogram.iterations, 0);
    }

    #[test]
    fn decreasing_relation_flips_v_ticks_outward() {
        // w falls with u and rises with v, so v runs down the right edge.
        let config = NomogramConfig::new((1.0, 5.0), (1.0, 5.0), (-4.0, 4.0))
            .unwrap()
            .with_nodes(5)
            .unwrap()
            .with_verbosity(Verbosity::Quiet);
        let nomogram = nomogen(|u, v| v - u, &config).unwrap();
        assert!(nomogram.orientation.v_flipped);
        assert_eq!(nomogram.v().tick_side(), TickSide::Left);
        assert_eq!(nomogram.u().tick_side(), TickSide::Left);
        assert!(nomogram.warning().is_none());
    }
}
