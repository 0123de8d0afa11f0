//! Post-optimization accuracy check
//!
//! Scans a dense, uniform grid of `(u, v)` pairs covering both domains,
//! bounds included, and measures how far each `w` point lies from the line
//! through its `u` and `v` points on the printed chart.

use crate::config::{NomogramConfig, Verbosity};
use crate::cost::{coincident, cross};
use crate::errors::{AccuracyWarning, CheckStage, NomogenError};
use crate::layout::ScaleCurve;
use crate::log::{info, warn};
use crate::types::ScaleId;

/// Result of the grid scan
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    /// Grid points per domain
    pub grid: usize,
    /// Largest perpendicular distance of a `w` point from its isopleth
    pub max_error_mm: f64,
    /// `(u, v)` at which the largest error occurred
    pub worst: Option<(f64, f64)>,
    /// Set when `max_error_mm` exceeds the configured threshold
    pub warning: Option<AccuracyWarning>,
}

impl Verification {
    pub fn is_accurate(&self) -> bool {
        self.warning.is_none()
    }
}

/// Scan the `grid_density x grid_density` grid for `curves` laid out as
/// `[u, v, w]`.
///
/// A grid value of `f` outside the declared `w` domain is fatal; an error
/// above the accuracy threshold only attaches a warning.
pub fn verify<F: Fn(f64, f64) -> f64>(
    config: &NomogramConfig,
    curves: &[ScaleCurve; 3],
    f: &F,
) -> Result<Verification, NomogenError> {
    let [u_curve, v_curve, w_curve] = curves;
    let output = config.output();
    let resolution = output.resolution();
    let grid = output.grid_density();
    let (u_domain, v_domain) = (config.domain(ScaleId::U), config.domain(ScaleId::V));
    let w_domain = config.domain(ScaleId::W);
    let last = (grid - 1) as f64;

    let mut max_error_mm = 0.0;
    let mut worst = None;

    for i in 0..grid {
        let u = u_domain.lerp(i as f64 / last);
        let pu = u_curve.point(u);
        for j in 0..grid {
            let v = v_domain.lerp(j as f64 / last);
            let w = f(u, v);
            if !w_domain.admits(w) {
                return Err(NomogenError::RangeViolation {
                    stage: CheckStage::Verification,
                    u,
                    v,
                    w,
                    min: w_domain.min(),
                    max: w_domain.max(),
                });
            }

            let pv = v_curve.point(v);
            if coincident(pu, pv, resolution) {
                continue;
            }
            let (a, b, c) = (output.to_mm(pu), output.to_mm(pv), output.to_mm(w_curve.point(w)));
            let error = cross(a, b, c).abs() / a.distance(b);
            if error > max_error_mm {
                max_error_mm = error;
                worst = Some((u, v));
            }
        }
    }

    let threshold_mm = config.accuracy_threshold_mm();
    let warning = (max_error_mm > threshold_mm).then(|| AccuracyWarning {
        error_mm: max_error_mm,
        threshold_mm,
        nodes: config.nodes().get(),
    });

    if config.verbosity().shows(Verbosity::Summary) {
        match warning {
            Some(_) => {
                warn!(
                    error_mm = max_error_mm,
                    threshold_mm,
                    nodes = config.nodes().get(),
                    "alignment error above threshold; consider more nodes"
                );
            }
            None => {
                info!(grid, max_error_mm, ?worst, "verified alignment");
            }
        }
    }

    Ok(Verification {
        grid,
        max_error_mm,
        worst,
        warning,
    })
}
