//! Alignment error between the three scales

use glam::DVec2;

use crate::chebyshev::coefficients;
use crate::errors::{CheckStage, NomogenError};
use crate::layout::{LayoutView, Sampling, x_index, y_index};
use crate::types::ScaleId;

/// Whether `u` and `v` fall on the same printer dot
#[inline]
pub fn coincident(u: DVec2, v: DVec2, resolution: f64) -> bool {
    u.distance_squared(v) * resolution <= 1.0
}

/// Twice the signed area of the triangle `u`, `v`, `w`
#[inline]
pub fn cross(u: DVec2, v: DVec2, w: DVec2) -> f64 {
    (u.x - v.x) * (u.y - w.y) - (u.x - w.x) * (u.y - v.y)
}

/// Squared distance of `w` from the line through `u` and `v`.
///
/// Zero when `u` and `v` coincide at `resolution`: the line is undefined there.
#[inline]
pub fn misalignment(u: DVec2, v: DVec2, w: DVec2, resolution: f64) -> f64 {
    if coincident(u, v, resolution) {
        return 0.0;
    }
    let c = cross(u, v, w);
    c * c / u.distance_squared(v)
}

/// Misalignment summed over every pair of `u` and `v` nodes.
///
/// The value `f(u_i, v_j)` does not depend on the layout, so each pair's
/// barycentric row on the `w` scale is computed once, up front; the `w`
/// position of a pair is then a dot product with the `w` coordinates.
#[derive(Debug, Clone)]
pub struct AlignmentTerm {
    n: usize,
    /// `N` rows of `N` coefficients per `(i, j)` pair, row-major over `(i, j)`
    rows: Vec<f64>,
    resolution: f64,
}

impl AlignmentTerm {
    pub fn new<F: Fn(f64, f64) -> f64>(
        f: &F,
        sampling: &Sampling,
        resolution: f64,
    ) -> Result<Self, NomogenError> {
        let n = sampling.len();
        let w_domain = sampling.domain(ScaleId::W);
        let w_nodes = sampling.nodes(ScaleId::W);
        let mut rows = Vec::with_capacity(n * n * n);

        for &u in sampling.nodes(ScaleId::U) {
            for &v in sampling.nodes(ScaleId::V) {
                let w = f(u, v);
                if !w_domain.admits(w) {
                    return Err(NomogenError::RangeViolation {
                        stage: CheckStage::NodeSampling,
                        u,
                        v,
                        w,
                        min: w_domain.min(),
                        max: w_domain.max(),
                    });
                }
                rows.extend(coefficients(w, w_nodes));
            }
        }

        Ok(AlignmentTerm {
            n,
            rows,
            resolution,
        })
    }

    #[inline]
    fn row(&self, i: usize, j: usize) -> &[f64] {
        let start = (i * self.n + j) * self.n;
        &self.rows[start..start + self.n]
    }

    /// Position on the `w` scale of `f(u_i, v_j)`
    pub fn w_point(&self, layout: &LayoutView<'_>, i: usize, j: usize) -> DVec2 {
        let row = self.row(i, j);
        let xs = layout.xs(ScaleId::W);
        let ys = layout.ys(ScaleId::W);
        row.iter()
            .zip(xs.iter().zip(ys))
            .fold(DVec2::ZERO, |acc, (&c, (&x, &y))| {
                acc + DVec2::new(c * x, c * y)
            })
    }

    pub fn value(&self, layout: &LayoutView<'_>) -> f64 {
        let mut total = 0.0;
        for i in 0..self.n {
            let u = layout.position(ScaleId::U, i);
            for j in 0..self.n {
                let v = layout.position(ScaleId::V, j);
                let w = self.w_point(layout, i, j);
                total += misalignment(u, v, w, self.resolution);
            }
        }
        total
    }

    /// Add `weight` times the gradient to `grad`; returns the unweighted value.
    ///
    /// With `a = cross(u, v, w)` and `d2 = |u - v|^2`, each pair contributes
    /// `a^2 / d2`, whose partials are `2a * da / d2 - a^2 * dd2 / d2^2`.
    pub fn accumulate_gradient(
        &self,
        layout: &LayoutView<'_>,
        weight: f64,
        grad: &mut [f64],
    ) -> f64 {
        let n = self.n;
        let mut total = 0.0;
        for i in 0..n {
            let u = layout.position(ScaleId::U, i);
            for j in 0..n {
                let v = layout.position(ScaleId::V, j);
                if coincident(u, v, self.resolution) {
                    continue;
                }
                let w = self.w_point(layout, i, j);
                let d2 = u.distance_squared(v);
                let a = cross(u, v, w);
                total += a * a / d2;

                let k = 2.0 * a / d2;
                let m = a * a / (d2 * d2);
                let uv = u - v;

                let g_ux = k * (v.y - w.y) - m * 2.0 * uv.x;
                let g_uy = k * (w.x - v.x) - m * 2.0 * uv.y;
                let g_vx = k * (w.y - u.y) + m * 2.0 * uv.x;
                let g_vy = k * (u.x - w.x) + m * 2.0 * uv.y;
                let g_wx = k * (u.y - v.y);
                let g_wy = -k * (u.x - v.x);

                grad[x_index(n, ScaleId::U, i)] += weight * g_ux;
                grad[y_index(n, ScaleId::U, i)] += weight * g_uy;
                grad[x_index(n, ScaleId::V, j)] += weight * g_vx;
                grad[y_index(n, ScaleId::V, j)] += weight * g_vy;
                for (k_node, &c) in self.row(i, j).iter().enumerate() {
                    if c != 0.0 {
                        grad[x_index(n, ScaleId::W, k_node)] += weight * g_wx * c;
                        grad[y_index(n, ScaleId::W, k_node)] += weight * g_wy * c;
                    }
                }
            }
        }
        total
    }
}
