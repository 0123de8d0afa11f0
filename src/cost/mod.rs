//! Cost function minimized by the optimizer
//!
//! - `alignment`: misalignment of every `(u_i, v_j)` isopleth
//! - `area`: closed-curve line integral between two scales
//!
//! The total weights the alignment error and the endpoint pull, plus the
//! area term when it is enabled.

pub mod alignment;
pub mod area;

pub use alignment::{AlignmentTerm, coincident, cross, misalignment};
pub use area::{Pairing, enclosed_area};

use argmin::core::{CostFunction, Gradient};
use glam::DVec2;

use crate::config::{CostWeights, NomogramConfig};
use crate::errors::NomogenError;
use crate::layout::{Layout, LayoutView, Sampling, x_index, y_index};
use crate::optimize::central_difference;
use crate::types::ScaleId;

/// Pulls the `u` and `v` endpoints back onto their corners
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointTerm {
    n: usize,
    targets: [(ScaleId, usize, DVec2); 4],
}

impl EndpointTerm {
    /// Corners taken from the initial layout, which starts the endpoints on them
    pub fn new(initial: &Layout) -> Self {
        let n = initial.xs(ScaleId::U).len();
        let last = n - 1;
        let target = |id: ScaleId, i: usize| (id, i, initial.position(id, i));
        EndpointTerm {
            n,
            targets: [
                target(ScaleId::U, 0),
                target(ScaleId::U, last),
                target(ScaleId::V, 0),
                target(ScaleId::V, last),
            ],
        }
    }

    pub fn value(&self, layout: &LayoutView<'_>) -> f64 {
        self.targets
            .iter()
            .map(|&(id, i, corner)| layout.position(id, i).distance_squared(corner))
            .sum()
    }

    /// Add `weight` times the gradient to `grad`; returns the unweighted value
    pub fn accumulate_gradient(
        &self,
        layout: &LayoutView<'_>,
        weight: f64,
        grad: &mut [f64],
    ) -> f64 {
        let mut total = 0.0;
        for &(id, i, corner) in &self.targets {
            let offset = layout.position(id, i) - corner;
            total += offset.length_squared();
            grad[x_index(self.n, id, i)] += weight * 2.0 * offset.x;
            grad[y_index(self.n, id, i)] += weight * 2.0 * offset.y;
        }
        total
    }
}

/// Unweighted cost terms of one layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    /// Summed squared misalignment
    pub alignment: f64,
    /// Squared endpoint drift
    pub endpoints: f64,
    /// Area term, when enabled
    pub area: Option<f64>,
    /// Weighted sum handed to the optimizer
    pub total: f64,
}

/// Largest `|A|` any closed loop inside the unit square can reach: the
/// integral of `1 - (2x-1)^4 - (2y-1)^4` over the region where it is positive.
pub const MAX_ENCLOSED_AREA: f64 = 0.618_024_892_433_790_9;

/// The objective over the flattened `6N` layout vector
#[derive(Debug, Clone)]
pub struct LayoutCost {
    sampling: Sampling,
    alignment: AlignmentTerm,
    endpoints: EndpointTerm,
    weights: CostWeights,
}

impl LayoutCost {
    /// Evaluates `f` on every `(u_i, v_j)` node pair, failing if a value falls
    /// outside the declared `w` domain.
    pub fn new<F: Fn(f64, f64) -> f64>(
        config: &NomogramConfig,
        sampling: &Sampling,
        f: &F,
        initial: &Layout,
    ) -> Result<Self, NomogenError> {
        Ok(LayoutCost {
            sampling: sampling.clone(),
            alignment: AlignmentTerm::new(f, sampling, config.resolution())?,
            endpoints: EndpointTerm::new(initial),
            weights: config.weights(),
        })
    }

    /// Number of free variables
    pub fn dimension(&self) -> usize {
        6 * self.sampling.len()
    }

    fn view<'a>(&self, vars: &'a [f64]) -> LayoutView<'a> {
        LayoutView::new(self.sampling.len(), vars)
    }

    /// Minus the geometric mean of the three pairwise areas, in `[-1, 0]`.
    ///
    /// Areas come out negative for separated scales (see [`area`]). Each one
    /// is negated, divided by [`MAX_ENCLOSED_AREA`] and clamped to `[0, 1]`,
    /// so curves pushed out of the square or folded over earn nothing beyond
    /// what a loop inside the square could.
    pub fn area_term(&self, vars: &[f64]) -> Result<f64, NomogenError> {
        let [u, v, w] = self.view(vars).curves(&self.sampling);
        let product = [(&u, &v), (&u, &w), (&w, &v)]
            .into_iter()
            .map(|(a, b)| {
                enclosed_area(a, b).map(|area| (-area / MAX_ENCLOSED_AREA).clamp(0.0, 1.0))
            })
            .try_fold(1.0, |acc, area| area.map(|a| acc * a))?;
        Ok(-product.cbrt())
    }

    pub fn breakdown(&self, vars: &[f64]) -> Result<CostBreakdown, NomogenError> {
        let view = self.view(vars);
        let alignment = self.alignment.value(&view);
        let endpoints = self.endpoints.value(&view);
        let area = match self.weights.area {
            Some(_) => Some(self.area_term(vars)?),
            None => None,
        };
        let total = self.weights.alignment * alignment
            + self.weights.endpoint * endpoints
            + area.zip(self.weights.area).map_or(0.0, |(a, weight)| a * weight);
        Ok(CostBreakdown {
            alignment,
            endpoints,
            area,
            total,
        })
    }

    /// Write the gradient at `x` into `grad` and return the weighted total.
    ///
    /// Alignment and endpoint terms are differentiated analytically, the area
    /// term by central differences.
    pub fn value_and_gradient(&self, x: &[f64], grad: &mut [f64]) -> Result<f64, NomogenError> {
        grad.fill(0.0);
        let view = self.view(x);
        let alignment = self
            .alignment
            .accumulate_gradient(&view, self.weights.alignment, grad);
        let endpoints = self
            .endpoints
            .accumulate_gradient(&view, self.weights.endpoint, grad);
        let mut total = self.weights.alignment * alignment + self.weights.endpoint * endpoints;

        if let Some(weight) = self.weights.area {
            total += weight * self.area_term(x)?;
            let mut area_grad = vec![0.0; x.len()];
            central_difference(x, &mut area_grad, |shifted| self.area_term(shifted))?;
            for (g, a) in grad.iter_mut().zip(&area_grad) {
                *g += weight * a;
            }
        }
        Ok(total)
    }
}

impl CostFunction for LayoutCost {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Vec<f64>) -> Result<f64, argmin::core::Error> {
        Ok(self.breakdown(x)?.total)
    }
}

impl Gradient for LayoutCost {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, x: &Vec<f64>) -> Result<Vec<f64>, argmin::core::Error> {
        let mut grad = vec![0.0; x.len()];
        self.value_and_gradient(x, &mut grad)?;
        Ok(grad)
    }
}
