//! Layout state for the three scales
//!
//! - `curve`: fitted curves handed to the renderer
//! - `initial`: first-guess positions for the optimizer
//!
//! The optimizer sees the layout as one flat vector of `6N` numbers, blocked
//! per scale as `ux, uy, vx, vy, wx, wy`, each block holding `N` values.

pub mod curve;
pub mod initial;

pub use curve::ScaleCurve;
pub use initial::{
    CornerValues, InitialEstimate, InitialFit, LinearFit, Orientation, QuadraticFit, WPlacement,
};

use glam::{DVec2, dvec2};

use crate::chebyshev::chebyshev_nodes;
use crate::config::NomogramConfig;
use crate::types::{Domain, ScaleId};

/// Chebyshev nodes of all three scales
#[derive(Debug, Clone, PartialEq)]
pub struct Sampling {
    domains: [Domain; 3],
    nodes: [Vec<f64>; 3],
}

impl Sampling {
    pub fn new(config: &NomogramConfig) -> Self {
        let count = config.nodes();
        let domains = ScaleId::ALL.map(|id| config.domain(id));
        let nodes = domains.map(|domain| chebyshev_nodes(domain, count));
        Sampling { domains, nodes }
    }

    /// Nodes per scale
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes[0].len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes[0].is_empty()
    }

    #[inline]
    pub fn nodes(&self, id: ScaleId) -> &[f64] {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn domain(&self, id: ScaleId) -> Domain {
        self.domains[id.index()]
    }
}

/// Index of scale `id`'s node `i` x-coordinate in the flat vector
#[inline]
pub const fn x_index(n: usize, id: ScaleId, i: usize) -> usize {
    2 * id.index() * n + i
}

/// Index of scale `id`'s node `i` y-coordinate in the flat vector
#[inline]
pub const fn y_index(n: usize, id: ScaleId, i: usize) -> usize {
    (2 * id.index() + 1) * n + i
}

/// Owned layout vector
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    n: usize,
    vars: Vec<f64>,
}

impl Layout {
    pub fn zeros(n: usize) -> Self {
        Layout {
            n,
            vars: vec![0.0; 6 * n],
        }
    }

    pub fn from_vars(n: usize, vars: Vec<f64>) -> Self {
        assert_eq!(vars.len(), 6 * n, "layout vector must hold 6N values");
        Layout { n, vars }
    }

    #[inline]
    pub fn view(&self) -> LayoutView<'_> {
        LayoutView {
            n: self.n,
            vars: &self.vars,
        }
    }

    #[inline]
    pub fn vars(&self) -> &[f64] {
        &self.vars
    }

    pub fn into_vars(self) -> Vec<f64> {
        self.vars
    }

    pub fn xs_mut(&mut self, id: ScaleId) -> &mut [f64] {
        let start = x_index(self.n, id, 0);
        &mut self.vars[start..start + self.n]
    }

    pub fn ys_mut(&mut self, id: ScaleId) -> &mut [f64] {
        let start = y_index(self.n, id, 0);
        &mut self.vars[start..start + self.n]
    }

    pub fn xs(&self, id: ScaleId) -> &[f64] {
        self.view().xs(id)
    }

    pub fn ys(&self, id: ScaleId) -> &[f64] {
        self.view().ys(id)
    }

    pub fn position(&self, id: ScaleId, i: usize) -> DVec2 {
        self.view().position(id, i)
    }
}

/// Borrowed layout vector, as handed out by the optimizer
#[derive(Debug, Clone, Copy)]
pub struct LayoutView<'a> {
    n: usize,
    vars: &'a [f64],
}

impl<'a> LayoutView<'a> {
    pub fn new(n: usize, vars: &'a [f64]) -> Self {
        debug_assert_eq!(vars.len(), 6 * n);
        LayoutView { n, vars }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn xs(&self, id: ScaleId) -> &'a [f64] {
        let start = x_index(self.n, id, 0);
        &self.vars[start..start + self.n]
    }

    #[inline]
    pub fn ys(&self, id: ScaleId) -> &'a [f64] {
        let start = y_index(self.n, id, 0);
        &self.vars[start..start + self.n]
    }

    #[inline]
    pub fn position(&self, id: ScaleId, i: usize) -> DVec2 {
        dvec2(
            self.vars[x_index(self.n, id, i)],
            self.vars[y_index(self.n, id, i)],
        )
    }

    /// Build the curve of scale `id` from this layout
    pub fn curve(&self, id: ScaleId, sampling: &Sampling) -> ScaleCurve {
        ScaleCurve::new(
            id,
            sampling.domain(id),
            sampling.nodes(id),
            self.xs(id),
            self.ys(id),
        )
    }

    pub fn curves(&self, sampling: &Sampling) -> [ScaleCurve; 3] {
        ScaleId::ALL.map(|id| self.curve(id, sampling))
    }
}
