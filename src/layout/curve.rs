//! Fitted scale curves handed to the renderer

use glam::{DVec2, dvec2};

use crate::chebyshev::{differentiate, evaluate};
use crate::ticks::TickSide;
use crate::types::{Domain, ScaleId};

/// One scale's fitted curve.
///
/// Owns its node values and positions in a single allocation laid out as
/// `[nodes | xs | ys]`; `x(value)` and `y(value)` interpolate through them.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleCurve {
    id: ScaleId,
    domain: Domain,
    len: usize,
    data: Box<[f64]>,
    tick_side: TickSide,
}

impl ScaleCurve {
    pub fn new(id: ScaleId, domain: Domain, nodes: &[f64], xs: &[f64], ys: &[f64]) -> Self {
        assert!(
            nodes.len() == xs.len() && nodes.len() == ys.len(),
            "curve arrays must have equal lengths"
        );
        let mut data = Vec::with_capacity(nodes.len() * 3);
        data.extend_from_slice(nodes);
        data.extend_from_slice(xs);
        data.extend_from_slice(ys);
        ScaleCurve {
            id,
            domain,
            len: nodes.len(),
            data: data.into_boxed_slice(),
            tick_side: TickSide::default_for(id),
        }
    }

    #[inline]
    pub fn id(&self) -> ScaleId {
        self.id
    }

    #[inline]
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Number of nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn nodes(&self) -> &[f64] {
        &self.data[..self.len]
    }

    #[inline]
    pub fn xs(&self) -> &[f64] {
        &self.data[self.len..2 * self.len]
    }

    #[inline]
    pub fn ys(&self) -> &[f64] {
        &self.data[2 * self.len..]
    }

    /// Horizontal position of `value` in the unit square
    pub fn x(&self, value: f64) -> f64 {
        evaluate(value, self.nodes(), self.xs())
    }

    /// Vertical position of `value` in the unit square
    pub fn y(&self, value: f64) -> f64 {
        evaluate(value, self.nodes(), self.ys())
    }

    pub fn point(&self, value: f64) -> DVec2 {
        dvec2(self.x(value), self.y(value))
    }

    /// Node positions
    pub fn positions(&self) -> Vec<DVec2> {
        self.xs()
            .iter()
            .zip(self.ys())
            .map(|(&x, &y)| dvec2(x, y))
            .collect()
    }

    /// Derivative of the position with respect to the scale value, per node
    pub fn tangents(&self) -> Vec<DVec2> {
        differentiate(self.nodes(), &self.positions())
    }

    /// Position of the first node (the domain minimum)
    pub fn start(&self) -> DVec2 {
        dvec2(self.xs()[0], self.ys()[0])
    }

    /// Position of the last node (the domain maximum)
    pub fn end(&self) -> DVec2 {
        let last = self.len - 1;
        dvec2(self.xs()[last], self.ys()[last])
    }

    /// Side on which the renderer should draw ticks
    #[inline]
    pub fn tick_side(&self) -> TickSide {
        self.tick_side
    }

    pub(crate) fn set_tick_side(&mut self, side: TickSide) {
        self.tick_side = side;
    }
}
