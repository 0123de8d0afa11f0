//! Barycentric Evaluator
//!
//! Second-form barycentric interpolation on Chebyshev-Gauss-Lobatto nodes.
//! The weights are `(-1)^k`, halved at both ends; any common factor cancels
//! between numerator and denominator.

use std::ops::{Add, Div, Mul, Sub};

use glam::DVec2;

/// Values that can be interpolated: scalars and 2-D positions
pub trait Interpolant:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f64, Output = Self> + Div<f64, Output = Self>
{
    const ZERO: Self;
}

impl Interpolant for f64 {
    const ZERO: f64 = 0.0;
}

impl Interpolant for DVec2 {
    const ZERO: DVec2 = DVec2::ZERO;
}

/// Barycentric weight of node `k` out of `n`
#[inline]
pub fn weight(k: usize, n: usize) -> f64 {
    let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
    if k == 0 || k + 1 == n { 0.5 * sign } else { sign }
}

/// Evaluate the interpolant through `(nodes[k], values[k])` at `value`.
///
/// A `value` equal to a node returns that node's value untouched. The test is
/// exact equality: the nodes are the very numbers callers pass back in.
pub fn evaluate<T: Interpolant>(value: f64, nodes: &[f64], values: &[T]) -> T {
    debug_assert_eq!(nodes.len(), values.len());
    let n = nodes.len();
    let mut numerator = T::ZERO;
    let mut denominator = 0.0;
    for (k, (&node, &y)) in nodes.iter().zip(values).enumerate() {
        if value == node {
            return y;
        }
        let t = weight(k, n) / (value - node);
        numerator = numerator + y * t;
        denominator += t;
    }
    numerator / denominator
}

/// Lagrange basis values at `value`, so that
/// `evaluate(value, nodes, values) == sum(coefficients[k] * values[k])`.
pub fn coefficients(value: f64, nodes: &[f64]) -> Vec<f64> {
    let n = nodes.len();
    if let Some(hit) = nodes.iter().position(|&node| node == value) {
        let mut row = vec![0.0; n];
        row[hit] = 1.0;
        return row;
    }
    let mut row: Vec<f64> = nodes
        .iter()
        .enumerate()
        .map(|(k, &node)| weight(k, n) / (value - node))
        .collect();
    let denominator: f64 = row.iter().sum();
    for c in &mut row {
        *c /= denominator;
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chebyshev::chebyshev_nodes;
    use crate::types::{Domain, NodeCount, ScaleId};
    use approx::assert_relative_eq;
    use glam::dvec2;

    fn nodes(min: f64, max: f64, n: usize) -> Vec<f64> {
        let domain = Domain::new(ScaleId::U, min, max).unwrap();
        chebyshev_nodes(domain, NodeCount::new(n).unwrap())
    }

    #[test]
    fn exact_at_every_node() {
        let xs = nodes(5.0, 50.0, 9);
        let ys: Vec<f64> = xs.iter().map(|x| (x * 0.3).sin() * 7.0 + 1.0 / x).collect();
        for (x, y) in xs.iter().zip(&ys) {
            assert_eq!(evaluate(*x, &xs, &ys), *y);
        }
    }

    #[test]
    fn reproduces_polynomials_of_lower_degree() {
        let xs = nodes(-1.0, 2.0, 7);
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x * x * x - x + 0.5).collect();
        for probe in [-0.9, -0.3, 0.123, 1.0, 1.77] {
            let expected = 3.0 * probe * probe * probe - probe + 0.5;
            assert_relative_eq!(evaluate(probe, &xs, &ys), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn interpolates_positions() {
        let xs = nodes(0.0, 1.0, 5);
        let points: Vec<DVec2> = xs.iter().map(|&t| dvec2(2.0 * t, 1.0 - t)).collect();
        let p = evaluate(0.3, &xs, &points);
        assert_relative_eq!(p.x, 0.6, epsilon = 1e-13);
        assert_relative_eq!(p.y, 0.7, epsilon = 1e-13);
    }

    #[test]
    fn coefficients_match_evaluate() {
        let xs = nodes(1.0, 4.0, 9);
        let ys: Vec<f64> = xs.iter().map(|x| x.ln()).collect();
        for probe in [1.0, 1.4, 2.5, xs[3], 3.99] {
            let row = coefficients(probe, &xs);
            let dot: f64 = row.iter().zip(&ys).map(|(c, y)| c * y).sum();
            assert_relative_eq!(dot, evaluate(probe, &xs, &ys), epsilon = 1e-13);
        }
    }

    #[test]
    fn coefficients_at_a_node_are_a_unit_row() {
        let xs = nodes(0.0, 1.0, 5);
        assert_eq!(coefficients(xs[2], &xs), vec![0.0, 0.0, 1.0, 0.0, 0.0]);
    }
}
