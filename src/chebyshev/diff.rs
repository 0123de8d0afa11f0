//! Spectral Differentiator

use super::barycentric::Interpolant;

/// Chebyshev differentiation matrix for a fixed node set.
///
/// Off-diagonal entries are `(c_i / c_j) * (-1)^(i+j) / (x_i - x_j)` with
/// `c = 2` at both ends and 1 elsewhere. Each diagonal entry is the negated
/// sum of its row, so constants differentiate to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffMatrix {
    n: usize,
    entries: Vec<f64>,
}

impl DiffMatrix {
    pub fn new(nodes: &[f64]) -> Self {
        let n = nodes.len();
        let last = n.saturating_sub(1);
        let c = |k: usize| if k == 0 || k == last { 2.0 } else { 1.0 };

        let mut entries = vec![0.0; n * n];
        for i in 0..n {
            let mut row_sum = 0.0;
            for j in (0..n).filter(|&j| j != i) {
                let sign = if (i + j) % 2 == 0 { 1.0 } else { -1.0 };
                let d = c(i) / c(j) * sign / (nodes[i] - nodes[j]);
                entries[i * n + j] = d;
                row_sum += d;
            }
            entries[i * n + i] = -row_sum;
        }
        DiffMatrix { n, entries }
    }

    #[inline]
    pub fn entry(&self, i: usize, j: usize) -> f64 {
        self.entries[i * self.n + j]
    }

    /// Derivative of the interpolant through `values` at every node.
    ///
    /// Uses the row-sum identity, `sum_j D[i][j] * (y_j - y_i)`, which loses
    /// less to cancellation than multiplying by the diagonal.
    pub fn apply<T: Interpolant>(&self, values: &[T]) -> Vec<T> {
        debug_assert_eq!(values.len(), self.n);
        (0..self.n)
            .map(|i| {
                let yi = values[i];
                (0..self.n)
                    .filter(|&j| j != i)
                    .fold(T::ZERO, |acc, j| acc + (values[j] - yi) * self.entry(i, j))
            })
            .collect()
    }
}

/// Derivative of the interpolant through `(nodes, values)` at every node
pub fn differentiate<T: Interpolant>(nodes: &[f64], values: &[T]) -> Vec<T> {
    DiffMatrix::new(nodes).apply(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chebyshev::chebyshev_nodes;
    use crate::types::{Domain, NodeCount, ScaleId};
    use approx::assert_relative_eq;
    use glam::{DVec2, dvec2};

    fn nodes(min: f64, max: f64, n: usize) -> Vec<f64> {
        let domain = Domain::new(ScaleId::V, min, max).unwrap();
        chebyshev_nodes(domain, NodeCount::new(n).unwrap())
    }

    #[test]
    fn linear_data_gives_its_slope() {
        for (a, b) in [(1.0, 0.0), (-2.5, 7.0), (0.01, -300.0), (42.0, 1e3)] {
            let xs = nodes(5.0, 50.0, 9);
            let ys: Vec<f64> = xs.iter().map(|x| a * x + b).collect();
            for d in differentiate(&xs, &ys) {
                assert_relative_eq!(d, a, epsilon = 1e-9, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn constants_differentiate_to_zero() {
        let xs = nodes(0.0, 1.0, 11);
        let ys = vec![3.25; xs.len()];
        assert!(differentiate(&xs, &ys).iter().all(|&d| d == 0.0));
    }

    #[test]
    fn rows_sum_to_zero() {
        let xs = nodes(-2.0, 3.0, 7);
        let matrix = DiffMatrix::new(&xs);
        for i in 0..xs.len() {
            let sum: f64 = (0..xs.len()).map(|j| matrix.entry(i, j)).sum();
            assert!(sum.abs() < 1e-10, "row {i} sums to {sum}");
        }
    }

    #[test]
    fn quadratic_is_exact() {
        let xs = nodes(0.0, 2.0, 5);
        let ys: Vec<f64> = xs.iter().map(|x| x * x).collect();
        for (x, d) in xs.iter().zip(differentiate(&xs, &ys)) {
            assert_relative_eq!(d, 2.0 * x, epsilon = 1e-12);
        }
    }

    #[test]
    fn differentiates_positions() {
        let xs = nodes(0.0, 1.0, 5);
        let points: Vec<DVec2> = xs.iter().map(|&t| dvec2(t, t * t)).collect();
        for (t, d) in xs.iter().zip(differentiate(&xs, &points)) {
            assert_relative_eq!(d.x, 1.0, epsilon = 1e-12);
            assert_relative_eq!(d.y, 2.0 * t, epsilon = 1e-12);
        }
    }
}
