//! Quadrature rules for the closed-curve line integral

use std::f64::consts::PI;

/// Clenshaw-Curtis weights for `n` Chebyshev-Gauss-Lobatto nodes on a domain
/// of width `span`.
///
/// The weights are symmetric, so they pair with the increasing node order
/// produced by [`chebyshev_nodes`](super::chebyshev_nodes).
pub fn clenshaw_curtis(n: usize, span: f64) -> Vec<f64> {
    assert!(n >= 2, "Clenshaw-Curtis needs at least two nodes");
    let intervals = n - 1;
    let big_n = intervals as f64;
    let mut weights = vec![0.0; n];

    let end_weight = if intervals % 2 == 0 {
        1.0 / (big_n * big_n - 1.0)
    } else {
        1.0 / (big_n * big_n)
    };
    weights[0] = end_weight;
    weights[intervals] = end_weight;

    for (i, w) in weights.iter_mut().enumerate().take(intervals).skip(1) {
        let theta = PI * i as f64 / big_n;
        let mut v = 1.0;
        for k in 1..=(intervals - 1) / 2 {
            let kf = k as f64;
            v -= 2.0 * (2.0 * kf * theta).cos() / (4.0 * kf * kf - 1.0);
        }
        if intervals % 2 == 0 {
            v -= (big_n * theta).cos() / (big_n * big_n - 1.0);
        }
        *w = 2.0 * v / big_n;
    }

    let half = span / 2.0;
    for w in &mut weights {
        *w *= half;
    }
    weights
}

const GAUSS_LEGENDRE_5: [(f64, f64); 5] = [
    (0.0, 0.568_888_888_888_888_9),
    (-0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (-0.906_179_845_938_664_0, 0.236_926_885_056_189_1),
    (0.906_179_845_938_664_0, 0.236_926_885_056_189_1),
];

/// Integrate `g` over `[0, 1]` with 5-point Gauss-Legendre (exact to degree 9)
pub fn gauss_legendre_unit(g: impl Fn(f64) -> f64) -> f64 {
    GAUSS_LEGENDRE_5
        .iter()
        .map(|&(x, w)| w * g(0.5 + 0.5 * x))
        .sum::<f64>()
        * 0.5
}
