//! Node Sampler

use std::f64::consts::PI;

use crate::types::{Domain, NodeCount};

/// Chebyshev-Gauss-Lobatto points covering `domain`, in increasing order.
///
/// `node[k] = min + span/2 * (1 - cos(pi*k/(N-1)))`. The end nodes are the
/// domain bounds exactly, so later exact-match lookups on them succeed.
pub fn chebyshev_nodes(domain: Domain, count: NodeCount) -> Vec<f64> {
    let n = count.get();
    let last = n - 1;
    let half = domain.span() / 2.0;

    let mut nodes: Vec<f64> = (0..n)
        .map(|k| domain.min() + half * (1.0 - (PI * k as f64 / last as f64).cos()))
        .collect();
    nodes[0] = domain.min();
    nodes[last] = domain.max();
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScaleId;

    #[test]
    fn nodes_are_strictly_increasing_with_exact_ends() {
        for (min, max) in [(0.0, 1.0), (5.0, 50.0), (-3.5, -0.25), (1e-3, 1e6)] {
            let domain = Domain::new(ScaleId::U, min, max).unwrap();
            for requested in [3, 4, 9, 15, 31] {
                let nodes = chebyshev_nodes(domain, NodeCount::new(requested).unwrap());
                assert_eq!(nodes.len() % 2, 1);
                assert_eq!(nodes[0], min);
                assert_eq!(nodes[nodes.len() - 1], max);
                assert!(nodes.windows(2).all(|w| w[0] < w[1]), "{nodes:?}");
            }
        }
    }

    #[test]
    fn nodes_cluster_at_the_ends() {
        let domain = Domain::new(ScaleId::U, 0.0, 1.0).unwrap();
        let nodes = chebyshev_nodes(domain, NodeCount::new(9).unwrap());
        let first_gap = nodes[1] - nodes[0];
        let middle_gap = nodes[5] - nodes[4];
        assert!(first_gap < middle_gap / 2.0);
        assert!((nodes[4] - 0.5).abs() < 1e-15);
    }
}
