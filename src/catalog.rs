//! Classic nomogram relations with working domains
//!
//! Used by the demos, the `xtask survey` command and the integration tests.

use crate::config::NomogramConfig;
use crate::errors::NomogenError;

/// A relation `w = f(u, v)` with bounds that enclose it
#[derive(Debug, Clone, Copy)]
pub struct Relation {
    pub name: &'static str,
    pub description: &'static str,
    pub f: fn(f64, f64) -> f64,
    pub u: (f64, f64),
    pub v: (f64, f64),
    pub w: (f64, f64),
    /// Chebyshev node count that keeps the chart within the default
    /// accuracy threshold
    pub nodes: usize,
}

impl Relation {
    /// Default configuration over the relation's domains at its node count
    pub fn config(&self) -> Result<NomogramConfig, NomogenError> {
        NomogramConfig::new(self.u, self.v, self.w)?.with_nodes(self.nodes)
    }

    pub fn eval(&self, u: f64, v: f64) -> f64 {
        (self.f)(u, v)
    }
}

pub fn parallel_resistors(r1: f64, r2: f64) -> f64 {
    1.0 / (1.0 / r1 + 1.0 / r2)
}

pub fn sum(u: f64, v: f64) -> f64 {
    u + v
}

pub fn product(u: f64, v: f64) -> f64 {
    u * v
}

pub fn hypotenuse(a: f64, b: f64) -> f64 {
    (a * a + b * b).sqrt()
}

/// Every relation in the catalog
pub fn catalog() -> Vec<Relation> {
    vec![
        Relation {
            name: "parallel_resistors",
            description: "combined resistance of two resistors in parallel",
            f: parallel_resistors,
            u: (5.0, 50.0),
            v: (5.0, 50.0),
            w: (2.5, 25.0),
            nodes: 9,
        },
        Relation {
            name: "sum",
            description: "w = u + v",
            f: sum,
            u: (1.0, 5.0),
            v: (1.0, 5.0),
            w: (2.0, 10.0),
            nodes: 5,
        },
        Relation {
            name: "product",
            description: "w = u * v",
            f: product,
            u: (1.0, 10.0),
            v: (1.0, 10.0),
            w: (1.0, 100.0),
            // Logarithmic scales need more nodes than the polynomial ones.
            nodes: 13,
        },
        Relation {
            name: "hypotenuse",
            description: "hypotenuse of a right triangle with legs u and v",
            f: hypotenuse,
            u: (1.0, 10.0),
            v: (1.0, 10.0),
            w: (hypotenuse(1.0, 1.0), hypotenuse(10.0, 10.0)),
            nodes: 9,
        },
    ]
}

/// Look a relation up by name
pub fn find(name: &str) -> Option<Relation> {
    catalog().into_iter().find(|r| r.name == name)
}
