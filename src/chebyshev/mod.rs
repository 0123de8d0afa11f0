//! Chebyshev-Gauss-Lobatto machinery shared by every stage
//!
//! - `nodes`: sample points on a domain
//! - `barycentric`: interpolant evaluation from node values
//! - `diff`: derivative of the interpolant at the nodes
//! - `quadrature`: Clenshaw-Curtis and Gauss-Legendre rules

pub mod barycentric;
pub mod diff;
pub mod nodes;
pub mod quadrature;

pub use barycentric::{Interpolant, coefficients, evaluate};
pub use diff::{DiffMatrix, differentiate};
pub use nodes::chebyshev_nodes;
