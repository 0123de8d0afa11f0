//! Chebyshev curve fitting for three-scale alignment nomograms.
//!
//! Given `w = f(u, v)` and bounds for the three variables, [`nomogen`] lays
//! out three scale curves in the unit square so that a straight line through
//! `u` on the first scale and `v` on the second crosses the third at
//! `f(u, v)`. Each curve is a Chebyshev interpolant through its nodes;
//! their positions are found by minimizing the alignment error over every
//! pair of `u` and `v` nodes.
//!
//! ```
//! use nomogen::{NomogramConfig, ScaleId, Verbosity, nomogen};
//!
//! let config = NomogramConfig::new((1.0, 5.0), (1.0, 5.0), (2.0, 10.0))?
//!     .with_nodes(5)?
//!     .with_verbosity(Verbosity::Quiet);
//! let chart = nomogen(|u, v| u + v, &config)?;
//!
//! // The isopleth through u = 2 and v = 3 passes through w = 5.
//! let (a, b, c) = (chart.u().point(2.0), chart.v().point(3.0), chart.w().point(5.0));
//! assert!(nomogen::cost::cross(a, b, c).abs() < 1e-9);
//! assert!(chart.warning().is_none());
//! assert_eq!(chart.scale(ScaleId::U).domain().max(), 5.0);
//! # Ok::<(), nomogen::NomogenError>(())
//! ```

pub mod catalog;
pub mod chebyshev;
pub mod config;
pub mod cost;
pub mod defaults;
pub mod errors;
pub mod layout;
pub mod log;
pub mod optimize;
pub mod pipeline;
pub mod ticks;
pub mod types;
pub mod verify;

pub use config::{CostWeights, NomogramConfig, OptimizerSettings, Verbosity};
pub use errors::{AccuracyWarning, CheckStage, NomogenError};
pub use layout::{InitialFit, LinearFit, QuadraticFit, ScaleCurve};
pub use optimize::Termination;
pub use pipeline::{Nomogram, initial_layout, nomogen};
pub use ticks::{TickPlan, TickSide};
pub use types::{Domain, NodeCount, OutputSize, ScaleId};
pub use verify::Verification;
