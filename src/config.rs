//! Run configuration
//!
//! One explicit value carries every setting a stage needs; nothing is read
//! from ambient state. Setters validate eagerly so that a built configuration
//! is always usable.

use crate::defaults;
use crate::errors::NomogenError;
use crate::layout::InitialFit;
use crate::types::{Domain, NodeCount, OutputSize, ScaleId};

/// How much the pipeline reports through the logging macros
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Verbosity {
    /// Nothing, not even accuracy warnings
    Quiet,
    /// Stage results: orientation, final cost, verification
    #[default]
    Summary,
    /// Optimizer progress as well
    Progress,
    /// Per-node data as well
    Detail,
}

impl Verbosity {
    /// Whether events at `level` are emitted under this verbosity
    #[inline]
    pub fn shows(self, level: Verbosity) -> bool {
        level != Verbosity::Quiet && self >= level
    }
}

/// Weights of the cost function terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostWeights {
    pub alignment: f64,
    pub endpoint: f64,
    /// Weight of the enclosed-area term; `None` disables the term
    pub area: Option<f64>,
}

impl Default for CostWeights {
    fn default() -> Self {
        CostWeights {
            alignment: defaults::ALIGNMENT_WEIGHT,
            endpoint: defaults::ENDPOINT_WEIGHT,
            area: None,
        }
    }
}

/// Termination settings of the minimizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerSettings {
    /// Convergence threshold on the Euclidean norm of the gradient
    pub gradient_tolerance: f64,
    /// Iteration budget; `None` means 200 per free variable
    pub max_iterations: Option<usize>,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        OptimizerSettings {
            gradient_tolerance: defaults::GRADIENT_TOLERANCE,
            max_iterations: None,
        }
    }
}

impl OptimizerSettings {
    pub fn iteration_budget(&self, dimension: usize) -> usize {
        self.max_iterations
            .unwrap_or(defaults::ITERATIONS_PER_VARIABLE * dimension)
    }
}

/// Everything a layout run needs besides the target function
#[derive(Debug, Clone, PartialEq)]
pub struct NomogramConfig {
    domains: [Domain; 3],
    nodes: NodeCount,
    output: OutputSize,
    initial_fit: InitialFit,
    weights: CostWeights,
    optimizer: OptimizerSettings,
    accuracy_threshold_mm: f64,
    tick_closeness: f64,
    verbosity: Verbosity,
}

fn non_negative(name: &'static str, value: f64) -> Result<f64, NomogenError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(NomogenError::InvalidSetting { name, value })
    }
}

impl NomogramConfig {
    /// Configuration with default settings for the given `(min, max)` bounds.
    ///
    /// Fails on inverted or non-finite bounds before anything is sampled.
    pub fn new(u: (f64, f64), v: (f64, f64), w: (f64, f64)) -> Result<Self, NomogenError> {
        Ok(NomogramConfig {
            domains: [
                Domain::new(ScaleId::U, u.0, u.1)?,
                Domain::new(ScaleId::V, v.0, v.1)?,
                Domain::new(ScaleId::W, w.0, w.1)?,
            ],
            nodes: NodeCount::default(),
            output: OutputSize::default(),
            initial_fit: InitialFit::default(),
            weights: CostWeights::default(),
            optimizer: OptimizerSettings::default(),
            accuracy_threshold_mm: defaults::ACCURACY_THRESHOLD_MM,
            tick_closeness: defaults::TICK_CLOSENESS,
            verbosity: Verbosity::default(),
        })
    }

    /// Chebyshev nodes per scale; even counts are bumped to the next odd one
    pub fn with_nodes(mut self, requested: usize) -> Result<Self, NomogenError> {
        self.nodes = NodeCount::new(requested)?;
        Ok(self)
    }

    pub fn with_output_size(mut self, width_mm: f64, height_mm: f64) -> Result<Self, NomogenError> {
        self.output = OutputSize::new(width_mm, height_mm)?;
        Ok(self)
    }

    pub fn with_initial_fit(mut self, fit: impl Into<InitialFit>) -> Self {
        self.initial_fit = fit.into();
        self
    }

    pub fn with_alignment_weight(mut self, weight: f64) -> Result<Self, NomogenError> {
        self.weights.alignment = non_negative("alignment weight", weight)?;
        Ok(self)
    }

    pub fn with_endpoint_weight(mut self, weight: f64) -> Result<Self, NomogenError> {
        self.weights.endpoint = non_negative("endpoint weight", weight)?;
        Ok(self)
    }

    /// Enable the enclosed-area term, which pushes the three scales apart
    pub fn with_area_term(mut self, weight: f64) -> Result<Self, NomogenError> {
        self.weights.area = Some(non_negative("area weight", weight)?);
        Ok(self)
    }

    pub fn with_gradient_tolerance(mut self, tolerance: f64) -> Result<Self, NomogenError> {
        self.optimizer.gradient_tolerance = non_negative("gradient tolerance", tolerance)?;
        Ok(self)
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.optimizer.max_iterations = Some(iterations);
        self
    }

    pub fn with_accuracy_threshold(mut self, millimetres: f64) -> Result<Self, NomogenError> {
        self.accuracy_threshold_mm = non_negative("accuracy threshold", millimetres)?;
        Ok(self)
    }

    pub fn with_tick_closeness(mut self, threshold: f64) -> Result<Self, NomogenError> {
        if !threshold.is_finite() {
            return Err(NomogenError::InvalidSetting {
                name: "tick closeness",
                value: threshold,
            });
        }
        self.tick_closeness = threshold;
        Ok(self)
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    #[inline]
    pub fn domain(&self, id: ScaleId) -> Domain {
        self.domains[id.index()]
    }

    #[inline]
    pub fn nodes(&self) -> NodeCount {
        self.nodes
    }

    #[inline]
    pub fn output(&self) -> OutputSize {
        self.output
    }

    #[inline]
    pub fn initial_fit(&self) -> InitialFit {
        self.initial_fit
    }

    #[inline]
    pub fn weights(&self) -> CostWeights {
        self.weights
    }

    #[inline]
    pub fn optimizer(&self) -> OptimizerSettings {
        self.optimizer
    }

    #[inline]
    pub fn accuracy_threshold_mm(&self) -> f64 {
        self.accuracy_threshold_mm
    }

    #[inline]
    pub fn tick_closeness(&self) -> f64 {
        self.tick_closeness
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Dots per unit of unit-square area at the configured output size
    #[inline]
    pub fn resolution(&self) -> f64 {
        self.output.resolution()
    }
}
