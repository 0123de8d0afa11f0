//! Default settings (lengths in millimetres, positions in the unit square)

/// Chebyshev nodes per scale
pub const NODES: usize = 9;
/// Printed width of the nomogram
pub const WIDTH_MM: f64 = 100.0;
/// Printed height of the nomogram
pub const HEIGHT_MM: f64 = 100.0;
/// Output resolution, 300 dpi
pub const DOTS_PER_MM: f64 = 300.0 / 25.4;
/// Verified alignment error above which an accuracy warning is raised
pub const ACCURACY_THRESHOLD_MM: f64 = 0.2;
/// Area measure above which two scales count as running close together
pub const TICK_CLOSENESS: f64 = -0.2;
/// Rounding slack allowed on range checks, relative to the domain span
pub const RANGE_TOLERANCE: f64 = 1e-12;
/// Weight of the alignment error term
pub const ALIGNMENT_WEIGHT: f64 = 1.0;
/// Weight of the corner attraction term
pub const ENDPOINT_WEIGHT: f64 = 1.0;
/// Optimizer stops once the Euclidean norm of the gradient is below this
pub const GRADIENT_TOLERANCE: f64 = 1e-5;
/// Optimizer iteration budget per free variable
pub const ITERATIONS_PER_VARIABLE: usize = 200;
