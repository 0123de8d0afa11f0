//! Error types with rich diagnostics using miette
//!
//! Every fatal condition in the pipeline is a [`NomogenError`] variant. The
//! accuracy advisory is a separate diagnostic with warning severity, carried
//! in the result rather than returned as an error.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::types::ScaleId;

/// Pipeline stage at which a range-contract violation was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStage {
    /// The four domain corners, checked before any sampling
    CornerCheck,
    /// The `N x N` node pairs feeding the cost function
    NodeSampling,
    /// The dense grid scanned after optimization
    Verification,
}

impl fmt::Display for CheckStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStage::CornerCheck => write!(f, "corner check"),
            CheckStage::NodeSampling => write!(f, "node sampling"),
            CheckStage::Verification => write!(f, "grid verification"),
        }
    }
}

// ============================================================================
// Fatal Errors
// ============================================================================

/// Errors that abort a layout run
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum NomogenError {
    #[error("{scale} domain is inverted: max {max} is not above min {min}")]
    #[diagnostic(
        code(nomogen::precondition::inverted_domain),
        help("declare the bounds so that min < max")
    )]
    InvertedDomain { scale: ScaleId, min: f64, max: f64 },

    #[error("{scale} domain bounds must be finite, got [{min}, {max}]")]
    #[diagnostic(code(nomogen::precondition::non_finite_bound))]
    NonFiniteBound { scale: ScaleId, min: f64, max: f64 },

    #[error("at least 3 Chebyshev nodes are required, got {requested}")]
    #[diagnostic(code(nomogen::precondition::too_few_nodes))]
    TooFewNodes { requested: usize },

    #[error("output size must be positive and finite, got {width_mm} x {height_mm} mm")]
    #[diagnostic(code(nomogen::precondition::invalid_output_size))]
    InvalidOutputSize { width_mm: f64, height_mm: f64 },

    #[error("{name} must be finite and non-negative, got {value}")]
    #[diagnostic(code(nomogen::precondition::invalid_setting))]
    InvalidSetting { name: &'static str, value: f64 },

    #[error("f({u}, {v}) = {w} lies outside the declared w range [{min}, {max}] ({stage})")]
    #[diagnostic(
        code(nomogen::range_violation),
        help("the declared w bounds must enclose f over the whole u, v domain")
    )]
    RangeViolation {
        stage: CheckStage,
        u: f64,
        v: f64,
        w: f64,
        min: f64,
        max: f64,
    },

    #[error("both endpoint pairings of the {first} and {second} scales measure {length}")]
    #[diagnostic(
        code(nomogen::area::unresolved_pairing),
        help("the enclosed area has no defined orientation for this layout")
    )]
    UnresolvedPairing {
        first: ScaleId,
        second: ScaleId,
        length: f64,
    },

    #[error("optimizer failed: {message}")]
    #[diagnostic(code(nomogen::optimizer))]
    Optimizer { message: String },
}

// ============================================================================
// Advisories
// ============================================================================

/// Estimated alignment error above the accuracy threshold
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
#[error("estimated alignment error {error_mm:.3} mm exceeds {threshold_mm} mm")]
#[diagnostic(
    code(nomogen::accuracy),
    severity(Warning),
    help("increase the number of Chebyshev nodes (currently {nodes})")
)]
pub struct AccuracyWarning {
    pub error_mm: f64,
    pub threshold_mm: f64,
    pub nodes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_violation_names_the_pair() {
        let err = NomogenError::RangeViolation {
            stage: CheckStage::CornerCheck,
            u: 1.0,
            v: 2.0,
            w: 3.0,
            min: 0.0,
            max: 2.5,
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"f(1, 2) = 3 lies outside the declared w range [0, 2.5] (corner check)"
        );
    }

    #[test]
    fn accuracy_warning_is_a_warning() {
        let warning = AccuracyWarning {
            error_mm: 0.4567,
            threshold_mm: 0.2,
            nodes: 9,
        };
        assert_eq!(warning.severity(), Some(miette::Severity::Warning));
        insta::assert_snapshot!(
            warning.to_string(),
            @"estimated alignment error 0.457 mm exceeds 0.2 mm"
        );
    }
}
