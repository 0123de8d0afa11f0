//! Unconstrained minimization of the layout cost
//!
//! Any problem implementing argmin's [`CostFunction`] and [`Gradient`] over a
//! flat `Vec<f64>` can be handed to [`Bfgs`]; the layout cost is one such
//! problem and this module knows nothing about nomograms.
//!
//! [`CostFunction`]: argmin::core::CostFunction
//! [`Gradient`]: argmin::core::Gradient

pub mod bfgs;

pub use bfgs::Bfgs;

use crate::errors::NomogenError;

/// Relative step for central differences, about the cube root of machine epsilon
const DIFFERENCE_STEP: f64 = 6e-6;

/// Central-difference gradient of `value` at `x`, written into `grad`
pub fn central_difference<E>(
    x: &[f64],
    grad: &mut [f64],
    mut value: impl FnMut(&[f64]) -> Result<f64, E>,
) -> Result<(), E> {
    let mut shifted = x.to_vec();
    for (i, g) in grad.iter_mut().enumerate() {
        let origin = x[i];
        let h = DIFFERENCE_STEP * origin.abs().max(1.0);
        shifted[i] = origin + h;
        let forward = value(&shifted)?;
        shifted[i] = origin - h;
        let backward = value(&shifted)?;
        shifted[i] = origin;
        *g = (forward - backward) / (2.0 * h);
    }
    Ok(())
}

/// Recover a [`NomogenError`] raised inside a cost evaluation; anything
/// else the solver reports is wrapped as [`NomogenError::Optimizer`].
pub(crate) fn into_nomogen(err: argmin::core::Error) -> NomogenError {
    match err.downcast::<NomogenError>() {
        Ok(err) => err,
        Err(other) => NomogenError::Optimizer {
            message: other.to_string(),
        },
    }
}

/// Why the minimizer stopped; every variant still carries a usable iterate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Gradient norm fell below the tolerance
    Converged,
    /// Iteration budget exhausted
    IterationLimit,
    /// The solver gave up before converging (failed line search, no
    /// further decrease, non-finite step)
    Stalled,
}

impl Termination {
    pub fn converged(self) -> bool {
        self == Termination::Converged
    }
}

/// Best iterate found by a minimizer run
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub x: Vec<f64>,
    pub value: f64,
    pub gradient_norm: f64,
    pub iterations: usize,
    pub termination: Termination,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn central_difference_recovers_a_quadratic_gradient() {
        let bowl = |x: &[f64]| -> Result<f64, ()> {
            Ok((x[0] - 1.0).powi(2) + 3.0 * x[1] * x[1] + x[0] * x[1])
        };
        let mut grad = [0.0; 2];
        central_difference(&[2.0, -1.0], &mut grad, bowl).unwrap();
        assert_relative_eq!(grad[0], 2.0 * (2.0 - 1.0) - 1.0, epsilon = 1e-8);
        assert_relative_eq!(grad[1], 6.0 * -1.0 + 2.0, epsilon = 1e-8);
    }

    #[test]
    fn cost_errors_survive_the_solver_boundary() {
        let original = NomogenError::TooFewNodes { requested: 1 };
        let wrapped: argmin::core::Error = original.clone().into();
        assert_eq!(into_nomogen(wrapped), original);

        let foreign = argmin::core::Error::msg("line search exhausted");
        assert!(matches!(
            into_nomogen(foreign),
            NomogenError::Optimizer { message } if message == "line search exhausted"
        ));
    }
}
