//! BFGS with a More-Thuente line search, driven by argmin

use std::sync::{Arc, Mutex};

use argmin::core::observers::{Observe, ObserverMode};
use argmin::core::{
    CostFunction, Error, Executor, Gradient, KV, State, TerminationReason, TerminationStatus,
};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::BFGS;
use argmin_math::ArgminL2Norm;

use super::{Minimum, Termination, into_nomogen};
use crate::config::{OptimizerSettings, Verbosity};
use crate::errors::NomogenError;
use crate::log::debug;

/// Iterations between progress events
const PROGRESS_EVERY: u64 = 100;

/// Quasi-Newton minimizer keeping a dense inverse Hessian approximation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bfgs {
    settings: OptimizerSettings,
    verbosity: Verbosity,
}

impl Bfgs {
    pub fn new(settings: OptimizerSettings, verbosity: Verbosity) -> Self {
        Bfgs {
            settings,
            verbosity,
        }
    }

    /// Minimize `problem` from `start`.
    ///
    /// Running out of iterations or a solver that stops early is not an
    /// error: the best iterate so far is returned with the matching
    /// [`Termination`]. Errors raised by the cost itself are returned as is.
    pub fn minimize<P>(&self, problem: &P, start: Vec<f64>) -> Result<Minimum, NomogenError>
    where
        P: CostFunction<Param = Vec<f64>, Output = f64>
            + Gradient<Param = Vec<f64>, Gradient = Vec<f64>>,
    {
        let start_value = problem.cost(&start).map_err(into_nomogen)?;
        let start_norm = problem.gradient(&start).map_err(into_nomogen)?.l2_norm();
        if self.verbosity.shows(Verbosity::Progress) {
            debug!(cost = start_value, gradient_norm = start_norm, "bfgs start");
        }
        if start_norm <= self.settings.gradient_tolerance {
            return Ok(self.finish(start, start_value, start_norm, 0, Termination::Converged));
        }

        let dimension = start.len();
        let budget = self.settings.iteration_budget(dimension) as u64;
        let solver = BFGS::new(MoreThuenteLineSearch::new())
            .with_tolerance_grad(self.settings.gradient_tolerance)
            .map_err(into_nomogen)?;
        let inverse_hessian = identity(dimension);

        let best = Arc::new(Mutex::new(BestIterate {
            x: start.clone(),
            value: start_value,
            iterations: 0,
        }));
        let observer = Progress {
            best: Arc::clone(&best),
            verbosity: self.verbosity,
        };

        let run = Executor::new(Borrowed(problem), solver)
            .configure(|state| {
                state
                    .param(start.clone())
                    .inv_hessian(inverse_hessian)
                    .max_iters(budget)
            })
            .add_observer(observer, ObserverMode::Always)
            .run();

        let (x, value, iterations, termination) = match run {
            Ok(result) => {
                let state = &result.state;
                let termination = match state.get_termination_status() {
                    TerminationStatus::Terminated(TerminationReason::SolverConverged) => {
                        Termination::Converged
                    }
                    TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
                        Termination::IterationLimit
                    }
                    _ => Termination::Stalled,
                };
                let x = state.get_best_param().cloned().unwrap_or(start);
                let value = state.get_best_cost().min(start_value);
                (x, value, state.get_iter() as usize, termination)
            }
            Err(err) => {
                let err = into_nomogen(err);
                if !matches!(err, NomogenError::Optimizer { .. }) {
                    return Err(err);
                }
                if self.verbosity.shows(Verbosity::Progress) {
                    debug!(%err, "bfgs stopped early");
                }
                let best = match best.lock() {
                    Ok(best) => best.clone(),
                    Err(poisoned) => poisoned.into_inner().clone(),
                };
                (best.x, best.value, best.iterations, Termination::Stalled)
            }
        };

        let gradient_norm = problem.gradient(&x).map_err(into_nomogen)?.l2_norm();
        let termination = if gradient_norm <= self.settings.gradient_tolerance {
            Termination::Converged
        } else {
            termination
        };
        Ok(self.finish(x, value, gradient_norm, iterations, termination))
    }

    fn finish(
        &self,
        x: Vec<f64>,
        value: f64,
        gradient_norm: f64,
        iterations: usize,
        termination: Termination,
    ) -> Minimum {
        if self.verbosity.shows(Verbosity::Progress) {
            debug!(iterations, cost = value, gradient_norm, ?termination, "bfgs finished");
        }
        Minimum {
            x,
            value,
            gradient_norm,
            iterations,
            termination,
        }
    }
}

fn identity(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

/// Lets the executor own a reference to a problem the caller keeps
struct Borrowed<'a, P>(&'a P);

impl<P: CostFunction> CostFunction for Borrowed<'_, P> {
    type Param = P::Param;
    type Output = P::Output;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, Error> {
        self.0.cost(param)
    }
}

impl<P: Gradient> Gradient for Borrowed<'_, P> {
    type Param = P::Param;
    type Gradient = P::Gradient;

    fn gradient(&self, param: &Self::Param) -> Result<Self::Gradient, Error> {
        self.0.gradient(param)
    }
}

#[derive(Debug, Clone)]
struct BestIterate {
    x: Vec<f64>,
    value: f64,
    iterations: usize,
}

/// Keeps the best iterate for runs that end in a solver error and emits
/// periodic progress events
struct Progress {
    best: Arc<Mutex<BestIterate>>,
    verbosity: Verbosity,
}

impl<I> Observe<I> for Progress
where
    I: State<Param = Vec<f64>, Float = f64>,
{
    fn observe_iter(&mut self, state: &I, _kv: &KV) -> Result<(), Error> {
        if let (Some(x), Ok(mut best)) = (state.get_best_param(), self.best.lock()) {
            if state.get_best_cost() < best.value {
                best.x.clone_from(x);
                best.value = state.get_best_cost();
            }
            best.iterations = state.get_iter() as usize;
        }
        if self.verbosity.shows(Verbosity::Progress) && state.get_iter() % PROGRESS_EVERY == 0 {
            debug!(
                iteration = state.get_iter(),
                best = state.get_best_cost(),
                "bfgs progress"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::central_difference;
    use approx::assert_relative_eq;

    struct Rosenbrock;

    impl CostFunction for Rosenbrock {
        type Param = Vec<f64>;
        type Output = f64;

        fn cost(&self, x: &Vec<f64>) -> Result<f64, Error> {
            Ok((1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2))
        }
    }

    impl Gradient for Rosenbrock {
        type Param = Vec<f64>;
        type Gradient = Vec<f64>;

        fn gradient(&self, x: &Vec<f64>) -> Result<Vec<f64>, Error> {
            let t = x[1] - x[0] * x[0];
            Ok(vec![-2.0 * (1.0 - x[0]) - 400.0 * x[0] * t, 200.0 * t])
        }
    }

    struct Quadratic {
        scales: Vec<f64>,
    }

    impl CostFunction for Quadratic {
        type Param = Vec<f64>;
        type Output = f64;

        fn cost(&self, x: &Vec<f64>) -> Result<f64, Error> {
            Ok(x.iter()
                .zip(&self.scales)
                .map(|(xi, s)| s * (xi - 1.0).powi(2))
                .sum())
        }
    }

    impl Gradient for Quadratic {
        type Param = Vec<f64>;
        type Gradient = Vec<f64>;

        fn gradient(&self, x: &Vec<f64>) -> Result<Vec<f64>, Error> {
            let mut grad = vec![0.0; x.len()];
            central_difference(x, &mut grad, |shifted| self.cost(&shifted.to_vec()))?;
            Ok(grad)
        }
    }

    /// Fails once the first coordinate walks past 0.5
    struct Fenced;

    impl CostFunction for Fenced {
        type Param = Vec<f64>;
        type Output = f64;

        fn cost(&self, x: &Vec<f64>) -> Result<f64, Error> {
            if x[0] > 0.5 {
                return Err(NomogenError::TooFewNodes { requested: 0 }.into());
            }
            Ok((x[0] - 1.0).powi(2))
        }
    }

    impl Gradient for Fenced {
        type Param = Vec<f64>;
        type Gradient = Vec<f64>;

        fn gradient(&self, x: &Vec<f64>) -> Result<Vec<f64>, Error> {
            Ok(vec![2.0 * (x[0] - 1.0)])
        }
    }

    fn settings(max_iterations: Option<usize>) -> OptimizerSettings {
        OptimizerSettings {
            gradient_tolerance: 1e-6,
            max_iterations,
        }
    }

    #[test]
    fn finds_the_rosenbrock_valley_floor() {
        let bfgs = Bfgs::new(settings(None), Verbosity::Quiet);
        let result = bfgs.minimize(&Rosenbrock, vec![-1.2, 1.0]).unwrap();
        assert!(result.termination.converged(), "{:?}", result.termination);
        assert_relative_eq!(result.x[0], 1.0, epsilon = 1e-4);
        assert_relative_eq!(result.x[1], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn minimizes_with_numeric_gradient() {
        let problem = Quadratic {
            scales: vec![1.0, 10.0, 0.5, 3.0],
        };
        let bfgs = Bfgs::new(settings(None), Verbosity::Quiet);
        let result = bfgs.minimize(&problem, vec![0.0; 4]).unwrap();
        for xi in &result.x {
            assert_relative_eq!(*xi, 1.0, epsilon = 1e-5);
        }
        assert!(result.value < 1e-9);
    }

    #[test]
    fn exhausted_budget_still_returns_progress() {
        let bfgs = Bfgs::new(settings(Some(3)), Verbosity::Quiet);
        let start = vec![-1.2, 1.0];
        let start_value = Rosenbrock.cost(&start).unwrap();
        let result = bfgs.minimize(&Rosenbrock, start).unwrap();
        assert_eq!(result.termination, Termination::IterationLimit);
        assert!(result.iterations <= 3);
        assert!(result.value < start_value);
    }

    #[test]
    fn already_optimal_start_converges_immediately() {
        let bfgs = Bfgs::new(settings(None), Verbosity::Quiet);
        let result = bfgs.minimize(&Rosenbrock, vec![1.0, 1.0]).unwrap();
        assert_eq!(result.termination, Termination::Converged);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.value, 0.0);
    }

    #[test]
    fn cost_errors_abort_the_run() {
        let bfgs = Bfgs::new(settings(None), Verbosity::Quiet);
        let err = bfgs.minimize(&Fenced, vec![0.0]).unwrap_err();
        assert_eq!(err, NomogenError::TooFewNodes { requested: 0 });
    }
}
