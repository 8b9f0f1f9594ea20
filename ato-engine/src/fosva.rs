use ato_core::models::{PiecewiseLinear, PiecewiseLinearError};
use ato_core::ports::{GradientOracle, PointSampler, StepSchedule};
use rand::Rng;
use std::convert::Infallible;

/// The iteration-indexed schedules driving an approximation run.
///
/// Only the step size `alpha` enters the update arithmetic; it must map
/// every iteration into `[0, 1]`. The two smoothing schedules are carried
/// alongside it because the richer variant of the procedure threads them
/// through each iteration, but they do not affect the computation and are
/// surfaced in trace output only.
pub struct Schedules<A, P, M> {
    /// Step size per iteration, in `[0, 1]`
    pub alpha: A,
    /// Right-side smoothing value per iteration
    pub eps_plus: P,
    /// Left-side smoothing value per iteration
    pub eps_minus: M,
}

/// Learns a concave piecewise-linear approximation of a one-dimensional
/// value function from noisy one-sided subgradient samples.
///
/// Starting from the zero function, each iteration draws a point `s`
/// uniformly from `[range_low, range_high)`, queries both one-sided
/// subgradients at `s`, grows the breakpoint support with `s`, and applies
/// the one-sided blend that keeps the slope sequence non-increasing. The
/// run performs `n_iterations - 1` updates.
///
/// # Returns
///
/// The learned function; its slopes are non-increasing for any input.
///
/// # Errors
///
/// Fails when the sampling range is empty or extends below the origin, or
/// when the schedule leaves `[0, 1]`, or when a subgradient sample is not
/// finite.
pub fn fosva_1d<A, R>(
    schedule: A,
    mut grad_right: impl FnMut(f64) -> f64,
    mut grad_left: impl FnMut(f64) -> f64,
    range_low: f64,
    range_high: f64,
    n_iterations: usize,
    rng: &mut R,
) -> Result<PiecewiseLinear, FosvaError<Infallible>>
where
    A: StepSchedule,
    R: Rng + ?Sized,
{
    if !(range_low.is_finite() && range_high.is_finite()) || range_low < 0.0 || range_low >= range_high
    {
        return Err(FosvaError::InvalidRange {
            low: range_low,
            high: range_high,
        });
    }

    tracing::debug!(range_low, range_high, n_iterations, "starting 1-d run");

    let mut function = PiecewiseLinear::zero();
    for iteration in 0..n_iterations.saturating_sub(1) {
        let alpha = checked_alpha(&schedule, iteration)?;
        let s = rng.gen_range(range_low..range_high);
        let pi_p = grad_right(s);
        let pi_m = grad_left(s);
        if !(pi_p.is_finite() && pi_m.is_finite()) {
            return Err(FosvaError::NonFiniteGradient { iteration });
        }
        tracing::trace!(iteration, alpha, s, pi_p, pi_m, "1-d update");

        let pos = function.insert_breakpoint(s)?;
        function.concave_blend(pos, alpha, pi_p, pi_m);
    }
    Ok(function)
}

/// Learns one concave piecewise-linear approximation per coordinate of a
/// multivariate value function.
///
/// Each iteration draws one sample vector, makes a single joint oracle call
/// for both one-sided subgradient vectors, and then applies the
/// one-dimensional update independently to every coordinate, sharing the
/// iteration counter and step size across coordinates. Coupling between
/// coordinates only ever happens inside the oracle.
///
/// # Returns
///
/// One learned function per coordinate, in coordinate order.
///
/// # Errors
///
/// Fails when the schedule leaves `[0, 1]`, when the sampler or oracle
/// produce vectors of the wrong dimension, when a sample coordinate lies
/// below the origin, when a subgradient is not finite, or when the oracle
/// itself fails. Oracle failures are never retried.
pub fn fosva_multi<A, P, M, O, S>(
    schedules: &Schedules<A, P, M>,
    dims: usize,
    n_iterations: usize,
    oracle: &mut O,
    points: &S,
    rng: &mut dyn rand::RngCore,
) -> Result<Vec<PiecewiseLinear>, FosvaError<O::Error>>
where
    A: StepSchedule,
    P: StepSchedule,
    M: StepSchedule,
    O: GradientOracle,
    S: PointSampler,
{
    tracing::debug!(dims, n_iterations, "starting multidimensional run");

    let mut functions = vec![PiecewiseLinear::zero(); dims];
    for iteration in 0..n_iterations {
        let alpha = checked_alpha(&schedules.alpha, iteration)?;
        let eps_plus = schedules.eps_plus.value(iteration);
        let eps_minus = schedules.eps_minus.value(iteration);

        let point = points.sample_point(rng);
        if point.len() != dims {
            return Err(FosvaError::DimensionMismatch {
                expected: dims,
                found: point.len(),
            });
        }

        let gradient = oracle.evaluate(&point).map_err(FosvaError::Oracle)?;
        if gradient.right.len() != dims || gradient.left.len() != dims {
            return Err(FosvaError::DimensionMismatch {
                expected: dims,
                found: gradient.right.len().min(gradient.left.len()),
            });
        }

        tracing::trace!(iteration, alpha, eps_plus, eps_minus, "joint update");

        for (i, function) in functions.iter_mut().enumerate() {
            let s = point[i];
            let pi_p = gradient.right[i];
            let pi_m = gradient.left[i];
            if !(pi_p.is_finite() && pi_m.is_finite()) {
                return Err(FosvaError::NonFiniteGradient { iteration });
            }
            let pos = function.insert_breakpoint(s)?;
            function.concave_blend(pos, alpha, pi_p, pi_m);
        }
    }
    Ok(functions)
}

fn checked_alpha<A: StepSchedule, E: std::error::Error + 'static>(
    schedule: &A,
    iteration: usize,
) -> Result<f64, FosvaError<E>> {
    let alpha = schedule.value(iteration);
    if (0.0..=1.0).contains(&alpha) {
        Ok(alpha)
    } else {
        Err(FosvaError::StepOutOfRange {
            iteration,
            value: alpha,
        })
    }
}

/// The various ways in which an approximation run can fail
#[derive(Debug, thiserror::Error)]
pub enum FosvaError<E: std::error::Error + 'static> {
    /// Error when the sampling range is empty, non-finite, or extends below
    /// the origin
    #[error("invalid sampling range [{low}, {high})")]
    InvalidRange {
        /// Lower end of the range
        low: f64,
        /// Upper end of the range
        high: f64,
    },
    /// Error when the step-size schedule leaves `[0, 1]`
    #[error("step size {value} at iteration {iteration} is outside [0, 1]")]
    StepOutOfRange {
        /// The iteration at which the violation occurred
        iteration: usize,
        /// The offending schedule value
        value: f64,
    },
    /// Error when a sampled point or gradient vector has the wrong dimension
    #[error("expected vectors of dimension {expected}, found {found}")]
    DimensionMismatch {
        /// The configured number of coordinates
        expected: usize,
        /// The dimension actually produced
        found: usize,
    },
    /// Error when a subgradient sample is NaN or infinite
    #[error("non-finite subgradient sample at iteration {iteration}")]
    NonFiniteGradient {
        /// The iteration at which the sample was drawn
        iteration: usize,
    },
    /// Error from the gradient oracle, propagated unchanged
    #[error("gradient oracle failed: {0}")]
    Oracle(#[source] E),
    /// Error updating the piecewise-linear function
    #[error(transparent)]
    Function(#[from] PiecewiseLinearError),
}
