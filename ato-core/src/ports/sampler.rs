use crate::models::{ScenarioSet, ScenarioSetError};
use rand::RngCore;

/// Interface for demand samplers.
///
/// A sampler draws `dim × n` observation matrices from some distribution of
/// demand. Randomness always comes from an explicitly passed generator so
/// that runs are reproducible and testable; samplers themselves hold only
/// distribution parameters.
pub trait Sampler {
    /// The number of components of each sampled observation
    fn dim(&self) -> usize;

    /// Draws `n_scenarios` observations, one column each, with uniform
    /// probability over the columns.
    fn sample(
        &self,
        n_scenarios: usize,
        rng: &mut dyn RngCore,
    ) -> Result<ScenarioSet, SamplerError>;

    /// Draws observations with a seasonal adjustment applied to the
    /// underlying distribution: `shift` is added to the location and
    /// `scale` multiplies both location and spread.
    ///
    /// Not every distribution admits a seasonal adjustment; the default
    /// implementation reports the capability as unsupported.
    fn sample_seasonal(
        &self,
        shift: f64,
        scale: f64,
        n_scenarios: usize,
        rng: &mut dyn RngCore,
    ) -> Result<ScenarioSet, SamplerError> {
        let _ = (shift, scale, n_scenarios, rng);
        Err(SamplerError::SeasonalityUnsupported)
    }

    /// Estimates the mean observation from a fresh sample of `n_scenarios`
    /// draws.
    fn mean_estimate(
        &self,
        n_scenarios: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<f64>, SamplerError> {
        Ok(self.sample(n_scenarios, rng)?.column_mean())
    }
}

/// The various ways in which configuring a sampler or sampling can fail
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SamplerError {
    /// Error when a seasonal adjustment is requested from a distribution
    /// that does not support one
    #[error("seasonal adjustment not available in this sampler")]
    SeasonalityUnsupported,
    /// Error when zero scenarios are requested
    #[error("at least one scenario must be requested")]
    EmptySample,
    /// Error when the observation dimension is zero
    #[error("observation dimension must be positive")]
    ZeroDimension,
    /// Error when a spread parameter is not positive and finite
    #[error("spread must be positive and finite")]
    NonPositiveSpread,
    /// Error when a mixture weight lies outside `[0, 1]`
    #[error("mixture weight {weight} is outside [0, 1]")]
    InvalidWeight {
        /// The offending weight
        weight: f64,
    },
    /// Error when an interval has its lower end above its upper end
    #[error("empty interval [{low}, {high}]")]
    EmptyInterval {
        /// Lower end of the interval
        low: f64,
        /// Upper end of the interval
        high: f64,
    },
    /// Error when paired bound vectors differ in length
    #[error("bound vectors differ in length: {low} vs {high}")]
    BoundsMismatch {
        /// Length of the lower-bound vector
        low: usize,
        /// Length of the upper-bound vector
        high: usize,
    },
    /// Error when an additive seasonality cycle does not sum to zero
    #[error("additive seasonality must sum to 0, got {total}")]
    SeasonNotCentered {
        /// The actual cycle total
        total: f64,
    },
    /// Error when a multiplicative seasonality cycle does not average to one
    #[error("multiplicative seasonality must average to 1, got mean {mean}")]
    SeasonNotNormalized {
        /// The actual cycle mean
        mean: f64,
    },
    /// Error constructing the sampled scenario set
    #[error(transparent)]
    Set(#[from] ScenarioSetError),
}

/// Interface for the random-point generators feeding the multidimensional
/// value-function approximation.
///
/// One vector sample per call, drawn from whatever distribution the caller
/// deems representative of the operating region.
pub trait PointSampler {
    /// Draws one sample point
    fn sample_point(&self, rng: &mut dyn RngCore) -> Vec<f64>;
}

impl<F: Fn(&mut dyn RngCore) -> Vec<f64>> PointSampler for F {
    fn sample_point(&self, rng: &mut dyn RngCore) -> Vec<f64> {
        self(rng)
    }
}
