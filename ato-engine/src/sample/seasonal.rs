use ato_core::models::ScenarioSet;
use ato_core::ports::{Sampler, SamplerError};
use rand::RngCore;

/// Multi-stage demand sampler with seasonality.
///
/// Adapts a single-period sampler to a planning horizon: each requested
/// column is one stage, and the additive/multiplicative cycles are applied
/// to the inner distribution position-by-position, repeating over the
/// horizon. A cycle of length 1 means the effect is absent.
///
/// The cycles are normalized so that seasonality does not change the
/// expected value: the additive cycle must sum to 0 and the multiplicative
/// cycle must average to 1, otherwise an equivalent formulation with a
/// different expected value would exist. Although not recommended, the two
/// effects can be mixed.
#[derive(Debug)]
pub struct SeasonalSampler<S> {
    inner: S,
    additive: Vec<f64>,
    multiplicative: Vec<f64>,
}

impl<S: Sampler> SeasonalSampler<S> {
    /// Creates a seasonal wrapper, validating both cycles.
    ///
    /// Use `vec![0.0]` and `vec![1.0]` for an absent additive or
    /// multiplicative effect respectively.
    pub fn new(
        inner: S,
        additive: Vec<f64>,
        multiplicative: Vec<f64>,
    ) -> Result<Self, SamplerError> {
        if additive.is_empty() || multiplicative.is_empty() {
            return Err(SamplerError::EmptySample);
        }
        let total: f64 = additive.iter().sum();
        if total.abs() > 1e-6 {
            return Err(SamplerError::SeasonNotCentered { total });
        }
        let mean: f64 = multiplicative.iter().sum::<f64>() / multiplicative.len() as f64;
        if (mean - 1.0).abs() > 1e-6 {
            return Err(SamplerError::SeasonNotNormalized { mean });
        }
        Ok(Self {
            inner,
            additive,
            multiplicative,
        })
    }

    fn is_flat(&self) -> bool {
        self.additive.len() == 1 && self.multiplicative.len() == 1
    }
}

impl<S: Sampler> Sampler for SeasonalSampler<S> {
    fn dim(&self) -> usize {
        self.inner.dim()
    }

    /// One column per stage of the horizon; `n_scenarios` plays the role of
    /// the horizon length here.
    fn sample(
        &self,
        n_scenarios: usize,
        rng: &mut dyn RngCore,
    ) -> Result<ScenarioSet, SamplerError> {
        if n_scenarios == 0 {
            return Err(SamplerError::EmptySample);
        }
        if self.is_flat() {
            return self.inner.sample(n_scenarios, rng);
        }

        let dim = self.inner.dim();
        let mut data = Vec::with_capacity(dim * n_scenarios);
        for stage in 0..n_scenarios {
            let shift = self.additive[stage % self.additive.len()];
            let scale = self.multiplicative[stage % self.multiplicative.len()];
            let column = self.inner.sample_seasonal(shift, scale, 1, rng)?;
            data.extend_from_slice(column.column(0));
        }
        Ok(ScenarioSet::uniform(dim, data)?)
    }
}
