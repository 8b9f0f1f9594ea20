use ato_core::models::ScenarioSet;
use ato_core::ports::{Sampler, SamplerError};
use rand::RngCore;
use rand::seq::SliceRandom;
use rand_distr::{Binomial, Distribution, Normal};

/// Normally distributed independent demand sampler.
///
/// Every component of an observation is drawn from the same `N(mu, sigma)`
/// and clipped to `[low, high]`, which keeps demand realizations inside the
/// physically meaningful range.
#[derive(Debug)]
pub struct GaussianSampler {
    dim: usize,
    mu: f64,
    sigma: f64,
    low: f64,
    high: f64,
}

impl GaussianSampler {
    /// Creates a sampler, validating the distribution parameters
    pub fn new(dim: usize, mu: f64, sigma: f64, low: f64, high: f64) -> Result<Self, SamplerError> {
        if dim == 0 {
            return Err(SamplerError::ZeroDimension);
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(SamplerError::NonPositiveSpread);
        }
        if low > high {
            return Err(SamplerError::EmptyInterval { low, high });
        }
        Ok(Self {
            dim,
            mu,
            sigma,
            low,
            high,
        })
    }

    fn draw_columns(
        &self,
        shift: f64,
        scale: f64,
        n_scenarios: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<f64>, SamplerError> {
        if n_scenarios == 0 {
            return Err(SamplerError::EmptySample);
        }
        let normal = Normal::new(self.mu * scale + shift, self.sigma * scale)
            .map_err(|_| SamplerError::NonPositiveSpread)?;
        let mut data = Vec::with_capacity(self.dim * n_scenarios);
        for _ in 0..self.dim * n_scenarios {
            data.push(normal.sample(&mut *rng).clamp(self.low, self.high));
        }
        Ok(data)
    }
}

impl Sampler for GaussianSampler {
    fn dim(&self) -> usize {
        self.dim
    }

    fn sample(
        &self,
        n_scenarios: usize,
        rng: &mut dyn RngCore,
    ) -> Result<ScenarioSet, SamplerError> {
        let data = self.draw_columns(0.0, 1.0, n_scenarios, rng)?;
        Ok(ScenarioSet::uniform(self.dim, data)?)
    }

    /// The seasonal adjustment shifts the location and scales both location
    /// and spread; the clipping interval is left untouched.
    fn sample_seasonal(
        &self,
        shift: f64,
        scale: f64,
        n_scenarios: usize,
        rng: &mut dyn RngCore,
    ) -> Result<ScenarioSet, SamplerError> {
        let data = self.draw_columns(shift, scale, n_scenarios, rng)?;
        Ok(ScenarioSet::uniform(self.dim, data)?)
    }
}

/// Bimodal demand sampler: a two-component Gaussian mixture.
///
/// The number of observations taken from the first mode is binomially
/// distributed with weight `p`, the remainder comes from the second mode,
/// and the assembled columns are shuffled so the modes do not arrive in
/// blocks.
#[derive(Debug)]
pub struct BiGaussianSampler {
    first: GaussianSampler,
    second: GaussianSampler,
    p: f64,
}

impl BiGaussianSampler {
    /// Creates a mixture sampler, validating both `(mu, sigma)` modes and
    /// the weight of the first mode
    pub fn new(
        dim: usize,
        mode1: (f64, f64),
        mode2: (f64, f64),
        p: f64,
        low: f64,
        high: f64,
    ) -> Result<Self, SamplerError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(SamplerError::InvalidWeight { weight: p });
        }
        Ok(Self {
            first: GaussianSampler::new(dim, mode1.0, mode1.1, low, high)?,
            second: GaussianSampler::new(dim, mode2.0, mode2.1, low, high)?,
            p,
        })
    }

    fn draw_mixture(
        &self,
        shift: f64,
        scale: f64,
        n_scenarios: usize,
        rng: &mut dyn RngCore,
    ) -> Result<ScenarioSet, SamplerError> {
        if n_scenarios == 0 {
            return Err(SamplerError::EmptySample);
        }
        let binomial = Binomial::new(n_scenarios as u64, self.p)
            .map_err(|_| SamplerError::InvalidWeight { weight: self.p })?;
        let n_first = binomial.sample(&mut *rng) as usize;

        let dim = self.first.dim;
        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(n_scenarios);
        if n_first > 0 {
            let data = self.first.draw_columns(shift, scale, n_first, rng)?;
            columns.extend(data.chunks_exact(dim).map(|c| c.to_vec()));
        }
        if n_scenarios - n_first > 0 {
            let data = self
                .second
                .draw_columns(shift, scale, n_scenarios - n_first, rng)?;
            columns.extend(data.chunks_exact(dim).map(|c| c.to_vec()));
        }
        // Without this the low-mean observations would all arrive after the
        // high-mean ones.
        columns.shuffle(&mut *rng);

        Ok(ScenarioSet::uniform(dim, columns.concat())?)
    }
}

impl Sampler for BiGaussianSampler {
    fn dim(&self) -> usize {
        self.first.dim
    }

    fn sample(
        &self,
        n_scenarios: usize,
        rng: &mut dyn RngCore,
    ) -> Result<ScenarioSet, SamplerError> {
        self.draw_mixture(0.0, 1.0, n_scenarios, rng)
    }

    fn sample_seasonal(
        &self,
        shift: f64,
        scale: f64,
        n_scenarios: usize,
        rng: &mut dyn RngCore,
    ) -> Result<ScenarioSet, SamplerError> {
        self.draw_mixture(shift, scale, n_scenarios, rng)
    }
}
