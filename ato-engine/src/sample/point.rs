use ato_core::ports::{PointSampler, SamplerError};
use rand::{Rng, RngCore};

/// Uniform random-point generator over an axis-aligned box.
///
/// Feeds the multidimensional value-function approximation with candidate
/// evaluation points, one independent uniform draw per coordinate.
#[derive(Debug)]
pub struct UniformBox {
    low: Vec<f64>,
    high: Vec<f64>,
}

impl UniformBox {
    /// Creates a box from per-coordinate bounds
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> Result<Self, SamplerError> {
        if low.len() != high.len() {
            return Err(SamplerError::BoundsMismatch {
                low: low.len(),
                high: high.len(),
            });
        }
        if low.is_empty() {
            return Err(SamplerError::ZeroDimension);
        }
        for (&l, &h) in low.iter().zip(high.iter()) {
            if !(l.is_finite() && h.is_finite()) || l > h {
                return Err(SamplerError::EmptyInterval { low: l, high: h });
            }
        }
        Ok(Self { low, high })
    }

    /// Creates a box spanning `[low_factor, high_factor]` times a base
    /// point, coordinate by coordinate.
    ///
    /// This is the usual way to explore the operating region around a
    /// nominal inventory or mean-demand vector.
    pub fn scaled(base: &[f64], low_factor: f64, high_factor: f64) -> Result<Self, SamplerError> {
        Self::new(
            base.iter().map(|b| b * low_factor).collect(),
            base.iter().map(|b| b * high_factor).collect(),
        )
    }
}

impl PointSampler for UniformBox {
    fn sample_point(&self, rng: &mut dyn RngCore) -> Vec<f64> {
        self.low
            .iter()
            .zip(self.high.iter())
            .map(|(&l, &h)| if l < h { rng.gen_range(l..h) } else { l })
            .collect()
    }
}
