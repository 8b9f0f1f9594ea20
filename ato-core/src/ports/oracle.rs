/// A pair of one-sided subgradient estimates at a candidate point, one slot
/// per coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct TwoSidedGradient {
    /// The right-derivative estimate of each coordinate
    pub right: Vec<f64>,
    /// The left-derivative estimate of each coordinate
    pub left: Vec<f64>,
}

/// Interface for two-sided subgradient oracles.
///
/// The value-function approximation engine queries an oracle once per
/// iteration at a sampled point and blends the returned slopes into its
/// piecewise-linear estimate. The reference oracle evaluates an external
/// optimization model around the point via finite differences; such an
/// evaluation is expensive and possibly stateful, hence `&mut self`.
///
/// Oracle failures are fatal for the run: a corrupted sample would silently
/// bias the learned approximation, so the engine never retries.
pub trait GradientOracle {
    /// Error type for oracle failures
    type Error: std::error::Error + 'static;

    /// Estimates both one-sided subgradients at `point`.
    ///
    /// The returned vectors must have one entry per coordinate of `point`.
    fn evaluate(&mut self, point: &[f64]) -> Result<TwoSidedGradient, Self::Error>;
}
