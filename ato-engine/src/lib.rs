#![warn(missing_docs)]
//! Numerical engines for decision-making under demand uncertainty: an online
//! stochastic-approximation procedure that learns concave piecewise-linear
//! value functions from noisy one-sided subgradient samples, and the
//! distance-based scenario reduction it shares a toolbox with.
//!
//! Everything here is a purely sequential, CPU-bound procedure working
//! against the models and ports of [`ato_core`]. The external optimization
//! models that consume the artifacts (and the solvers behind them) are out
//! of scope; they appear only through the [`ato_core::ports`] traits.

/// Value-function approximation engines (one- and multi-dimensional)
pub mod fosva;

/// Gradient oracles for the approximation engines
pub mod oracle;

/// Scenario reduction implementations
pub mod reduce;

/// Demand samplers and random-point generators
pub mod sample;

pub use fosva::{FosvaError, Schedules, fosva_1d, fosva_multi};
pub use oracle::FiniteDifference;
pub use reduce::{FastForwardReducer, MeanReducer};
pub use sample::{BiGaussianSampler, GaussianSampler, SeasonalSampler, UniformBox};
