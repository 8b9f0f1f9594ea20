use crate::models::{ScenarioSet, ScenarioSetError};

/// Interface for scenario reduction strategies.
///
/// A reducer owns (or borrows) an initial set of N scenarios and, for a
/// requested cardinality `n <= N`, produces a fresh set of `n`
/// representatives whose probability vector again sums to 1: the mass of
/// every discarded scenario is redistributed among the survivors.
///
/// Implementations may vary in the metric and the selection order; all of
/// them must conserve probability mass.
pub trait ScenarioReducer {
    /// Reduces the initial scenario set to `n_scenarios` representatives.
    ///
    /// # Returns
    ///
    /// A scenario set with exactly `n_scenarios` columns and a probability
    /// vector summing to 1.
    ///
    /// # Errors
    ///
    /// Fails when the requested cardinality is unsupported by the strategy
    /// or exceeds the initial set, or when mass conservation is violated.
    /// The latter indicates a logic error and is never silently repaired.
    fn reduce(&self, n_scenarios: usize) -> Result<ScenarioSet, ReductionError>;
}

/// The various ways in which a scenario reduction can fail
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ReductionError {
    /// Error when the requested cardinality is outside what the strategy supports
    #[error("cannot reduce to {requested} representatives ({available} available)")]
    InvalidTarget {
        /// The requested reduced cardinality
        requested: usize,
        /// The cardinality of the initial set
        available: usize,
    },
    /// Error when the redistributed probabilities fail to sum to 1
    #[error("reduced probabilities must sum to one, got {total}")]
    MassNotConserved {
        /// The actual probability total
        total: f64,
    },
    /// Error constructing the reduced scenario set
    #[error(transparent)]
    Set(#[from] ScenarioSetError),
}
