use ato_core::models::ScenarioSet;
use ato_core::ports::{ReductionError, ScenarioReducer};

/// Scenario reduction by collapse to the mean.
///
/// When a single representative is requested, the distance-based selection
/// degenerates: the minimizer of the mean squared distance to one point is
/// the arithmetic mean of the sample. This reducer produces that collapse
/// directly, sidestepping the O(N²) distance matrix, and is the one to use
/// for unit branching factors in a scenario tree.
#[derive(Debug)]
pub struct MeanReducer<'a> {
    initial: &'a ScenarioSet,
}

impl<'a> MeanReducer<'a> {
    /// Creates a reducer borrowing the initial scenario set
    pub fn new(initial: &'a ScenarioSet) -> Self {
        Self { initial }
    }
}

impl ScenarioReducer for MeanReducer<'_> {
    fn reduce(&self, n_scenarios: usize) -> Result<ScenarioSet, ReductionError> {
        if n_scenarios != 1 {
            return Err(ReductionError::InvalidTarget {
                requested: n_scenarios,
                available: 1,
            });
        }
        let mean = self.initial.column_mean();
        Ok(ScenarioSet::weighted(self.initial.dim(), mean, vec![1.0])?)
    }
}
