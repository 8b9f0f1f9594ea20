mod oracle;
mod reducer;
mod sampler;
mod schedule;

pub use oracle::{GradientOracle, TwoSidedGradient};
pub use reducer::{ReductionError, ScenarioReducer};
pub use sampler::{PointSampler, Sampler, SamplerError};
pub use schedule::StepSchedule;
