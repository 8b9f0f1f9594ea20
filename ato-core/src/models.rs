mod pwl;
mod scenario;
mod tree;

pub use pwl::{PiecewiseLinear, PiecewiseLinearDto, PiecewiseLinearError};
pub use scenario::{MASS_TOLERANCE, ScenarioSet, ScenarioSetDto, ScenarioSetError};
pub use tree::{ScenarioNode, ScenarioTree, TreeError};
