/// Interface for iteration-indexed schedules.
///
/// Step-size and smoothing schedules map an iteration index to a scalar.
/// The approximation engines treat them as opaque; for a step-size schedule
/// the values must lie in `[0, 1]`, which the engines check at every
/// iteration before using the value.
///
/// Any `Fn(usize) -> f64` closure is a schedule, so callers typically write
/// `|i| 20.0 / (20.0 + i as f64)` or similar.
pub trait StepSchedule {
    /// The schedule value at the given iteration index
    fn value(&self, iteration: usize) -> f64;
}

impl<F: Fn(usize) -> f64> StepSchedule for F {
    fn value(&self, iteration: usize) -> f64 {
        self(iteration)
    }
}
