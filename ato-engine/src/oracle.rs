use ato_core::ports::{GradientOracle, TwoSidedGradient};

/// Two-sided subgradient estimation by finite differences.
///
/// Wraps an arbitrary objective evaluation (typically the optimal value of
/// an external two-stage model as a function of the inventory vector) and
/// probes it one coordinate at a time around the nominal point: the right
/// slope is `(f(x + h) - f(x)) / h` and the left slope is
/// `(f(x) - f(x - h)) / h`.
///
/// Each oracle call costs `2 * dim + 1` objective evaluations. Objective
/// failures propagate unchanged.
pub struct FiniteDifference<F> {
    objective: F,
    step: f64,
}

impl<F> FiniteDifference<F> {
    /// Creates an oracle with the given probe step.
    ///
    /// Returns `None` when the step is not positive and finite.
    pub fn new(objective: F, step: f64) -> Option<Self> {
        (step.is_finite() && step > 0.0).then(|| Self { objective, step })
    }
}

impl<F, E> GradientOracle for FiniteDifference<F>
where
    F: FnMut(&[f64]) -> Result<f64, E>,
    E: std::error::Error + 'static,
{
    type Error = E;

    fn evaluate(&mut self, point: &[f64]) -> Result<TwoSidedGradient, Self::Error> {
        let nominal = (self.objective)(point)?;

        let mut probe = point.to_vec();
        let mut right = Vec::with_capacity(point.len());
        let mut left = Vec::with_capacity(point.len());
        for i in 0..point.len() {
            probe[i] += self.step;
            right.push(((self.objective)(&probe)? - nominal) / self.step);
            // one step back to nominal, one more for the left probe
            probe[i] -= 2.0 * self.step;
            left.push((nominal - (self.objective)(&probe)?) / self.step);
            probe[i] = point[i];
        }

        Ok(TwoSidedGradient { right, left })
    }
}
