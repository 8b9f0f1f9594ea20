use ato_core::models::{MASS_TOLERANCE, ScenarioSet};
use ato_core::ports::{ReductionError, ScenarioReducer};

/// Scenario reduction by Fast Forward selection under a 2-norm metric.
///
/// Representatives are selected greedily: each round picks the scenario
/// that minimizes the probability-weighted distance from all scenarios not
/// yet represented, then the mass of every discarded scenario is moved in
/// full to its nearest representative.
///
/// Fast Forward is preferred for `n < N/4`, where `n` is the reduced
/// cardinality and `N` the original one. For the collapse to a single
/// representative see [`MeanReducer`](super::MeanReducer), which avoids the
/// O(N²) distance work.
#[derive(Debug)]
pub struct FastForwardReducer<'a> {
    initial: &'a ScenarioSet,
}

impl<'a> FastForwardReducer<'a> {
    /// Creates a reducer borrowing the initial scenario set
    pub fn new(initial: &'a ScenarioSet) -> Self {
        Self { initial }
    }

    /// The full pairwise distance matrix between columns, row-major N × N.
    /// Symmetric with a zero diagonal.
    fn distance_matrix(&self) -> Vec<f64> {
        let n = self.initial.n_scenarios();
        let mut dist = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = self.initial.distance(i, j);
                dist[i * n + j] = d;
                dist[j * n + i] = d;
            }
        }
        dist
    }
}

/// Index of the smallest non-NaN entry, first on ties.
fn nanargmin(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, z)| !z.is_nan())
        .fold(None, |best, (i, &z)| match best {
            Some((_, lowest)) if lowest <= z => best,
            _ => Some((i, z)),
        })
        .map(|(i, _)| i)
}

impl ScenarioReducer for FastForwardReducer<'_> {
    fn reduce(&self, n_scenarios: usize) -> Result<ScenarioSet, ReductionError> {
        let n_initial = self.initial.n_scenarios();
        if n_scenarios == 0 || n_scenarios > n_initial {
            return Err(ReductionError::InvalidTarget {
                requested: n_scenarios,
                available: n_initial,
            });
        }

        let dist = self.distance_matrix();
        let probs = self.initial.probabilities();

        // Greedy forward selection. The working mass vector zeroes every
        // already-selected scenario, and the score of a candidate u is the
        // remaining mass-weighted distance to u with u's own mass zeroed as
        // well. Selected indices are marked NaN so the argmin skips them.
        let mut selected: Vec<usize> = Vec::with_capacity(n_scenarios);
        let mut working = probs.to_vec();
        let mut zeta = vec![0.0; n_initial];
        for _ in 0..n_scenarios {
            for u in 0..n_initial {
                zeta[u] = if selected.contains(&u) {
                    f64::NAN
                } else {
                    let own = working[u];
                    working[u] = 0.0;
                    let score = working
                        .iter()
                        .zip(dist[u * n_initial..(u + 1) * n_initial].iter())
                        .map(|(p, d)| p * d)
                        .sum();
                    working[u] = own;
                    score
                };
            }
            // The filter leaves at least one candidate while selected.len() < n <= N
            let chosen = nanargmin(&zeta).expect("candidate set is never empty");
            tracing::trace!(chosen, "fast forward selection");
            working[chosen] = 0.0;
            selected.push(chosen);
        }

        // Every discarded scenario hands its whole mass to the nearest
        // representative; ties go to the earliest-selected one.
        let mut reduced_probs: Vec<f64> = selected.iter().map(|&u| probs[u]).collect();
        for v in 0..n_initial {
            if selected.contains(&v) {
                continue;
            }
            let distances: Vec<f64> = selected.iter().map(|&u| dist[v * n_initial + u]).collect();
            let closest = nanargmin(&distances).expect("representative set is never empty");
            reduced_probs[closest] += probs[v];
        }

        let total: f64 = reduced_probs.iter().sum();
        if (total - 1.0).abs() > MASS_TOLERANCE {
            return Err(ReductionError::MassNotConserved { total });
        }

        tracing::debug!(
            n_initial,
            n_reduced = n_scenarios,
            "fast forward reduction complete"
        );

        let dim = self.initial.dim();
        let mut data = Vec::with_capacity(dim * n_scenarios);
        for &u in selected.iter() {
            data.extend_from_slice(self.initial.column(u));
        }
        Ok(ScenarioSet::weighted(dim, data, reduced_probs)?)
    }
}
