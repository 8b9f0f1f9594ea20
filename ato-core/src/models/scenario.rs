/// An empirical set of scenarios with probability mass.
///
/// The observations form a `dim × n_scenarios` matrix, stored column-major:
/// each column is one scenario (e.g. a demand realization across items), and
/// the matching probability vector sums to 1. Scenario sets are read-only
/// inputs to the reduction algorithms, which produce fresh, smaller sets
/// with redistributed mass.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "ScenarioSetDto", into = "ScenarioSetDto")
)]
pub struct ScenarioSet {
    dim: usize,
    data: Vec<f64>,
    probabilities: Vec<f64>,
}

/// Probability vectors are accepted when they sum to 1 within this tolerance.
pub const MASS_TOLERANCE: f64 = 1e-2;

impl ScenarioSet {
    /// Creates a set with the discrete uniform distribution over its columns.
    ///
    /// `data` is read column-major: the first `dim` values form the first
    /// scenario, and so on. This is the usual starting point for an
    /// empirical sample where every observation carries mass `1/N`.
    pub fn uniform(dim: usize, data: Vec<f64>) -> Result<Self, ScenarioSetError> {
        if dim == 0 || data.is_empty() || data.len() % dim != 0 {
            return Err(ScenarioSetError::BadShape {
                dim,
                len: data.len(),
            });
        }
        let n = data.len() / dim;
        Self::weighted(dim, data, vec![1.0 / n as f64; n])
    }

    /// Creates a set with an explicit probability vector, validating all constraints
    pub fn weighted(
        dim: usize,
        data: Vec<f64>,
        probabilities: Vec<f64>,
    ) -> Result<Self, ScenarioSetError> {
        Self::try_from(ScenarioSetDto {
            dim,
            data,
            probabilities,
        })
    }

    /// The number of components in each observation
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The number of scenarios (columns)
    pub fn n_scenarios(&self) -> usize {
        self.probabilities.len()
    }

    /// The probability vector, one entry per column, summing to 1
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// The observation vector of column `j`
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.n_scenarios()`.
    pub fn column(&self, j: usize) -> &[f64] {
        &self.data[j * self.dim..(j + 1) * self.dim]
    }

    /// Iterates over the columns in order
    pub fn columns(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.dim)
    }

    /// The arithmetic mean of the columns, ignoring the probability weights.
    ///
    /// This is the collapse point used when a reduction to a single
    /// representative is requested on uniformly weighted data.
    pub fn column_mean(&self) -> Vec<f64> {
        let n = self.n_scenarios() as f64;
        let mut mean = vec![0.0; self.dim];
        for column in self.columns() {
            for (m, x) in mean.iter_mut().zip(column.iter()) {
                *m += x;
            }
        }
        for m in mean.iter_mut() {
            *m /= n;
        }
        mean
    }

    /// The Euclidean distance between columns `i` and `j`
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.column(i)
            .iter()
            .zip(self.column(j).iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

/// DTO to ensure that we always validate when we deserialize from an untrusted source
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug)]
pub struct ScenarioSetDto {
    /// Number of components per observation
    pub dim: usize,
    /// Column-major observation data, `dim * n_scenarios` values
    pub data: Vec<f64>,
    /// One probability per column
    pub probabilities: Vec<f64>,
}

impl From<ScenarioSet> for ScenarioSetDto {
    fn from(value: ScenarioSet) -> Self {
        Self {
            dim: value.dim,
            data: value.data,
            probabilities: value.probabilities,
        }
    }
}

impl TryFrom<ScenarioSetDto> for ScenarioSet {
    type Error = ScenarioSetError;

    fn try_from(value: ScenarioSetDto) -> Result<Self, Self::Error> {
        let ScenarioSetDto {
            dim,
            data,
            probabilities,
        } = value;

        if dim == 0 || data.is_empty() || data.len() % dim != 0 {
            return Err(ScenarioSetError::BadShape {
                dim,
                len: data.len(),
            });
        }
        if probabilities.len() != data.len() / dim {
            return Err(ScenarioSetError::ProbabilityLength {
                expected: data.len() / dim,
                found: probabilities.len(),
            });
        }
        if data.iter().any(|x| !x.is_finite()) {
            return Err(ScenarioSetError::NonFinite);
        }
        if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(ScenarioSetError::NegativeMass);
        }

        let total: f64 = probabilities.iter().sum();
        if (total - 1.0).abs() > MASS_TOLERANCE {
            return Err(ScenarioSetError::MassNotConserved { total });
        }

        Ok(Self {
            dim,
            data,
            probabilities,
        })
    }
}

/// The various ways in which a scenario set can be invalid
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ScenarioSetError {
    /// Error when the data length is not a positive multiple of the dimension
    #[error("data of length {len} does not form columns of dimension {dim}")]
    BadShape {
        /// The declared observation dimension
        dim: usize,
        /// The provided data length
        len: usize,
    },
    /// Error when the probability vector does not match the column count
    #[error("expected {expected} probabilities, found {found}")]
    ProbabilityLength {
        /// Number of columns in the data
        expected: usize,
        /// Number of probabilities provided
        found: usize,
    },
    /// Error when any observation value is NaN or infinite
    #[error("observations must be finite")]
    NonFinite,
    /// Error when a probability is negative, NaN or infinite
    #[error("probabilities must be finite and non-negative")]
    NegativeMass,
    /// Error when the probability vector does not sum to 1
    #[error("probabilities must sum to one, got {total}")]
    MassNotConserved {
        /// The actual probability total
        total: f64,
    },
}
