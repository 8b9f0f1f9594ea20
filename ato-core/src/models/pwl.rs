/// A representation of a concave, piecewise-linear value function
///
/// Value function approximations are the artifact produced by the stochastic
/// subgradient engines and consumed by downstream model builders as a concave
/// objective term. They must be:
/// - Piecewise-linear (defined by a sequence of breakpoints and slopes)
/// - Anchored at the origin (the first breakpoint is fixed at 0)
/// - Concave (slope non-increasing as the breakpoint index increases)
///
/// Breakpoints only ever grow in number; no operation on this type removes
/// one. Downstream consumers rely on the slope ordering to linearize a
/// concave maximization term with ordinary linear constraints.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "PiecewiseLinearDto", into = "PiecewiseLinearDto")
)]
pub struct PiecewiseLinear {
    breakpoints: Vec<f64>,
    slopes: Vec<f64>,
}

impl PiecewiseLinear {
    /// Creates a new function from breakpoints and slopes, validating all constraints
    pub fn new(breakpoints: Vec<f64>, slopes: Vec<f64>) -> Result<Self, PiecewiseLinearError> {
        let dto = PiecewiseLinearDto {
            breakpoints,
            slopes,
        };
        Self::try_from(dto)
    }

    /// The zero function: a single breakpoint at the origin with slope 0.
    ///
    /// This is the canonical starting point for a value-function
    /// approximation run.
    pub fn zero() -> Self {
        Self {
            breakpoints: vec![0.0],
            slopes: vec![0.0],
        }
    }

    /// Creates a new function without validating the data
    ///
    /// # Safety
    ///
    /// This function bypasses all validation checks. The caller must
    /// guarantee that the data satisfies all requirements validated by
    /// [`PiecewiseLinear::new`]. Invalid data can lead to incorrect behavior
    /// in downstream systems, particularly in model builders that assume a
    /// concave function.
    pub unsafe fn new_unchecked(breakpoints: Vec<f64>, slopes: Vec<f64>) -> Self {
        Self {
            breakpoints,
            slopes,
        }
    }

    /// The breakpoint sequence, strictly increasing and starting at 0
    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    /// The slope sequence, non-increasing, one entry per breakpoint
    pub fn slopes(&self) -> &[f64] {
        &self.slopes
    }

    /// The number of breakpoints (equal to the number of slopes)
    pub fn n_breakpoints(&self) -> usize {
        self.breakpoints.len()
    }

    /// Evaluates the function at `x`.
    ///
    /// The segment containing `x` is the one whose breakpoint is the largest
    /// breakpoint not exceeding `x`; its intercept is derived by enforcing
    /// continuity at every breakpoint up to that segment. Points left of the
    /// origin are evaluated on the continuous extension of the first segment.
    pub fn evaluate(&self, x: f64) -> f64 {
        let mut slope = self.slopes[0];
        let mut intercept = 0.0;
        for i in 1..self.breakpoints.len() {
            if self.breakpoints[i] > x {
                break;
            }
            intercept += (self.slopes[i - 1] - self.slopes[i]) * self.breakpoints[i];
            slope = self.slopes[i];
        }
        slope * x + intercept
    }

    /// Evaluates the function at each of the provided points
    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }

    /// Inserts `s` as a breakpoint, preserving the function shape exactly.
    ///
    /// If `s` is already a breakpoint nothing changes. Otherwise `s` is
    /// placed in sorted position and the slope sequence is extended: the new
    /// entry copies the slope of the segment `s` falls into, so the function
    /// value is unchanged everywhere. The slope ordering is preserved, so
    /// the concavity invariant survives the insertion.
    ///
    /// # Returns
    ///
    /// The index of `s` in the (possibly grown) breakpoint sequence.
    ///
    /// # Errors
    ///
    /// `s` must be finite and non-negative: the origin anchor is the
    /// smallest admissible breakpoint.
    pub fn insert_breakpoint(&mut self, s: f64) -> Result<usize, PiecewiseLinearError> {
        if !s.is_finite() {
            return Err(PiecewiseLinearError::NonFinite);
        }
        if s < 0.0 {
            return Err(PiecewiseLinearError::BelowOrigin);
        }

        // partition_point gives the count of breakpoints strictly below s,
        // which is exactly the insertion index.
        let pos = self.breakpoints.partition_point(|&u| u < s);
        if self.breakpoints.get(pos) == Some(&s) {
            return Ok(pos);
        }

        self.breakpoints.insert(pos, s);
        // The freshly inserted point takes the slope of the segment it
        // lands in, i.e. the slope at the previous position (pos >= 1 is
        // guaranteed because the origin breakpoint sorts below any new s).
        self.slopes.insert(pos, self.slopes[pos - 1]);
        Ok(pos)
    }

    /// One-sided, concavity-preserving slope update toward a pair of noisy
    /// subgradient samples observed at the breakpoint with index `pos`.
    ///
    /// Each slope is blended toward the sample with weight `alpha`; slopes
    /// left of `pos` may only increase toward the right-subgradient blend,
    /// and slopes at or right of `pos` may only decrease toward the
    /// left-subgradient blend. This ratchet keeps the slope sequence
    /// non-increasing regardless of noise in the samples.
    ///
    /// `alpha` must lie in `[0, 1]` and both subgradients must be finite;
    /// callers (the approximation engines) enforce this before the call.
    pub fn concave_blend(&mut self, pos: usize, alpha: f64, right: f64, left: f64) {
        let pos = pos.min(self.slopes.len());
        for nu in self.slopes[..pos].iter_mut() {
            let blended = (1.0 - alpha) * *nu + alpha * right;
            if blended > *nu {
                *nu = blended;
            }
        }
        for nu in self.slopes[pos..].iter_mut() {
            let blended = (1.0 - alpha) * *nu + alpha * left;
            if blended < *nu {
                *nu = blended;
            }
        }
    }
}

/// DTO to ensure that we always validate when we deserialize from an untrusted source
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug)]
pub struct PiecewiseLinearDto {
    /// The candidate breakpoint sequence
    pub breakpoints: Vec<f64>,
    /// The candidate slope sequence
    pub slopes: Vec<f64>,
}

impl From<PiecewiseLinear> for PiecewiseLinearDto {
    fn from(value: PiecewiseLinear) -> Self {
        Self {
            breakpoints: value.breakpoints,
            slopes: value.slopes,
        }
    }
}

impl TryFrom<PiecewiseLinearDto> for PiecewiseLinear {
    type Error = PiecewiseLinearError;

    /// Attempts to create a function from a DTO, validating all constraints
    ///
    /// # Validation
    ///
    /// This function validates that:
    /// 1. Both sequences are non-empty and of equal length
    /// 2. No value is NaN or infinite
    /// 3. Breakpoints are strictly increasing and start at 0
    /// 4. Slopes are non-increasing (concavity)
    fn try_from(value: PiecewiseLinearDto) -> Result<Self, Self::Error> {
        let PiecewiseLinearDto {
            breakpoints,
            slopes,
        } = value;

        if breakpoints.is_empty() {
            return Err(PiecewiseLinearError::Empty);
        }
        if breakpoints.len() != slopes.len() {
            return Err(PiecewiseLinearError::LengthMismatch {
                breakpoints: breakpoints.len(),
                slopes: slopes.len(),
            });
        }
        if breakpoints.iter().chain(slopes.iter()).any(|x| !x.is_finite()) {
            return Err(PiecewiseLinearError::NonFinite);
        }
        if breakpoints[0] != 0.0 {
            return Err(PiecewiseLinearError::OriginMissing);
        }
        if breakpoints.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(PiecewiseLinearError::NotIncreasing);
        }
        if slopes.windows(2).any(|pair| pair[1] > pair[0]) {
            return Err(PiecewiseLinearError::NotConcave);
        }

        Ok(Self {
            breakpoints,
            slopes,
        })
    }
}

/// The various ways in which a piecewise-linear value function can be invalid
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PiecewiseLinearError {
    /// Error when no breakpoints are provided
    #[error("no breakpoints provided")]
    Empty,
    /// Error when the breakpoint and slope sequences have different lengths
    #[error("breakpoint/slope length mismatch: {breakpoints} breakpoints, {slopes} slopes")]
    LengthMismatch {
        /// Number of breakpoints provided
        breakpoints: usize,
        /// Number of slopes provided
        slopes: usize,
    },
    /// Error when any value is NaN or infinite
    #[error("breakpoints and slopes must be finite")]
    NonFinite,
    /// Error when the first breakpoint is not the origin
    #[error("the first breakpoint must be 0")]
    OriginMissing,
    /// Error when breakpoints are not strictly increasing
    #[error("breakpoints are not strictly increasing")]
    NotIncreasing,
    /// Error when slopes increase with the breakpoint index
    #[error("slopes are not non-increasing (function is not concave)")]
    NotConcave,
    /// Error when a breakpoint would be inserted left of the origin
    #[error("breakpoints cannot lie below the origin")]
    BelowOrigin,
}
