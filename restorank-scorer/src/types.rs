//! Configuration types for the ranking score.
#![forbid(unsafe_code)]

use restorank_core::{MAX_RATING, MIN_RATING};
use serde::{Deserialize, Serialize};

use crate::ScoringConfigError;

/// How far the weights may drift from summing to exactly one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Relative weighting of the three score components.
///
/// The weights must be finite, non-negative and sum to `1.0` so the composite
/// stays in `0.0..=1.0`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Multiplier applied to the normalised average rating.
    pub rating: f64,
    /// Multiplier applied to the like ratio.
    pub like: f64,
    /// Multiplier applied to review recency.
    pub recency: f64,
}

impl ScoreWeights {
    /// Validate the weights and return a copy.
    ///
    /// # Errors
    /// Returns [`ScoringConfigError::InvalidWeights`] when a weight is not
    /// finite, is negative, or the weights do not sum to `1.0`.
    pub fn validate(self) -> Result<Self, ScoringConfigError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(ScoringConfigError::InvalidWeights {
                rating: self.rating,
                like: self.like,
                recency: self.recency,
            })
        }
    }

    /// Sum of all three weights.
    #[expect(
        clippy::float_arithmetic,
        reason = "validation sums weights to check they form a convex combination"
    )]
    #[must_use]
    pub const fn total(self) -> f64 {
        self.rating + self.like + self.recency
    }

    fn is_valid(self) -> bool {
        self.has_finite_values() && self.has_non_negative_values() && self.sums_to_one()
    }

    const fn has_finite_values(self) -> bool {
        self.rating.is_finite() && self.like.is_finite() && self.recency.is_finite()
    }

    const fn has_non_negative_values(self) -> bool {
        self.rating >= 0.0 && self.like >= 0.0 && self.recency >= 0.0
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "the tolerance check subtracts the expected total"
    )]
    fn sums_to_one(self) -> bool {
        (self.total() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            rating: 0.5,
            like: 0.3,
            recency: 0.2,
        }
    }
}

/// Lowest and highest average rating a restaurant can hold.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingBounds {
    /// Rating mapped to a component of `0.0`.
    pub min: f64,
    /// Rating mapped to a component of `1.0`.
    pub max: f64,
}

impl RatingBounds {
    /// Validate the bounds and return a copy.
    ///
    /// # Errors
    /// Returns [`ScoringConfigError::InvalidRatingBounds`] unless both bounds
    /// are finite and `min < max`.
    pub fn validate(self) -> Result<Self, ScoringConfigError> {
        if self.min.is_finite() && self.max.is_finite() && self.min < self.max {
            Ok(self)
        } else {
            Err(ScoringConfigError::InvalidRatingBounds {
                min: self.min,
                max: self.max,
            })
        }
    }
}

impl Default for RatingBounds {
    fn default() -> Self {
        Self {
            min: MIN_RATING,
            max: MAX_RATING,
        }
    }
}

/// One step of the recency schedule: reviews at most `within_days` old earn
/// `value`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecencyStep {
    /// Inclusive upper bound on elapsed whole days.
    pub within_days: u32,
    /// Component value awarded inside the step.
    pub value: f64,
}

/// Step-then-linear freshness curve.
///
/// Elapsed days at or below a step's bound earn that step's value; the first
/// matching step wins. Past the last step the component decays linearly as
/// `1 - days / decay_horizon_days`, floored at zero.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecencySchedule {
    /// Steps in ascending order of `within_days`.
    pub steps: [RecencyStep; 3],
    /// Day count at which the linear tail reaches zero.
    pub decay_horizon_days: u32,
}

impl RecencySchedule {
    /// Validate the schedule and return a copy.
    ///
    /// # Errors
    /// Returns [`ScoringConfigError::InvalidRecencySchedule`] when steps are
    /// out of order, a step value lies outside `0.0..=1.0`, or the horizon
    /// is zero.
    pub fn validate(self) -> Result<Self, ScoringConfigError> {
        let invalid = |reason| Err(ScoringConfigError::InvalidRecencySchedule { reason });
        if self.decay_horizon_days == 0 {
            return invalid("decay horizon must be at least one day");
        }
        if self
            .steps
            .windows(2)
            .any(|pair| matches!(pair, [a, b] if a.within_days >= b.within_days))
        {
            return invalid("step bounds must be strictly increasing");
        }
        if self
            .steps
            .iter()
            .any(|step| !(0.0..=1.0).contains(&step.value))
        {
            return invalid("step values must lie within 0.0..=1.0");
        }
        Ok(self)
    }
}

impl Default for RecencySchedule {
    fn default() -> Self {
        Self {
            steps: [
                RecencyStep {
                    within_days: 7,
                    value: 1.0,
                },
                RecencyStep {
                    within_days: 30,
                    value: 0.8,
                },
                RecencyStep {
                    within_days: 90,
                    value: 0.5,
                },
            ],
            decay_horizon_days: 365,
        }
    }
}

/// Every tunable constant of the ranking score.
///
/// # Examples
/// ```
/// use restorank_scorer::{ScoreWeights, ScoringConfig};
///
/// let config = ScoringConfig {
///     weights: ScoreWeights { rating: 1.0, like: 0.0, recency: 0.0 },
///     ..ScoringConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Component weights.
    pub weights: ScoreWeights,
    /// Rating normalisation bounds.
    pub rating_bounds: RatingBounds,
    /// Recency curve.
    pub recency: RecencySchedule,
}

impl ScoringConfig {
    /// Validate every part of the configuration and return a copy.
    ///
    /// # Errors
    /// Returns the first [`ScoringConfigError`] found, checking weights, then
    /// rating bounds, then the recency schedule.
    pub fn validate(self) -> Result<Self, ScoringConfigError> {
        self.weights.validate()?;
        self.rating_bounds.validate()?;
        self.recency.validate()?;
        Ok(self)
    }
}
