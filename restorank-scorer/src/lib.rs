//! Ranking score computation for restaurants.
//!
//! The crate provides two complementary capabilities:
//! - **Score calculation**: [`ScoreCalculator`] blends three normalised
//!   signals (average rating, like ratio and review recency) into a single
//!   [`RankingScore`]. It implements the
//!   [`RankingScorer`](restorank_core::RankingScorer) trait so callers can
//!   swap in alternative scorers.
//! - **Score maintenance**: [`refresh_score`] and [`refresh_all_scores`]
//!   recompute the `score` column of a `restaurants` `SQLite` table from the
//!   engagement facts stored next to it.
//!
//! # Examples
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use restorank_core::{RankingScorer, RestaurantEngagementFacts};
//! use restorank_scorer::ScoreCalculator;
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
//! let facts = RestaurantEngagementFacts::unreviewed()
//!     .with_rating(5.0)
//!     .with_reactions(10, 0)
//!     .with_last_review_at(now - Duration::days(2));
//!
//! let score = ScoreCalculator::default().score(&facts, now);
//! assert!((score.value() - 1.0).abs() < 1e-12);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use chrono::{DateTime, Utc};
use restorank_core::{RankingScore, RankingScorer, RestaurantEngagementFacts};

mod error;
mod rescore;
mod types;

pub use error::{RescoreError, ScoringConfigError};
pub use rescore::{RescoreSummary, refresh_all_scores, refresh_score};
pub use types::{
    RatingBounds, RecencySchedule, RecencyStep, ScoreWeights, ScoringConfig, WEIGHT_SUM_TOLERANCE,
};

/// Like component awarded when nobody has reacted yet.
pub const NEUTRAL_LIKE_COMPONENT: f64 = 0.5;

/// The three normalised signals behind a score, each in `0.0..=1.0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScoreComponents {
    /// Normalised average rating; `0.0` when unreviewed.
    pub rating: f64,
    /// Share of likes among all reactions; neutral when there are none.
    pub like: f64,
    /// Freshness of the latest review; `0.0` when unreviewed.
    pub recency: f64,
}

impl ScoreComponents {
    /// Combine the components under `weights`.
    #[expect(
        clippy::float_arithmetic,
        reason = "the composite score is a weighted sum"
    )]
    #[must_use]
    pub fn weighted(&self, weights: ScoreWeights) -> f64 {
        weights.rating * self.rating + weights.like * self.like + weights.recency * self.recency
    }
}

/// Composite ranking scorer driven by a validated [`ScoringConfig`].
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ScoreCalculator {
    config: ScoringConfig,
}

impl ScoreCalculator {
    /// Construct a calculator from `config`.
    ///
    /// # Errors
    /// Returns [`ScoringConfigError`] when the configuration cannot yield
    /// scores within `0.0..=1.0`.
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        Ok(Self {
            config: config.validate()?,
        })
    }

    /// Configuration the calculator applies.
    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Break the score for `facts` into its normalised components.
    #[must_use]
    pub fn components(
        &self,
        facts: &RestaurantEngagementFacts,
        now: DateTime<Utc>,
    ) -> ScoreComponents {
        ScoreComponents {
            rating: self.rating_component(facts.average_rating),
            like: like_component(facts.like_count, facts.dislike_count),
            recency: self.recency_component(facts.last_review_at, now),
        }
    }

    /// Min-max normalise an average rating into `0.0..=1.0`.
    ///
    /// Unreviewed restaurants (`None`) score `0.0`. Ratings outside the
    /// configured bounds are clamped.
    #[expect(
        clippy::float_arithmetic,
        reason = "min-max normalisation subtracts and divides by the rating span"
    )]
    #[must_use]
    pub fn rating_component(&self, average_rating: Option<f64>) -> f64 {
        let Some(rating) = average_rating else {
            return 0.0;
        };
        let RatingBounds { min, max } = self.config.rating_bounds;
        let normalised = (rating - min) / (max - min);
        if normalised.is_finite() {
            normalised.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Freshness of the latest review as of `now`.
    ///
    /// Follows the configured steps, then decays linearly to zero at the
    /// horizon. Missing reviews score `0.0`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{Duration, TimeZone, Utc};
    /// use restorank_scorer::ScoreCalculator;
    ///
    /// let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    /// let calculator = ScoreCalculator::default();
    /// assert_eq!(calculator.recency_component(Some(now - Duration::days(8)), now), 0.8);
    /// assert_eq!(calculator.recency_component(None, now), 0.0);
    /// ```
    #[expect(
        clippy::float_arithmetic,
        reason = "the tail of the recency curve is a linear decay"
    )]
    #[must_use]
    pub fn recency_component(
        &self,
        last_review_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> f64 {
        let Some(last) = last_review_at else {
            return 0.0;
        };
        let days = elapsed_days(last, now);
        let schedule = &self.config.recency;
        if let Some(step) = schedule.steps.iter().find(|step| days <= step.within_days) {
            return step.value;
        }
        (1.0 - f64::from(days) / f64::from(schedule.decay_horizon_days)).max(0.0)
    }
}

impl RankingScorer for ScoreCalculator {
    fn score(&self, facts: &RestaurantEngagementFacts, now: DateTime<Utc>) -> RankingScore {
        let raw = self.components(facts, now).weighted(self.config.weights);
        RankingScore::new(Self::sanitise(raw))
    }
}

/// Share of likes among all reactions.
///
/// Returns [`NEUTRAL_LIKE_COMPONENT`] when there are no reactions.
///
/// # Examples
/// ```
/// use restorank_scorer::like_component;
///
/// assert_eq!(like_component(0, 0), 0.5);
/// assert_eq!(like_component(7, 3), 0.7);
/// assert_eq!(like_component(0, 10), 0.0);
/// ```
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "the like ratio divides reaction counts converted to floats"
)]
#[must_use]
pub fn like_component(like_count: u64, dislike_count: u64) -> f64 {
    if like_count == 0 && dislike_count == 0 {
        return NEUTRAL_LIKE_COMPONENT;
    }
    let likes = like_count as f64;
    (likes / (likes + dislike_count as f64)).clamp(0.0, 1.0)
}

/// Whole days elapsed from `since` to `now`, truncated.
///
/// Timestamps in the future count as zero days.
#[must_use]
pub fn elapsed_days(since: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = now.signed_duration_since(since).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests;
