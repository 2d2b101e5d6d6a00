//! Engagement facts that feed the ranking score, and the score itself.

use chrono::{DateTime, Utc};

/// Lowest rating a review can award.
pub const MIN_RATING: f64 = 1.0;

/// Highest rating a review can award.
pub const MAX_RATING: f64 = 5.0;

/// Raw engagement signals recorded for one restaurant.
///
/// The facts are owned by the storage layer; scoring only reads them.
///
/// # Examples
/// ```
/// use restorank_core::RestaurantEngagementFacts;
///
/// let facts = RestaurantEngagementFacts::unreviewed();
/// assert!(facts.average_rating.is_none());
/// assert_eq!(facts.interactions(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestaurantEngagementFacts {
    /// Mean review rating in `MIN_RATING..=MAX_RATING`, absent until the
    /// first review arrives.
    #[cfg_attr(feature = "serde", serde(rename = "calificacionPromedio"))]
    pub average_rating: Option<f64>,
    /// Number of likes received.
    #[cfg_attr(feature = "serde", serde(rename = "likes"))]
    pub like_count: u64,
    /// Number of dislikes received.
    #[cfg_attr(feature = "serde", serde(rename = "dislikes"))]
    pub dislike_count: u64,
    /// When the most recent review was written.
    #[cfg_attr(feature = "serde", serde(rename = "ultimaResena"))]
    pub last_review_at: Option<DateTime<Utc>>,
}

impl RestaurantEngagementFacts {
    /// Facts for a restaurant nobody has reviewed or reacted to yet.
    #[must_use]
    pub const fn unreviewed() -> Self {
        Self {
            average_rating: None,
            like_count: 0,
            dislike_count: 0,
            last_review_at: None,
        }
    }

    /// Set the average rating while returning `self` for chaining.
    #[must_use]
    pub const fn with_rating(mut self, rating: f64) -> Self {
        self.average_rating = Some(rating);
        self
    }

    /// Set like and dislike counts while returning `self` for chaining.
    #[must_use]
    pub const fn with_reactions(mut self, likes: u64, dislikes: u64) -> Self {
        self.like_count = likes;
        self.dislike_count = dislikes;
        self
    }

    /// Set the last review timestamp while returning `self` for chaining.
    #[must_use]
    pub const fn with_last_review_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_review_at = Some(at);
        self
    }

    /// Total number of like and dislike reactions, saturating on overflow.
    #[must_use]
    pub const fn interactions(&self) -> u64 {
        self.like_count.saturating_add(self.dislike_count)
    }
}

/// Composite ranking score in `0.0..=1.0`.
///
/// Construction goes through [`RankingScore::new`], which maps non-finite
/// input to `0.0` and clamps everything else into range.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RankingScore(f64);

impl RankingScore {
    /// Lowest possible score.
    pub const MIN: Self = Self(0.0);

    /// Highest possible score.
    pub const MAX: Self = Self(1.0);

    /// Wrap a raw value, clamping it to the valid range.
    ///
    /// # Examples
    /// ```
    /// use restorank_core::RankingScore;
    ///
    /// assert_eq!(RankingScore::new(1.7).value(), 1.0);
    /// assert_eq!(RankingScore::new(f64::NAN).value(), 0.0);
    /// assert_eq!(RankingScore::new(0.25).value(), 0.25);
    /// ```
    #[must_use]
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return Self::MIN;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// The score as a plain float.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl From<RankingScore> for f64 {
    fn from(score: RankingScore) -> Self {
        score.value()
    }
}
