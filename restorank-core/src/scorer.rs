//! Score restaurants from their engagement facts.
//!
//! The `RankingScorer` trait turns a
//! [`RestaurantEngagementFacts`](crate::RestaurantEngagementFacts) snapshot
//! into a [`RankingScore`](crate::RankingScore) as of a given instant.

use chrono::{DateTime, Utc};

use crate::{RankingScore, RestaurantEngagementFacts};

/// Calculate a ranking score for one restaurant.
///
/// Implementations must be pure: the same facts and `now` always produce the
/// same bits. They must be thread-safe (`Send` + `Sync`) so score maintenance
/// can run from any worker. The method is infallible; implementers return
/// [`RankingScore::MIN`] when no information is available.
///
/// Use [`RankingScorer::sanitise`] to guard raw composites.
///
/// # Examples
///
/// ```rust
/// use chrono::Utc;
/// use restorank_core::{RankingScore, RankingScorer, RestaurantEngagementFacts};
///
/// struct LikesOnly;
///
/// impl RankingScorer for LikesOnly {
///     fn score(&self, facts: &RestaurantEngagementFacts, _now: chrono::DateTime<Utc>) -> RankingScore {
///         let raw = if facts.like_count > 0 { 1.0 } else { 0.0 };
///         RankingScore::new(Self::sanitise(raw))
///     }
/// }
///
/// let facts = RestaurantEngagementFacts::unreviewed().with_reactions(3, 0);
/// assert_eq!(LikesOnly.score(&facts, Utc::now()).value(), 1.0);
/// ```
pub trait RankingScorer: Send + Sync {
    /// Return the score for `facts` evaluated at `now`.
    fn score(&self, facts: &RestaurantEngagementFacts, now: DateTime<Utc>) -> RankingScore;

    /// Clamp and validate a raw score.
    ///
    /// Returns `0.0` for non-finite values and clamps to `0.0..=1.0`.
    fn sanitise(score: f64) -> f64
    where
        Self: Sized,
    {
        if !score.is_finite() {
            return 0.0;
        }
        score.clamp(0.0, 1.0)
    }
}
