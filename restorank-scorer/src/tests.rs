//! Unit coverage for score components and configuration validation.
#![forbid(unsafe_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use restorank_core::{ErrorKind, RankingScorer, RestaurantEngagementFacts};
use rstest::{fixture, rstest};

use crate::{
    RatingBounds, RecencySchedule, RecencyStep, ScoreCalculator, ScoreWeights, ScoringConfig,
    ScoringConfigError, elapsed_days, like_component,
};

const EPSILON: f64 = 1e-12;

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn calculator() -> ScoreCalculator {
    ScoreCalculator::default()
}

#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point scores"
)]
fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

#[rstest]
#[case(1.0, 0.0)]
#[case(3.0, 0.5)]
#[case(4.2, 0.8)]
#[case(5.0, 1.0)]
fn rating_is_min_max_normalised(
    calculator: ScoreCalculator,
    #[case] rating: f64,
    #[case] expected: f64,
) {
    assert_close(calculator.rating_component(Some(rating)), expected);
}

#[rstest]
fn unreviewed_rating_is_zero(calculator: ScoreCalculator) {
    assert_close(calculator.rating_component(None), 0.0);
}

#[rstest]
#[case(0.0, 0.0)]
#[case(9.0, 1.0)]
#[case(f64::NAN, 0.0)]
fn out_of_range_ratings_stay_bounded(
    calculator: ScoreCalculator,
    #[case] rating: f64,
    #[case] expected: f64,
) {
    assert_close(calculator.rating_component(Some(rating)), expected);
}

#[rstest]
#[case(0, 0, 0.5)]
#[case(10, 0, 1.0)]
#[case(0, 10, 0.0)]
#[case(7, 3, 0.7)]
#[case(u64::MAX, u64::MAX, 0.5)]
fn like_ratio(#[case] likes: u64, #[case] dislikes: u64, #[case] expected: f64) {
    assert_close(like_component(likes, dislikes), expected);
}

#[rstest]
#[case(0, 1.0)]
#[case(7, 1.0)]
#[case(8, 0.8)]
#[case(30, 0.8)]
#[case(31, 0.5)]
#[case(90, 0.5)]
#[case(91, 0.750_684_931_506_849_3)]
#[case(365, 0.0)]
#[case(1000, 0.0)]
fn recency_breakpoints(
    calculator: ScoreCalculator,
    now: DateTime<Utc>,
    #[case] days: i64,
    #[case] expected: f64,
) {
    let last = now - Duration::days(days);
    assert_close(calculator.recency_component(Some(last), now), expected);
}

#[rstest]
fn day_91_matches_documented_value(calculator: ScoreCalculator, now: DateTime<Utc>) {
    let value = calculator.recency_component(Some(now - Duration::days(91)), now);
    assert!((0.7506..0.7508).contains(&value), "got {value}");
}

#[rstest]
fn partial_days_are_truncated(calculator: ScoreCalculator, now: DateTime<Utc>) {
    let last = now - Duration::days(7) - Duration::hours(23);
    assert_eq!(elapsed_days(last, now), 7);
    assert_close(calculator.recency_component(Some(last), now), 1.0);
}

#[rstest]
fn future_reviews_count_as_today(calculator: ScoreCalculator, now: DateTime<Utc>) {
    let last = now + Duration::days(3);
    assert_eq!(elapsed_days(last, now), 0);
    assert_close(calculator.recency_component(Some(last), now), 1.0);
}

#[rstest]
fn missing_review_has_no_recency(calculator: ScoreCalculator, now: DateTime<Utc>) {
    assert_close(calculator.recency_component(None, now), 0.0);
}

#[rstest]
fn all_zero_components_score_zero(calculator: ScoreCalculator, now: DateTime<Utc>) {
    let facts = RestaurantEngagementFacts::unreviewed()
        .with_rating(1.0)
        .with_reactions(0, 10);
    assert_close(calculator.score(&facts, now).value(), 0.0);
}

#[rstest]
fn all_full_components_score_one(calculator: ScoreCalculator, now: DateTime<Utc>) {
    let facts = RestaurantEngagementFacts::unreviewed()
        .with_rating(5.0)
        .with_reactions(10, 0)
        .with_last_review_at(now);
    assert_close(calculator.score(&facts, now).value(), 1.0);
}

#[rstest]
fn unreviewed_restaurant_scores_neutral_likes_only(
    calculator: ScoreCalculator,
    now: DateTime<Utc>,
) {
    let score = calculator.score(&RestaurantEngagementFacts::unreviewed(), now);
    assert_close(score.value(), 0.15);
}

#[rstest]
fn composite_applies_default_weights(calculator: ScoreCalculator, now: DateTime<Utc>) {
    let facts = RestaurantEngagementFacts::unreviewed()
        .with_rating(4.2)
        .with_reactions(7, 3)
        .with_last_review_at(now - Duration::days(20));
    let components = calculator.components(&facts, now);
    assert_close(components.rating, 0.8);
    assert_close(components.like, 0.7);
    assert_close(components.recency, 0.8);
    assert_close(calculator.score(&facts, now).value(), 0.77);
}

#[rstest]
fn scoring_is_bit_identical(calculator: ScoreCalculator, now: DateTime<Utc>) {
    let facts = RestaurantEngagementFacts::unreviewed()
        .with_rating(3.7)
        .with_reactions(13, 29)
        .with_last_review_at(now - Duration::days(123));
    let first = calculator.score(&facts, now).value();
    let second = calculator.score(&facts, now).value();
    assert_eq!(first.to_bits(), second.to_bits());
}

#[rstest]
fn alternative_weights_change_the_blend(now: DateTime<Utc>) {
    let calculator = ScoreCalculator::new(ScoringConfig {
        weights: ScoreWeights {
            rating: 0.0,
            like: 1.0,
            recency: 0.0,
        },
        ..ScoringConfig::default()
    })
    .expect("valid weights");
    let facts = RestaurantEngagementFacts::unreviewed()
        .with_rating(5.0)
        .with_reactions(1, 3);
    assert_close(calculator.score(&facts, now).value(), 0.25);
}

#[rstest]
#[case(ScoreWeights { rating: 0.5, like: 0.3, recency: 0.3 })]
#[case(ScoreWeights { rating: 1.2, like: -0.2, recency: 0.0 })]
#[case(ScoreWeights { rating: f64::NAN, like: 0.5, recency: 0.5 })]
#[case(ScoreWeights { rating: 0.0, like: 0.0, recency: 0.0 })]
fn invalid_weights_are_rejected(#[case] weights: ScoreWeights) {
    let err = ScoreCalculator::new(ScoringConfig {
        weights,
        ..ScoringConfig::default()
    })
    .expect_err("weights should be rejected");
    assert!(matches!(err, ScoringConfigError::InvalidWeights { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[rstest]
fn default_weights_sum_to_one() {
    assert!(ScoreWeights::default().validate().is_ok());
}

#[rstest]
#[case(RatingBounds { min: 5.0, max: 1.0 })]
#[case(RatingBounds { min: 1.0, max: 1.0 })]
#[case(RatingBounds { min: f64::NEG_INFINITY, max: 5.0 })]
fn invalid_rating_bounds_are_rejected(#[case] rating_bounds: RatingBounds) {
    let config = ScoringConfig {
        rating_bounds,
        ..ScoringConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ScoringConfigError::InvalidRatingBounds { .. })
    ));
}

#[rstest]
fn unordered_recency_steps_are_rejected() {
    let mut recency = RecencySchedule::default();
    recency.steps[1] = RecencyStep {
        within_days: 5,
        value: 0.8,
    };
    assert!(matches!(
        recency.validate(),
        Err(ScoringConfigError::InvalidRecencySchedule { .. })
    ));
}

#[rstest]
fn zero_horizon_is_rejected() {
    let recency = RecencySchedule {
        decay_horizon_days: 0,
        ..RecencySchedule::default()
    };
    assert!(recency.validate().is_err());
}

#[rstest]
fn config_decodes_from_partial_json() {
    let json = serde_json::json!({ "weights": { "rating": 0.6, "like": 0.2, "recency": 0.2 } });
    let config: ScoringConfig = serde_json::from_value(json).expect("decode config");
    assert_eq!(config.recency, RecencySchedule::default());
    assert_close(config.weights.rating, 0.6);
    assert!(config.validate().is_ok());
}

#[rstest]
fn nested_objects_fall_back_to_their_defaults() {
    let json = serde_json::json!({
        "weights": { "rating": 0.6, "like": 0.2 },
        "rating_bounds": { "max": 10.0 },
        "recency": { "decay_horizon_days": 730 },
    });
    let config: ScoringConfig = serde_json::from_value(json).expect("decode config");
    assert_close(config.weights.recency, ScoreWeights::default().recency);
    assert_close(config.rating_bounds.min, RatingBounds::default().min);
    assert_close(config.rating_bounds.max, 10.0);
    assert_eq!(config.recency.steps, RecencySchedule::default().steps);
    assert_eq!(config.recency.decay_horizon_days, 730);
    assert!(config.validate().is_ok());
}
