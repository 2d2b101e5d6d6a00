//! Facade crate for the restorank ranking engine.
//!
//! This crate re-exports the core domain types and exposes the score
//! calculator and SQLite store behind feature flags.

#![forbid(unsafe_code)]

pub use restorank_core::{
    CategoryId, Endpoint, ErrorKind, FilterSpec, PageSpec, PlanError, PlannerConfig, QueryParams,
    QueryPlan, RankingScore, RankingScorer, Restaurant, RestaurantEngagementFacts,
    RestaurantStore, RetrievalPlanner, SortDirection, SortField, SortSpec, StoreError,
};

#[cfg(feature = "store-sqlite")]
pub use restorank_core::SqliteRestaurantStore;

#[cfg(feature = "scorer")]
pub use restorank_scorer::{
    RatingBounds, RecencySchedule, RecencyStep, RescoreError, RescoreSummary, ScoreCalculator,
    ScoreComponents, ScoreWeights, ScoringConfig, ScoringConfigError, refresh_all_scores,
    refresh_score,
};

#[cfg(feature = "test-support")]
pub use restorank_core::test_support;
