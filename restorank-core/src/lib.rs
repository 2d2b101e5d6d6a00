//! Core domain types for restaurant ranking.
//!
//! The crate owns the pieces every ranking surface shares: restaurant
//! records and their engagement facts, the [`RankingScorer`] trait, the query
//! plan produced by [`RetrievalPlanner`], and the [`RestaurantStore`] boundary
//! that executes plans. Planning and scoring are pure; only store
//! implementations perform I/O.
//!
//! # Examples
//!
//! ```
//! use restorank_core::{QueryParams, RetrievalPlanner, SortDirection, SortField};
//!
//! let planner = RetrievalPlanner::default();
//! let params = QueryParams {
//!     solo_aprobados: Some("false".into()),
//!     ..QueryParams::default()
//! };
//!
//! let plan = planner.plan_ranking(&params).expect("defaults are valid");
//! assert!(plan.filter.approved_only);
//! assert_eq!(plan.sort.field, SortField::Score);
//! assert_eq!(plan.sort.direction, SortDirection::Desc);
//! assert_eq!((plan.page.limit, plan.page.offset), (50, 0));
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod engagement;
pub mod error;
pub mod plan;
pub mod restaurant;
pub mod scorer;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(all(docsrs, not(test)), doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use engagement::{MAX_RATING, MIN_RATING, RankingScore, RestaurantEngagementFacts};
pub use error::ErrorKind;
pub use plan::{
    Endpoint, FilterSpec, PageSpec, PlanError, PlannerConfig, QueryParams, QueryPlan,
    RetrievalPlanner, SortDirection, SortField, SortSpec,
};
pub use restaurant::{CategoryId, Restaurant};
pub use scorer::RankingScorer;
pub use store::{RestaurantStore, StoreError};

#[cfg(feature = "store-sqlite")]
pub use store::SqliteRestaurantStore;
