//! Error types raised while configuring scores or refreshing stored ones.
#![forbid(unsafe_code)]

use restorank_core::ErrorKind;
use thiserror::Error;

/// A [`ScoringConfig`](crate::ScoringConfig) that cannot produce bounded
/// scores.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringConfigError {
    /// Weights were not finite, were negative, or did not sum to `1.0`.
    #[error(
        "score weights rating={rating}, like={like}, recency={recency} must be non-negative and sum to 1"
    )]
    InvalidWeights {
        /// Rating weight as supplied.
        rating: f64,
        /// Like weight as supplied.
        like: f64,
        /// Recency weight as supplied.
        recency: f64,
    },
    /// Rating bounds were not finite or not strictly ordered.
    #[error("rating bounds {min}..={max} are invalid")]
    InvalidRatingBounds {
        /// Lower bound as supplied.
        min: f64,
        /// Upper bound as supplied.
        max: f64,
    },
    /// The recency schedule was malformed.
    #[error("invalid recency schedule: {reason}")]
    InvalidRecencySchedule {
        /// What was wrong with it.
        reason: &'static str,
    },
}

impl ScoringConfigError {
    /// Configuration problems are always the caller's fault.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

/// Errors raised while recomputing persisted scores.
#[derive(Debug, Error)]
pub enum RescoreError {
    /// No restaurant with the requested id exists.
    #[error("restaurant {id} does not exist")]
    UnknownRestaurant {
        /// Identifier that was looked up.
        id: String,
    },
    /// Preparing or executing a database statement failed.
    #[error("failed to {operation}")]
    Query {
        /// Description of the failed operation.
        operation: &'static str,
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A stored row holds facts no score can be computed from.
    #[error("restaurant {id} has an invalid {column}: {reason}")]
    CorruptRow {
        /// Identifier of the offending row.
        id: String,
        /// Column holding the bad value.
        column: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

impl RescoreError {
    /// Classify the failure for transport layers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownRestaurant { .. } => ErrorKind::NotFound,
            Self::Query { .. } | Self::CorruptRow { .. } => ErrorKind::Internal,
        }
    }
}
