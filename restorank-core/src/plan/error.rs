//! Error types raised while normalising retrieval parameters.

use thiserror::Error;

use crate::ErrorKind;

/// Reasons a set of query parameters cannot become a [`QueryPlan`].
///
/// Every variant records the wire name of the offending parameter and the
/// raw value the caller sent.
///
/// [`QueryPlan`]: crate::QueryPlan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A filter parameter was malformed.
    #[error("invalid filter {parameter}={value:?}: {reason}")]
    InvalidFilter {
        /// Wire name of the parameter.
        parameter: &'static str,
        /// Raw value supplied by the caller.
        value: String,
        /// Why the value was refused.
        reason: &'static str,
    },
    /// A sort parameter named an unknown field or direction.
    #[error("invalid sort {parameter}={value:?}: {reason}")]
    InvalidSort {
        /// Wire name of the parameter.
        parameter: &'static str,
        /// Raw value supplied by the caller.
        value: String,
        /// Why the value was refused.
        reason: &'static str,
    },
    /// A pagination parameter was not a non-negative integer.
    #[error("invalid pagination {parameter}={value:?}: {reason}")]
    InvalidPagination {
        /// Wire name of the parameter.
        parameter: &'static str,
        /// Raw value supplied by the caller.
        value: String,
        /// Why the value was refused.
        reason: &'static str,
    },
}

impl PlanError {
    /// Every planning failure is the caller's fault.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }

    /// Wire name of the parameter that failed.
    #[must_use]
    pub const fn parameter(&self) -> &'static str {
        match self {
            Self::InvalidFilter { parameter, .. }
            | Self::InvalidSort { parameter, .. }
            | Self::InvalidPagination { parameter, .. } => *parameter,
        }
    }

    /// Raw value that failed.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::InvalidFilter { value, .. }
            | Self::InvalidSort { value, .. }
            | Self::InvalidPagination { value, .. } => value,
        }
    }
}
