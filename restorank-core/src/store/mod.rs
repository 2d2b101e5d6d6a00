//! Data access traits for restaurants.
//!
//! The `RestaurantStore` trait is the single read operation the ranking
//! surfaces need: execute a [`QueryPlan`] and return the matching
//! [`Restaurant`] values in order.

use thiserror::Error;

use crate::{CategoryId, ErrorKind, QueryPlan, Restaurant};

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{
    SqliteRestaurantStore, create_schema, decode_timestamp, encode_timestamp, insert_restaurant,
};

/// Longest category identifier the reference stores accept.
pub const MAX_CATEGORY_ID_LEN: usize = 64;

/// Errors raised while executing a plan.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The plan referenced a category identifier the store cannot represent.
    #[error("malformed category identifier {value:?}")]
    InvalidCategoryId {
        /// Identifier as supplied.
        value: String,
    },
    /// Opening the SQLite database failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to open SQLite database at {path}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: std::path::PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Preparing or executing a query failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to {operation}")]
    Query {
        /// Description of the failed operation.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A stored row could not be turned into a [`Restaurant`].
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

impl StoreError {
    /// Classify the failure for transport layers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCategoryId { .. } => ErrorKind::InvalidInput,
            #[cfg(feature = "store-sqlite")]
            Self::OpenDatabase { .. } => ErrorKind::Unavailable,
            #[cfg(feature = "store-sqlite")]
            Self::Query { .. } => ErrorKind::Internal,
            Self::CorruptRow { .. } => ErrorKind::Internal,
        }
    }
}

/// Reject category identifiers outside `[A-Za-z0-9_-]{1,64}`.
///
/// # Errors
/// Returns [`StoreError::InvalidCategoryId`] for empty, overlong, or
/// otherwise malformed identifiers.
///
/// # Examples
/// ```
/// use restorank_core::{CategoryId, store::validate_category_id};
///
/// assert!(validate_category_id(&CategoryId::new("tapas_01")).is_ok());
/// assert!(validate_category_id(&CategoryId::new("tapas; DROP")).is_err());
/// ```
pub fn validate_category_id(id: &CategoryId) -> Result<(), StoreError> {
    let raw = id.as_str();
    let well_formed = !raw.is_empty()
        && raw.len() <= MAX_CATEGORY_ID_LEN
        && raw
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-');
    if well_formed {
        Ok(())
    } else {
        Err(StoreError::InvalidCategoryId {
            value: raw.to_owned(),
        })
    }
}

/// Read-only access to persisted restaurants.
///
/// Implementations must honour every part of the plan:
/// - keep only restaurants matching `filter` (category equality, approval);
/// - order by `sort`, breaking ties by restaurant id ascending so equal scores
///   come back in the same order on every call;
/// - skip `page.offset` matches, then return at most `page.limit`.
///
/// Malformed category identifiers are reported as
/// [`StoreError::InvalidCategoryId`], never silently treated as "no match".
///
/// # Examples
///
/// ```rust
/// use restorank_core::{QueryPlan, Restaurant, RestaurantStore, StoreError};
///
/// struct EmptyStore;
///
/// impl RestaurantStore for EmptyStore {
///     fn list_restaurants(
///         &self,
///         _plan: &QueryPlan,
///     ) -> Result<Box<dyn Iterator<Item = Restaurant> + Send + '_>, StoreError> {
///         Ok(Box::new(std::iter::empty()))
///     }
/// }
///
/// let plan = restorank_core::RetrievalPlanner::default()
///     .plan_ranking(&Default::default())
///     .expect("defaults are valid");
/// assert_eq!(EmptyStore.list_restaurants(&plan).expect("query").count(), 0);
/// ```
pub trait RestaurantStore {
    /// Return the restaurants selected by `plan`, in plan order.
    ///
    /// The iterator is finite and single-pass.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the plan cannot be executed.
    fn list_restaurants(
        &self,
        plan: &QueryPlan,
    ) -> Result<Box<dyn Iterator<Item = Restaurant> + Send + '_>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("tapas")]
    #[case("A-1_b")]
    #[case("6650f1a2c3d4e5f601234567")]
    fn accepts_well_formed_categories(#[case] raw: &str) {
        assert!(validate_category_id(&CategoryId::new(raw)).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case(" tapas")]
    #[case("tapas/bar")]
    #[case("caf\u{e9}")]
    fn rejects_malformed_categories(#[case] raw: &str) {
        let err = validate_category_id(&CategoryId::new(raw)).expect_err("should be rejected");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[rstest]
    fn rejects_overlong_categories() {
        let raw = "a".repeat(MAX_CATEGORY_ID_LEN + 1);
        assert!(validate_category_id(&CategoryId::new(raw)).is_err());
    }

    #[rstest]
    fn corrupt_rows_are_internal() {
        let err = StoreError::CorruptRow {
            id: "r1".into(),
            column: "like_count",
            reason: "negative".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
