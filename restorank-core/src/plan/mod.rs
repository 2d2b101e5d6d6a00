//! Normalised filter, sort and pagination plans for restaurant retrieval.
//!
//! Callers hand raw [`QueryParams`] to a [`RetrievalPlanner`], which either
//! rejects them with a [`PlanError`] or returns an immutable [`QueryPlan`]
//! ready for a [`RestaurantStore`](crate::RestaurantStore).

use std::{fmt, str::FromStr};

use crate::CategoryId;

mod error;
mod params;
mod planner;

pub use error::PlanError;
pub use params::{
    Endpoint, PARAM_APPROVED_ONLY, PARAM_CATEGORY_ID, PARAM_LIMIT, PARAM_OFFSET, PARAM_SORT_BY,
    PARAM_SORT_DIRECTION, QueryParams,
};
pub use planner::{PlannerConfig, RetrievalPlanner};

/// Which restaurants a plan selects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterSpec {
    /// Restrict results to one category.
    pub category_id: Option<CategoryId>,
    /// Restrict results to approved restaurants.
    pub approved_only: bool,
}

/// Fields a store knows how to sort by.
///
/// # Examples
/// ```
/// use restorank_core::SortField;
///
/// assert_eq!("puntuacion".parse::<SortField>(), Ok(SortField::Score));
/// assert_eq!(SortField::Name.as_str(), "nombre");
/// assert!("stars".parse::<SortField>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortField {
    /// Composite ranking score.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "puntuacion"))]
    Score,
    /// Restaurant name, byte-wise.
    #[cfg_attr(feature = "serde", serde(rename = "nombre"))]
    Name,
    /// Average review rating; unreviewed restaurants sort lowest.
    #[cfg_attr(feature = "serde", serde(rename = "calificacionPromedio"))]
    AverageRating,
    /// Number of likes.
    #[cfg_attr(feature = "serde", serde(rename = "likes"))]
    Likes,
    /// Creation timestamp.
    #[cfg_attr(feature = "serde", serde(rename = "fechaCreacion"))]
    CreatedAt,
}

impl SortField {
    /// Every sortable field, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Score,
        Self::Name,
        Self::AverageRating,
        Self::Likes,
        Self::CreatedAt,
    ];

    /// Return the wire name accepted in `ordenarPor`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Score => "puntuacion",
            Self::Name => "nombre",
            Self::AverageRating => "calificacionPromedio",
            Self::Likes => "likes",
            Self::CreatedAt => "fechaCreacion",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a sort field or direction name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortToken(String);

impl fmt::Display for UnknownSortToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort token '{}'", self.0)
    }
}

impl std::error::Error for UnknownSortToken {}

impl FromStr for SortField {
    type Err = UnknownSortToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownSortToken(s.to_owned()))
    }
}

/// Sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl SortDirection {
    /// Return the direction as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = UnknownSortToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(UnknownSortToken(s.to_owned()))
        }
    }
}

/// Field and direction to order results by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortSpec {
    /// Primary sort key.
    pub field: SortField,
    /// Order applied to the primary key.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Highest score first.
    pub const BY_SCORE_DESC: Self = Self {
        field: SortField::Score,
        direction: SortDirection::Desc,
    };
}

/// Window of results to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageSpec {
    /// Maximum number of restaurants; `0` yields an empty page.
    pub limit: u32,
    /// Number of restaurants to skip before the page starts.
    pub offset: u32,
}

impl PageSpec {
    /// Page size used when the caller does not ask for one.
    pub const DEFAULT_LIMIT: u32 = 50;

    /// Construct a page window.
    #[must_use]
    pub const fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 0)
    }
}

/// Immutable retrieval plan handed to a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryPlan {
    /// Selection criteria.
    pub filter: FilterSpec,
    /// Ordering.
    pub sort: SortSpec,
    /// Pagination window.
    pub page: PageSpec,
}
