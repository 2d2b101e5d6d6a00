//! Restaurant records as the ranking surfaces return them.
//!
//! A [`Restaurant`] pairs its catalogue fields with the engagement facts the
//! score is derived from and the score currently stored for it.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::{RankingScore, RestaurantEngagementFacts};

/// Opaque category identifier supplied by a caller.
///
/// The core never interprets the value; stores decide whether it is well
/// formed.
///
/// # Examples
/// ```
/// use restorank_core::CategoryId;
///
/// let id = CategoryId::new("pizzerias");
/// assert_eq!(id.as_str(), "pizzerias");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CategoryId(String);

impl CategoryId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A restaurant as returned by a [`RestaurantStore`](crate::RestaurantStore).
///
/// `score` is the value last written by score maintenance; stores return it
/// as-is.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use restorank_core::{CategoryId, Restaurant};
///
/// let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let restaurant = Restaurant::new("r1", "La Tasca", created)
///     .in_category(CategoryId::new("tapas"))
///     .approved(true);
/// assert!(restaurant.approved);
/// assert_eq!(restaurant.score.value(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Restaurant {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    #[cfg_attr(feature = "serde", serde(rename = "nombre"))]
    pub name: String,
    /// Category the restaurant is filed under, if any.
    #[cfg_attr(feature = "serde", serde(rename = "categoriaId"))]
    pub category_id: Option<CategoryId>,
    /// Whether an administrator has approved the listing.
    #[cfg_attr(feature = "serde", serde(rename = "aprobado"))]
    pub approved: bool,
    /// Inputs to the ranking score.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub engagement: RestaurantEngagementFacts,
    /// When the listing was created.
    #[cfg_attr(feature = "serde", serde(rename = "fechaCreacion"))]
    pub created_at: DateTime<Utc>,
    /// Current ranking score.
    #[cfg_attr(feature = "serde", serde(rename = "puntuacion"))]
    pub score: RankingScore,
}

impl Restaurant {
    /// Construct an unapproved, uncategorised restaurant with no engagement.
    pub fn new(id: impl Into<String>, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category_id: None,
            approved: false,
            engagement: RestaurantEngagementFacts::unreviewed(),
            created_at,
            score: RankingScore::MIN,
        }
    }

    /// File the restaurant under `category`.
    #[must_use]
    pub fn in_category(mut self, category: CategoryId) -> Self {
        self.category_id = Some(category);
        self
    }

    /// Set the approval flag.
    #[must_use]
    pub fn approved(mut self, approved: bool) -> Self {
        self.approved = approved;
        self
    }

    /// Replace the engagement facts.
    #[must_use]
    pub fn with_engagement(mut self, engagement: RestaurantEngagementFacts) -> Self {
        self.engagement = engagement;
        self
    }

    /// Replace the stored score.
    #[must_use]
    pub fn with_score(mut self, score: RankingScore) -> Self {
        self.score = score;
        self
    }
}
