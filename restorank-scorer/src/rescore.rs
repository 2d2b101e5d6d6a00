//! Recompute the persisted `score` column from stored engagement facts.
//!
//! Scores are derived data: whenever a review, like or dislike changes a
//! restaurant's facts, the owning service calls [`refresh_score`]. A full
//! sweep with [`refresh_all_scores`] brings every row up to date, which is
//! also how recency decay is applied as time passes.

use chrono::{DateTime, Utc};
use restorank_core::{
    RankingScore, RankingScorer, RestaurantEngagementFacts, store::decode_timestamp,
};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;

use crate::RescoreError;

const SELECT_FACTS: &str = "SELECT id, average_rating, like_count, dislike_count, last_review_at \
     FROM restaurants";
const UPDATE_SCORE: &str = "UPDATE restaurants SET score = ?1 WHERE id = ?2";

/// Outcome of a full rescoring sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RescoreSummary {
    /// Rows whose score was rewritten.
    pub updated: usize,
    /// Rows left untouched because their review timestamp was unreadable.
    pub skipped: usize,
}

/// Engagement facts exactly as stored, before validation.
struct StoredFacts {
    id: String,
    average_rating: Option<f64>,
    like_count: i64,
    dislike_count: i64,
    last_review_at: Option<String>,
}

impl StoredFacts {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            average_rating: row.get(1)?,
            like_count: row.get(2)?,
            dislike_count: row.get(3)?,
            last_review_at: row.get(4)?,
        })
    }

    fn count(&self, column: &'static str, value: i64) -> Result<u64, RescoreError> {
        u64::try_from(value).map_err(|_| RescoreError::CorruptRow {
            id: self.id.clone(),
            column,
            reason: format!("count {value} is negative"),
        })
    }

    fn last_review_at(&self) -> Result<Option<DateTime<Utc>>, RescoreError> {
        self.last_review_at
            .as_deref()
            .map(|raw| {
                decode_timestamp(raw).map_err(|err| RescoreError::CorruptRow {
                    id: self.id.clone(),
                    column: "last_review_at",
                    reason: format!("{raw:?} is not an RFC 3339 timestamp ({err})"),
                })
            })
            .transpose()
    }

    fn facts(
        &self,
        last_review_at: Option<DateTime<Utc>>,
    ) -> Result<RestaurantEngagementFacts, RescoreError> {
        Ok(RestaurantEngagementFacts {
            average_rating: self.average_rating,
            like_count: self.count("like_count", self.like_count)?,
            dislike_count: self.count("dislike_count", self.dislike_count)?,
            last_review_at,
        })
    }
}

/// Recompute and store the score of one restaurant.
///
/// # Errors
/// Returns [`RescoreError::UnknownRestaurant`] when `id` does not exist,
/// [`RescoreError::CorruptRow`] when its stored facts are unusable, and
/// [`RescoreError::Query`] for database failures.
pub fn refresh_score<S>(
    connection: &Connection,
    id: &str,
    scorer: &S,
    now: DateTime<Utc>,
) -> Result<RankingScore, RescoreError>
where
    S: RankingScorer + ?Sized,
{
    let stored = connection
        .query_row(
            &format!("{SELECT_FACTS} WHERE id = ?1"),
            [id],
            StoredFacts::from_row,
        )
        .optional()
        .map_err(|source| RescoreError::Query {
            operation: "read restaurant facts",
            source,
        })?
        .ok_or_else(|| RescoreError::UnknownRestaurant { id: id.to_owned() })?;

    let facts = stored.facts(stored.last_review_at()?)?;
    let score = scorer.score(&facts, now);
    write_score(connection, &stored.id, score)?;
    log::debug!("restaurant {id} rescored to {}", score.value());
    Ok(score)
}

/// Recompute and store the score of every restaurant in one transaction.
///
/// Rows with an unreadable review timestamp are skipped and logged; the rest
/// of the sweep carries on. Negative counts abort the sweep and roll it
/// back.
///
/// # Errors
/// Returns [`RescoreError::CorruptRow`] for negative counts and
/// [`RescoreError::Query`] for database failures.
pub fn refresh_all_scores<S>(
    connection: &mut Connection,
    scorer: &S,
    now: DateTime<Utc>,
) -> Result<RescoreSummary, RescoreError>
where
    S: RankingScorer + ?Sized,
{
    let tx = connection
        .transaction()
        .map_err(|source| RescoreError::Query {
            operation: "begin rescoring transaction",
            source,
        })?;
    let rows = read_all_facts(&tx)?;

    let mut summary = RescoreSummary::default();
    for stored in rows {
        let last_review_at = match stored.last_review_at() {
            Ok(at) => at,
            Err(err) => {
                log::warn!("skipping restaurant: {err}");
                summary.skipped += 1;
                continue;
            }
        };
        let facts = stored.facts(last_review_at)?;
        write_score(&tx, &stored.id, scorer.score(&facts, now))?;
        summary.updated += 1;
    }

    tx.commit().map_err(|source| RescoreError::Query {
        operation: "commit rescoring transaction",
        source,
    })?;
    log::info!(
        "rescored {} restaurants ({} skipped)",
        summary.updated,
        summary.skipped
    );
    Ok(summary)
}

fn read_all_facts(connection: &Connection) -> Result<Vec<StoredFacts>, RescoreError> {
    let mut statement = connection
        .prepare(&format!("{SELECT_FACTS} ORDER BY id"))
        .map_err(|source| RescoreError::Query {
            operation: "prepare facts selection",
            source,
        })?;
    let rows = statement
        .query_map([], StoredFacts::from_row)
        .map_err(|source| RescoreError::Query {
            operation: "query restaurant facts",
            source,
        })?;
    rows.map(|row| {
        row.map_err(|source| RescoreError::Query {
            operation: "read restaurant facts",
            source,
        })
    })
    .collect()
}

fn write_score(connection: &Connection, id: &str, score: RankingScore) -> Result<(), RescoreError> {
    connection
        .execute(UPDATE_SCORE, params![score.value(), id])
        .map_err(|source| RescoreError::Query {
            operation: "update restaurant score",
            source,
        })?;
    Ok(())
}
