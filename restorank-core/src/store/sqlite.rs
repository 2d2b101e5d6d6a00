//! SQLite-backed store implementation for persisted restaurants.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OpenFlags, Row, params};

use crate::{
    CategoryId, QueryPlan, RankingScore, Restaurant, RestaurantEngagementFacts, SortDirection,
    SortField,
};

use super::{RestaurantStore, StoreError, validate_category_id};

const SELECT_COLUMNS: &str = "id, name, category_id, approved, average_rating, like_count, \
     dislike_count, last_review_at, created_at, score";

/// Format a timestamp the way every stored column expects it.
///
/// The fixed-width UTC form sorts lexicographically in chronological order.
#[must_use]
pub fn encode_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored RFC 3339 timestamp into UTC.
///
/// # Errors
/// Returns the `chrono` parse error when `raw` is not RFC 3339.
pub fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|at| at.with_timezone(&Utc))
}

/// Create the `restaurants` table and its score index when missing.
///
/// # Errors
/// Propagates SQLite failures.
pub fn create_schema(connection: &Connection) -> rusqlite::Result<()> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS restaurants (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            category_id TEXT,
            approved INTEGER NOT NULL DEFAULT 0,
            average_rating REAL,
            like_count INTEGER NOT NULL DEFAULT 0,
            dislike_count INTEGER NOT NULL DEFAULT 0,
            last_review_at TEXT,
            created_at TEXT NOT NULL,
            score REAL NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS restaurants_by_score ON restaurants (approved, score DESC, id);",
    )
}

/// Insert or replace one restaurant row.
///
/// # Errors
/// Propagates SQLite failures, including counts that do not fit in `i64`.
pub fn insert_restaurant(connection: &Connection, restaurant: &Restaurant) -> rusqlite::Result<()> {
    let facts = &restaurant.engagement;
    let likes = i64::try_from(facts.like_count)
        .map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))?;
    let dislikes = i64::try_from(facts.dislike_count)
        .map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))?;
    connection.execute(
        "INSERT OR REPLACE INTO restaurants (id, name, category_id, approved, average_rating, \
         like_count, dislike_count, last_review_at, created_at, score) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            restaurant.id,
            restaurant.name,
            restaurant.category_id.as_ref().map(CategoryId::as_str),
            restaurant.approved,
            facts.average_rating,
            likes,
            dislikes,
            facts.last_review_at.map(encode_timestamp),
            encode_timestamp(restaurant.created_at),
            restaurant.score.value(),
        ],
    )?;
    Ok(())
}

/// Read-only restaurant store backed by a SQLite database.
pub struct SqliteRestaurantStore {
    connection: Connection,
    path: Option<PathBuf>,
}

impl fmt::Debug for SqliteRestaurantStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteRestaurantStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteRestaurantStore {
    /// Open an existing database in read-only mode.
    ///
    /// # Errors
    /// Returns [`StoreError::OpenDatabase`] when SQLite refuses the file.
    pub fn open<P: AsRef<Path>>(database_path: P) -> Result<Self, StoreError> {
        let path = database_path.as_ref();
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| StoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            connection,
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap an already open connection, e.g. an in-memory database.
    #[must_use]
    pub const fn from_connection(connection: Connection) -> Self {
        Self {
            connection,
            path: None,
        }
    }

    fn query(&self, plan: &QueryPlan) -> Result<Vec<Restaurant>, StoreError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM restaurants \
             WHERE (?1 IS NULL OR category_id = ?1) AND (?2 = 0 OR approved = 1) \
             ORDER BY {column} {direction}, id ASC \
             LIMIT ?3 OFFSET ?4",
            column = sort_column(plan.sort.field),
            direction = sort_keyword(plan.sort.direction),
        );
        let mut statement =
            self.connection
                .prepare_cached(&sql)
                .map_err(|source| StoreError::Query {
                    operation: "prepare restaurant listing",
                    source,
                })?;
        let category = plan.filter.category_id.as_ref().map(CategoryId::as_str);
        let mut rows = statement
            .query(params![
                category,
                plan.filter.approved_only,
                i64::from(plan.page.limit),
                i64::from(plan.page.offset),
            ])
            .map_err(|source| StoreError::Query {
                operation: "query restaurants",
                source,
            })?;

        let mut restaurants = Vec::new();
        while let Some(row) = rows.next().map_err(|source| StoreError::Query {
            operation: "read restaurant row",
            source,
        })? {
            restaurants.push(read_restaurant(row)?);
        }
        Ok(restaurants)
    }
}

impl RestaurantStore for SqliteRestaurantStore {
    fn list_restaurants(
        &self,
        plan: &QueryPlan,
    ) -> Result<Box<dyn Iterator<Item = Restaurant> + Send + '_>, StoreError> {
        if let Some(category) = &plan.filter.category_id {
            validate_category_id(category)?;
        }
        let restaurants = self.query(plan)?;
        log::debug!(
            "listed {} restaurants (sort {} {}, limit {}, offset {})",
            restaurants.len(),
            plan.sort.field,
            plan.sort.direction,
            plan.page.limit,
            plan.page.offset,
        );
        Ok(Box::new(restaurants.into_iter()))
    }
}

const fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Score => "score",
        SortField::Name => "name",
        SortField::AverageRating => "average_rating",
        SortField::Likes => "like_count",
        SortField::CreatedAt => "created_at",
    }
}

const fn sort_keyword(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    }
}

fn read_restaurant(row: &Row<'_>) -> Result<Restaurant, StoreError> {
    let column_error = |source| StoreError::Query {
        operation: "decode restaurant column",
        source,
    };
    let id: String = row.get(0).map_err(column_error)?;
    let name: String = row.get(1).map_err(column_error)?;
    let category_id: Option<String> = row.get(2).map_err(column_error)?;
    let approved: bool = row.get(3).map_err(column_error)?;
    let average_rating: Option<f64> = row.get(4).map_err(column_error)?;
    let like_count: i64 = row.get(5).map_err(column_error)?;
    let dislike_count: i64 = row.get(6).map_err(column_error)?;
    let last_review_at: Option<String> = row.get(7).map_err(column_error)?;
    let created_at: String = row.get(8).map_err(column_error)?;
    let score: f64 = row.get(9).map_err(column_error)?;

    let engagement = RestaurantEngagementFacts {
        average_rating,
        like_count: non_negative(&id, "like_count", like_count)?,
        dislike_count: non_negative(&id, "dislike_count", dislike_count)?,
        last_review_at: last_review_at
            .as_deref()
            .map(|raw| timestamp(&id, "last_review_at", raw))
            .transpose()?,
    };
    Ok(Restaurant {
        category_id: category_id.map(CategoryId::new),
        approved,
        engagement,
        created_at: timestamp(&id, "created_at", &created_at)?,
        score: RankingScore::new(score),
        name,
        id,
    })
}

fn non_negative(id: &str, column: &'static str, value: i64) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::CorruptRow {
        id: id.to_owned(),
        column,
        reason: format!("count {value} is negative"),
    })
}

fn timestamp(id: &str, column: &'static str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    decode_timestamp(raw).map_err(|err| StoreError::CorruptRow {
        id: id.to_owned(),
        column,
        reason: format!("{raw:?} is not an RFC 3339 timestamp ({err})"),
    })
}
