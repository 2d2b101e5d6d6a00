//! Test-only, in-memory `RestaurantStore` implementation and fixture data
//! used by unit and behaviour tests.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::{
    CategoryId, QueryPlan, RankingScore, Restaurant, RestaurantEngagementFacts, RestaurantStore,
    SortDirection, SortField, StoreError, store::validate_category_id,
};

/// In-memory `RestaurantStore` implementation used in tests.
///
/// The store performs a linear scan and sort, mirroring the ordering the
/// SQLite store produces, including `NULL` ratings sorting lowest.
#[derive(Default, Debug)]
pub struct MemoryStore {
    restaurants: Vec<Restaurant>,
}

impl MemoryStore {
    /// Create a store from a collection of restaurants.
    pub fn with_restaurants<I>(restaurants: I) -> Self
    where
        I: IntoIterator<Item = Restaurant>,
    {
        Self {
            restaurants: restaurants.into_iter().collect(),
        }
    }
}

impl RestaurantStore for MemoryStore {
    fn list_restaurants(
        &self,
        plan: &QueryPlan,
    ) -> Result<Box<dyn Iterator<Item = Restaurant> + Send + '_>, StoreError> {
        if let Some(category) = &plan.filter.category_id {
            validate_category_id(category)?;
        }
        let mut matches: Vec<&Restaurant> = self
            .restaurants
            .iter()
            .filter(|r| !plan.filter.approved_only || r.approved)
            .filter(|r| {
                plan.filter
                    .category_id
                    .as_ref()
                    .is_none_or(|wanted| r.category_id.as_ref() == Some(wanted))
            })
            .collect();
        matches.sort_by(|a, b| {
            let primary = compare_by(plan.sort.field, a, b);
            let primary = match plan.sort.direction {
                SortDirection::Asc => primary,
                SortDirection::Desc => primary.reverse(),
            };
            primary.then_with(|| a.id.cmp(&b.id))
        });
        let offset = usize::try_from(plan.page.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(plan.page.limit).unwrap_or(usize::MAX);
        Ok(Box::new(
            matches.into_iter().skip(offset).take(limit).cloned(),
        ))
    }
}

fn compare_by(field: SortField, a: &Restaurant, b: &Restaurant) -> Ordering {
    match field {
        SortField::Score => a.score.value().total_cmp(&b.score.value()),
        SortField::Name => a.name.cmp(&b.name),
        SortField::AverageRating => {
            match (a.engagement.average_rating, b.engagement.average_rating) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (left, right) => left.is_some().cmp(&right.is_some()),
            }
        }
        SortField::Likes => a.engagement.like_count.cmp(&b.engagement.like_count),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

/// Fixed "current time" shared by fixtures so recency is reproducible.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Six restaurants covering every filter and ordering edge.
///
/// Approved restaurants by score: `r3` (0.9), `r1` (0.7), `r4` and `r6`
/// tied at 0.5, then `r2` (0.2). `r5` (0.8) is awaiting approval and `r2`
/// has never been reviewed.
#[must_use]
pub fn sample_restaurants() -> Vec<Restaurant> {
    let now = fixed_now();
    let tapas = CategoryId::new("tapas");
    let burgers = CategoryId::new("burgers");
    vec![
        Restaurant::new("r1", "La Tasca", now - Duration::days(400))
            .in_category(tapas.clone())
            .approved(true)
            .with_engagement(
                RestaurantEngagementFacts::unreviewed()
                    .with_rating(4.2)
                    .with_reactions(40, 10)
                    .with_last_review_at(now - Duration::days(3)),
            )
            .with_score(RankingScore::new(0.7)),
        Restaurant::new("r2", "Burger Barn", now - Duration::days(10))
            .in_category(burgers.clone())
            .approved(true)
            .with_score(RankingScore::new(0.2)),
        Restaurant::new("r3", "Casa Pepe", now - Duration::days(800))
            .in_category(tapas.clone())
            .approved(true)
            .with_engagement(
                RestaurantEngagementFacts::unreviewed()
                    .with_rating(4.8)
                    .with_reactions(120, 4)
                    .with_last_review_at(now - Duration::days(1)),
            )
            .with_score(RankingScore::new(0.9)),
        Restaurant::new("r4", "El Rincon", now - Duration::days(200))
            .in_category(tapas)
            .approved(true)
            .with_engagement(
                RestaurantEngagementFacts::unreviewed()
                    .with_rating(3.5)
                    .with_reactions(7, 3)
                    .with_last_review_at(now - Duration::days(45)),
            )
            .with_score(RankingScore::new(0.5)),
        Restaurant::new("r5", "Sushi Go", now - Duration::days(5))
            .in_category(CategoryId::new("sushi"))
            .with_engagement(
                RestaurantEngagementFacts::unreviewed()
                    .with_rating(5.0)
                    .with_reactions(2, 0)
                    .with_last_review_at(now - Duration::days(2)),
            )
            .with_score(RankingScore::new(0.8)),
        Restaurant::new("r6", "Patty Palace", now - Duration::days(60))
            .in_category(burgers)
            .approved(true)
            .with_engagement(
                RestaurantEngagementFacts::unreviewed()
                    .with_rating(2.0)
                    .with_reactions(1, 1)
                    .with_last_review_at(now - Duration::days(400)),
            )
            .with_score(RankingScore::new(0.5)),
    ]
}

/// Write `restaurants` into a fresh SQLite database at `path`.
///
/// # Errors
/// Propagates SQLite failures.
#[cfg(feature = "store-sqlite")]
pub fn write_sqlite_database<P, I>(path: P, restaurants: I) -> rusqlite::Result<()>
where
    P: AsRef<std::path::Path>,
    I: IntoIterator<Item = Restaurant>,
{
    let mut connection = rusqlite::Connection::open(path)?;
    crate::store::create_schema(&connection)?;
    let tx = connection.transaction()?;
    for restaurant in restaurants {
        crate::store::insert_restaurant(&tx, &restaurant)?;
    }
    tx.commit()
}
