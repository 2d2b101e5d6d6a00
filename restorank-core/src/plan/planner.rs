//! Turn raw query parameters into a validated [`QueryPlan`].
//!
//! The general listing and the ranking view share every rule except one: the
//! ranking view always restricts results to approved restaurants and ignores
//! `soloAprobados` entirely.

use crate::CategoryId;

use super::{
    Endpoint, FilterSpec, PageSpec, PlanError, QueryParams, QueryPlan, SortDirection, SortField,
    SortSpec,
    params::{
        PARAM_APPROVED_ONLY, PARAM_CATEGORY_ID, PARAM_LIMIT, PARAM_OFFSET, PARAM_SORT_BY,
        PARAM_SORT_DIRECTION,
    },
};

/// Defaults applied when a parameter is omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Sort used when neither `ordenarPor` nor `orden` is given.
    pub default_sort: SortSpec,
    /// Page used when neither `limite` nor `saltar` is given.
    pub default_page: PageSpec,
    /// Listing behaviour when `soloAprobados` is omitted.
    pub default_approved_only: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_sort: SortSpec::BY_SCORE_DESC,
            default_page: PageSpec::default(),
            default_approved_only: true,
        }
    }
}

/// Stateless normaliser shared by every retrieval endpoint.
///
/// # Examples
/// ```
/// use restorank_core::{PlanError, QueryParams, RetrievalPlanner};
///
/// let planner = RetrievalPlanner::default();
/// let params = QueryParams::from_pairs([("limite", "abc")]);
/// let err = planner.plan_listing(&params).unwrap_err();
/// assert!(matches!(err, PlanError::InvalidPagination { parameter: "limite", .. }));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetrievalPlanner {
    config: PlannerConfig,
}

impl RetrievalPlanner {
    /// Create a planner with the given defaults.
    #[must_use]
    pub const fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Defaults this planner applies.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a request for the general listing.
    ///
    /// # Errors
    /// Returns [`PlanError`] for the first malformed parameter, checked in
    /// filter, sort, pagination order.
    pub fn plan_listing(&self, params: &QueryParams) -> Result<QueryPlan, PlanError> {
        self.plan(Endpoint::Listing, params)
    }

    /// Plan a request for the ranking view.
    ///
    /// # Errors
    /// Returns [`PlanError`] for the first malformed parameter, checked in
    /// filter, sort, pagination order.
    pub fn plan_ranking(&self, params: &QueryParams) -> Result<QueryPlan, PlanError> {
        self.plan(Endpoint::Ranking, params)
    }

    /// Plan a request arriving on `endpoint`.
    ///
    /// # Errors
    /// Returns [`PlanError`] for the first malformed parameter, checked in
    /// filter, sort, pagination order.
    pub fn plan(&self, endpoint: Endpoint, params: &QueryParams) -> Result<QueryPlan, PlanError> {
        let filter = self.normalise_filter(endpoint, params)?;
        let sort = self.normalise_sort(params)?;
        let page = self.normalise_page(params)?;
        Ok(QueryPlan { filter, sort, page })
    }

    fn normalise_filter(
        &self,
        endpoint: Endpoint,
        params: &QueryParams,
    ) -> Result<FilterSpec, PlanError> {
        let category_id = params
            .categoria_id
            .as_deref()
            .map(parse_category)
            .transpose()?;
        let approved_only = if endpoint.accepts_approval_filter() {
            params
                .solo_aprobados
                .as_deref()
                .map(parse_flag)
                .transpose()?
                .unwrap_or(self.config.default_approved_only)
        } else {
            true
        };
        Ok(FilterSpec {
            category_id,
            approved_only,
        })
    }

    fn normalise_sort(&self, params: &QueryParams) -> Result<SortSpec, PlanError> {
        let field = match params.ordenar_por.as_deref() {
            Some(raw) => raw.parse::<SortField>().map_err(|_| PlanError::InvalidSort {
                parameter: PARAM_SORT_BY,
                value: raw.to_owned(),
                reason: "not a sortable field",
            })?,
            None => self.config.default_sort.field,
        };
        let direction = match params.orden.as_deref() {
            Some(raw) => raw
                .parse::<SortDirection>()
                .map_err(|_| PlanError::InvalidSort {
                    parameter: PARAM_SORT_DIRECTION,
                    value: raw.to_owned(),
                    reason: "expected 'asc' or 'desc'",
                })?,
            None => self.config.default_sort.direction,
        };
        Ok(SortSpec { field, direction })
    }

    fn normalise_page(&self, params: &QueryParams) -> Result<PageSpec, PlanError> {
        let limit = params
            .limite
            .as_deref()
            .map(|raw| parse_count(PARAM_LIMIT, raw))
            .transpose()?
            .unwrap_or(self.config.default_page.limit);
        let offset = params
            .saltar
            .as_deref()
            .map(|raw| parse_count(PARAM_OFFSET, raw))
            .transpose()?
            .unwrap_or(self.config.default_page.offset);
        Ok(PageSpec { limit, offset })
    }
}

fn parse_category(raw: &str) -> Result<CategoryId, PlanError> {
    if raw.trim().is_empty() {
        return Err(PlanError::InvalidFilter {
            parameter: PARAM_CATEGORY_ID,
            value: raw.to_owned(),
            reason: "category identifier must not be blank",
        });
    }
    Ok(CategoryId::new(raw))
}

fn parse_flag(raw: &str) -> Result<bool, PlanError> {
    if raw.eq_ignore_ascii_case("true") || raw == "1" {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") || raw == "0" {
        Ok(false)
    } else {
        Err(PlanError::InvalidFilter {
            parameter: PARAM_APPROVED_ONLY,
            value: raw.to_owned(),
            reason: "expected 'true' or 'false'",
        })
    }
}

fn parse_count(parameter: &'static str, raw: &str) -> Result<u32, PlanError> {
    let invalid = |reason| PlanError::InvalidPagination {
        parameter,
        value: raw.to_owned(),
        reason,
    };
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid("expected a non-negative integer"));
    }
    raw.parse::<u32>().map_err(|_| invalid("value is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn planner() -> RetrievalPlanner {
        RetrievalPlanner::default()
    }

    #[rstest]
    fn omitted_parameters_use_defaults(planner: RetrievalPlanner) {
        let plan = planner
            .plan_listing(&QueryParams::default())
            .expect("defaults are valid");
        assert_eq!(
            plan,
            QueryPlan {
                filter: FilterSpec {
                    category_id: None,
                    approved_only: true,
                },
                sort: SortSpec::BY_SCORE_DESC,
                page: PageSpec::new(50, 0),
            }
        );
    }

    #[rstest]
    #[case("false", false)]
    #[case("FALSE", false)]
    #[case("0", false)]
    #[case("true", true)]
    #[case("1", true)]
    fn listing_honours_approval_flag(
        planner: RetrievalPlanner,
        #[case] raw: &str,
        #[case] expected: bool,
    ) {
        let params = QueryParams::from_pairs([(PARAM_APPROVED_ONLY, raw)]);
        let plan = planner.plan_listing(&params).expect("valid flag");
        assert_eq!(plan.filter.approved_only, expected);
    }

    #[rstest]
    #[case("false")]
    #[case("0")]
    #[case("not-a-bool")]
    fn ranking_forces_approved_only(planner: RetrievalPlanner, #[case] raw: &str) {
        let params = QueryParams::from_pairs([(PARAM_APPROVED_ONLY, raw)]);
        let plan = planner.plan_ranking(&params).expect("ranking ignores flag");
        assert!(plan.filter.approved_only);
    }

    #[rstest]
    fn ranking_ignores_configured_listing_default() {
        let planner = RetrievalPlanner::new(PlannerConfig {
            default_approved_only: false,
            ..PlannerConfig::default()
        });
        let ranking = planner
            .plan_ranking(&QueryParams::default())
            .expect("valid ranking");
        let listing = planner
            .plan_listing(&QueryParams::default())
            .expect("valid listing");
        assert!(ranking.filter.approved_only);
        assert!(!listing.filter.approved_only);
    }

    #[rstest]
    #[case("yes")]
    #[case("")]
    #[case("2")]
    fn listing_rejects_malformed_flag(planner: RetrievalPlanner, #[case] raw: &str) {
        let params = QueryParams::from_pairs([(PARAM_APPROVED_ONLY, raw)]);
        let err = planner.plan_listing(&params).expect_err("flag should fail");
        assert!(matches!(
            err,
            PlanError::InvalidFilter {
                parameter: PARAM_APPROVED_ONLY,
                ..
            }
        ));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_category_is_invalid_filter(planner: RetrievalPlanner, #[case] raw: &str) {
        let params = QueryParams::from_pairs([(PARAM_CATEGORY_ID, raw)]);
        let err = planner.plan_ranking(&params).expect_err("blank category");
        assert_eq!(err.parameter(), PARAM_CATEGORY_ID);
        assert_eq!(err.value(), raw);
    }

    #[rstest]
    fn category_passes_through_untouched(planner: RetrievalPlanner) {
        let params = QueryParams::from_pairs([(PARAM_CATEGORY_ID, " Tapas-01 ")]);
        let plan = planner.plan_listing(&params).expect("opaque category");
        assert_eq!(plan.filter.category_id, Some(CategoryId::new(" Tapas-01 ")));
    }

    #[rstest]
    #[case("nombre", "asc", SortField::Name, SortDirection::Asc)]
    #[case("likes", "DESC", SortField::Likes, SortDirection::Desc)]
    #[case("fechaCreacion", "asc", SortField::CreatedAt, SortDirection::Asc)]
    fn sort_can_be_overridden(
        planner: RetrievalPlanner,
        #[case] field: &str,
        #[case] direction: &str,
        #[case] expected_field: SortField,
        #[case] expected_direction: SortDirection,
    ) {
        let params =
            QueryParams::from_pairs([(PARAM_SORT_BY, field), (PARAM_SORT_DIRECTION, direction)]);
        let plan = planner.plan_ranking(&params).expect("valid sort");
        assert_eq!(plan.sort.field, expected_field);
        assert_eq!(plan.sort.direction, expected_direction);
    }

    #[rstest]
    fn direction_alone_keeps_default_field(planner: RetrievalPlanner) {
        let params = QueryParams::from_pairs([(PARAM_SORT_DIRECTION, "asc")]);
        let plan = planner.plan_listing(&params).expect("valid sort");
        assert_eq!(plan.sort.field, SortField::Score);
        assert_eq!(plan.sort.direction, SortDirection::Asc);
    }

    #[rstest]
    #[case(PARAM_SORT_DIRECTION, "sideways")]
    #[case(PARAM_SORT_BY, "estrellas")]
    #[case(PARAM_SORT_BY, "")]
    fn unknown_sort_tokens_are_rejected(
        planner: RetrievalPlanner,
        #[case] parameter: &'static str,
        #[case] raw: &str,
    ) {
        let params = QueryParams::from_pairs([(parameter, raw)]);
        let err = planner.plan_listing(&params).expect_err("sort should fail");
        assert!(matches!(err, PlanError::InvalidSort { .. }));
        assert_eq!(err.parameter(), parameter);
    }

    #[rstest]
    #[case(PARAM_LIMIT, "abc")]
    #[case(PARAM_LIMIT, "-1")]
    #[case(PARAM_LIMIT, "+5")]
    #[case(PARAM_LIMIT, "1.5")]
    #[case(PARAM_LIMIT, " 5")]
    #[case(PARAM_LIMIT, "")]
    #[case(PARAM_LIMIT, "99999999999")]
    #[case(PARAM_OFFSET, "-10")]
    #[case(PARAM_OFFSET, "ten")]
    fn malformed_pagination_is_rejected(
        planner: RetrievalPlanner,
        #[case] parameter: &'static str,
        #[case] raw: &str,
    ) {
        let params = QueryParams::from_pairs([(parameter, raw)]);
        let err = planner.plan_listing(&params).expect_err("pagination should fail");
        assert!(matches!(err, PlanError::InvalidPagination { .. }));
        assert_eq!(err.parameter(), parameter);
    }

    #[rstest]
    #[case("0", "0", 0, 0)]
    #[case("10", "20", 10, 20)]
    #[case("007", "4294967295", 7, u32::MAX)]
    fn numeric_pagination_is_accepted(
        planner: RetrievalPlanner,
        #[case] limit: &str,
        #[case] offset: &str,
        #[case] expected_limit: u32,
        #[case] expected_offset: u32,
    ) {
        let params = QueryParams::from_pairs([(PARAM_LIMIT, limit), (PARAM_OFFSET, offset)]);
        let plan = planner.plan_listing(&params).expect("valid pagination");
        assert_eq!(plan.page, PageSpec::new(expected_limit, expected_offset));
    }

    #[rstest]
    fn filter_errors_are_reported_before_sort_and_page(planner: RetrievalPlanner) {
        let params = QueryParams::from_pairs([
            (PARAM_LIMIT, "abc"),
            (PARAM_SORT_DIRECTION, "sideways"),
            (PARAM_APPROVED_ONLY, "maybe"),
        ]);
        let err = planner.plan_listing(&params).expect_err("several invalid fields");
        assert!(matches!(err, PlanError::InvalidFilter { .. }));
    }

    #[rstest]
    fn configured_defaults_apply() {
        let planner = RetrievalPlanner::new(PlannerConfig {
            default_sort: SortSpec {
                field: SortField::Name,
                direction: SortDirection::Asc,
            },
            default_page: PageSpec::new(10, 0),
            default_approved_only: true,
        });
        let plan = planner
            .plan_listing(&QueryParams::default())
            .expect("defaults are valid");
        assert_eq!(plan.sort.field, SortField::Name);
        assert_eq!(plan.page.limit, 10);
    }
}
