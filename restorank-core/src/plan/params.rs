//! Raw, unvalidated query parameters as callers send them.

/// Wire name of the category filter.
pub const PARAM_CATEGORY_ID: &str = "categoriaId";
/// Wire name of the sort field.
pub const PARAM_SORT_BY: &str = "ordenarPor";
/// Wire name of the sort direction.
pub const PARAM_SORT_DIRECTION: &str = "orden";
/// Wire name of the approval filter.
pub const PARAM_APPROVED_ONLY: &str = "soloAprobados";
/// Wire name of the page size.
pub const PARAM_LIMIT: &str = "limite";
/// Wire name of the page offset.
pub const PARAM_OFFSET: &str = "saltar";

/// Which surface a request arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// General restaurant listing; the caller controls `soloAprobados`.
    Listing,
    /// Public ranking view; only approved restaurants are ever returned.
    Ranking,
}

impl Endpoint {
    /// Whether the endpoint honours the `soloAprobados` parameter.
    #[must_use]
    pub const fn accepts_approval_filter(self) -> bool {
        matches!(self, Self::Listing)
    }
}

/// Query parameters exactly as received, before any validation.
///
/// Absent parameters are `None`; present parameters keep their raw text so
/// the planner can report precisely what was wrong with them.
///
/// # Examples
/// ```
/// use restorank_core::QueryParams;
///
/// let params = QueryParams::from_pairs([("limite", "10"), ("utm_source", "mail")]);
/// assert_eq!(params.limite.as_deref(), Some("10"));
/// assert!(params.saltar.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct QueryParams {
    /// Raw `categoriaId`.
    pub categoria_id: Option<String>,
    /// Raw `ordenarPor`.
    pub ordenar_por: Option<String>,
    /// Raw `orden`.
    pub orden: Option<String>,
    /// Raw `soloAprobados`.
    pub solo_aprobados: Option<String>,
    /// Raw `limite`.
    pub limite: Option<String>,
    /// Raw `saltar`.
    pub saltar: Option<String>,
}

impl QueryParams {
    /// Collect parameters from decoded query-string pairs.
    ///
    /// Unknown keys are ignored. When a key repeats, the last value wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                PARAM_CATEGORY_ID => &mut params.categoria_id,
                PARAM_SORT_BY => &mut params.ordenar_por,
                PARAM_SORT_DIRECTION => &mut params.orden,
                PARAM_APPROVED_ONLY => &mut params.solo_aprobados,
                PARAM_LIMIT => &mut params.limite,
                PARAM_OFFSET => &mut params.saltar,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        params
    }
}
