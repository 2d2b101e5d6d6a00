//! `list` and `ranking` command implementations.
//!
//! Both commands accept the same raw strings an HTTP caller would send, so a
//! malformed `--limite` fails exactly like a malformed `limite` query
//! parameter does.

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use restorank_core::{
    Endpoint, QueryParams, Restaurant, RestaurantStore, RetrievalPlanner, SqliteRestaurantStore,
};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::{
    ARG_APPROVED_ONLY, ARG_CATEGORY_ID, ARG_DATABASE, ARG_LIMIT, ARG_OFFSET, ARG_SORT_BY,
    ARG_SORT_DIRECTION, CliError, ENV_LIST_DATABASE, ENV_RANKING_DATABASE, require_existing,
    write_json,
};

/// CLI arguments for the `list` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "list",
    long_about = "List restaurants from a SQLite database. Filters, sorting \
                 and pagination use the same raw values as the HTTP listing \
                 endpoint; the database path can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "List restaurants with optional filters"
)]
#[ortho_config(prefix = "RESTORANK")]
pub(crate) struct ListArgs {
    /// Path to the SQLite restaurant database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Only return restaurants in this category.
    #[arg(long = ARG_CATEGORY_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) categoria_id: Option<String>,
    /// Sort field (puntuacion, nombre, calificacionPromedio, likes, fechaCreacion).
    #[arg(long = ARG_SORT_BY, value_name = "field")]
    #[serde(default)]
    pub(crate) ordenar_por: Option<String>,
    /// Sort direction (asc or desc).
    #[arg(long = ARG_SORT_DIRECTION, value_name = "direction")]
    #[serde(default)]
    pub(crate) orden: Option<String>,
    /// Whether to hide unapproved restaurants (true, false, 1 or 0).
    #[arg(long = ARG_APPROVED_ONLY, value_name = "flag")]
    #[serde(default)]
    pub(crate) solo_aprobados: Option<String>,
    /// Maximum number of restaurants to return.
    #[arg(long = ARG_LIMIT, value_name = "count", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) limite: Option<String>,
    /// Number of restaurants to skip.
    #[arg(long = ARG_OFFSET, value_name = "count", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) saltar: Option<String>,
}

impl ListArgs {
    pub(crate) fn into_config(self) -> Result<QueryConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        QueryConfig::try_from(merged)
    }
}

/// CLI arguments for the `ranking` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "ranking",
    long_about = "Show the ranking view: approved restaurants only, ordered \
                 by score unless another sort is requested.",
    about = "Show the approved-only ranking"
)]
#[ortho_config(prefix = "RESTORANK")]
pub(crate) struct RankingArgs {
    /// Path to the SQLite restaurant database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Only rank restaurants in this category.
    #[arg(long = ARG_CATEGORY_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) categoria_id: Option<String>,
    /// Sort field (puntuacion, nombre, calificacionPromedio, likes, fechaCreacion).
    #[arg(long = ARG_SORT_BY, value_name = "field")]
    #[serde(default)]
    pub(crate) ordenar_por: Option<String>,
    /// Sort direction (asc or desc).
    #[arg(long = ARG_SORT_DIRECTION, value_name = "direction")]
    #[serde(default)]
    pub(crate) orden: Option<String>,
    /// Maximum number of restaurants to return.
    #[arg(long = ARG_LIMIT, value_name = "count", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) limite: Option<String>,
    /// Number of restaurants to skip.
    #[arg(long = ARG_OFFSET, value_name = "count", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) saltar: Option<String>,
}

impl RankingArgs {
    pub(crate) fn into_config(self) -> Result<QueryConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        QueryConfig::try_from(merged)
    }
}

/// Resolved configuration shared by `list` and `ranking`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QueryConfig {
    /// Which surface's rules the parameters are planned under.
    pub(crate) endpoint: Endpoint,
    /// Path to the SQLite database.
    pub(crate) database: Utf8PathBuf,
    /// Raw query parameters, validated by the planner.
    pub(crate) params: QueryParams,
}

impl QueryConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.database, ARG_DATABASE)
    }
}

impl TryFrom<ListArgs> for QueryConfig {
    type Error = CliError;

    fn try_from(args: ListArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_LIST_DATABASE,
        })?;
        Ok(Self {
            endpoint: Endpoint::Listing,
            database,
            params: QueryParams {
                categoria_id: args.categoria_id,
                ordenar_por: args.ordenar_por,
                orden: args.orden,
                solo_aprobados: args.solo_aprobados,
                limite: args.limite,
                saltar: args.saltar,
            },
        })
    }
}

impl TryFrom<RankingArgs> for QueryConfig {
    type Error = CliError;

    fn try_from(args: RankingArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_RANKING_DATABASE,
        })?;
        Ok(Self {
            endpoint: Endpoint::Ranking,
            database,
            params: QueryParams {
                categoria_id: args.categoria_id,
                ordenar_por: args.ordenar_por,
                orden: args.orden,
                solo_aprobados: None,
                limite: args.limite,
                saltar: args.saltar,
            },
        })
    }
}

pub(super) fn run_list_with(args: ListArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_query_with(&config, writer)
}

pub(super) fn run_ranking_with(args: RankingArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_query_with(&config, writer)
}

/// Plan, execute and print one query.
///
/// The plan is built before the database is touched, so invalid parameters
/// are reported even when the database path is wrong.
pub(super) fn run_query_with(config: &QueryConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let restaurants = execute_query(config)?;
    write_json(writer, &restaurants)
}

fn execute_query(config: &QueryConfig) -> Result<Vec<Restaurant>, CliError> {
    let plan = RetrievalPlanner::default().plan(config.endpoint, &config.params)?;
    config.validate_sources()?;
    let store = SqliteRestaurantStore::open(config.database.as_std_path())?;
    log::debug!(
        "running {:?} plan against {}",
        config.endpoint,
        config.database
    );
    Ok(store.list_restaurants(&plan)?.collect())
}

#[cfg(test)]
pub(crate) fn list_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<QueryConfig, CliError> {
    let merged = ListArgs::merge_from_layers(layers).map_err(CliError::from)?;
    QueryConfig::try_from(merged)
}
