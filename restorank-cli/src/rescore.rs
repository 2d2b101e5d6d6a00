//! `rescore` command implementation.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use restorank_core::store::decode_timestamp;
use restorank_scorer::{RescoreSummary, ScoreCalculator, ScoringConfig, refresh_all_scores};
use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
};

use crate::{
    ARG_DATABASE, ARG_NOW, ARG_SCORING, CliError, ENV_RESCORE_DATABASE, require_existing,
    write_json,
};

/// CLI arguments for the `rescore` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "rescore",
    long_about = "Recompute the stored ranking score of every restaurant \
                 from its ratings, reactions and review recency. Scores are \
                 evaluated at the current time unless --now is given.",
    about = "Recompute stored ranking scores"
)]
#[ortho_config(prefix = "RESTORANK")]
pub(crate) struct RescoreArgs {
    /// Path to the SQLite restaurant database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Evaluation instant as an RFC 3339 timestamp.
    #[arg(long = ARG_NOW, value_name = "timestamp")]
    #[serde(default)]
    pub(crate) now: Option<String>,
    /// JSON file overriding the scoring weights, rating bounds or recency schedule.
    #[arg(long = ARG_SCORING, value_name = "path")]
    #[serde(default)]
    pub(crate) scoring: Option<Utf8PathBuf>,
}

impl RescoreArgs {
    pub(crate) fn into_config(self) -> Result<RescoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RescoreConfig::try_from(merged)
    }
}

/// Resolved `rescore` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RescoreConfig {
    /// Path to the SQLite database.
    pub(crate) database: Utf8PathBuf,
    /// Fixed evaluation instant; `None` reads the clock.
    pub(crate) now: Option<DateTime<Utc>>,
    /// Optional scoring configuration file.
    pub(crate) scoring: Option<Utf8PathBuf>,
}

impl RescoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.database, ARG_DATABASE)?;
        if let Some(path) = &self.scoring {
            require_existing(path, ARG_SCORING)?;
        }
        Ok(())
    }
}

impl TryFrom<RescoreArgs> for RescoreConfig {
    type Error = CliError;

    fn try_from(args: RescoreArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_RESCORE_DATABASE,
        })?;
        let now = args
            .now
            .map(|value| {
                decode_timestamp(&value).map_err(|source| CliError::InvalidNow { value, source })
            })
            .transpose()?;
        Ok(Self {
            database,
            now,
            scoring: args.scoring,
        })
    }
}

pub(super) fn run_rescore_with(
    args: RescoreArgs,
    clock: fn() -> DateTime<Utc>,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let summary = execute_rescore(args, clock)?;
    write_json(writer, &summary)
}

fn execute_rescore(
    args: RescoreArgs,
    clock: fn() -> DateTime<Utc>,
) -> Result<RescoreSummary, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let calculator = match &config.scoring {
        Some(path) => build_calculator(path)?,
        None => ScoreCalculator::default(),
    };
    let mut connection = Connection::open_with_flags(
        config.database.as_std_path(),
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|source| CliError::OpenDatabase {
        path: config.database.clone(),
        source,
    })?;
    let now = config.now.unwrap_or_else(clock);
    log::info!("rescoring {} as of {now}", config.database);
    Ok(refresh_all_scores(&mut connection, &calculator, now)?)
}

/// Loads and validates a JSON-encoded [`ScoringConfig`] from disk.
pub(super) fn build_calculator(path: &Utf8Path) -> Result<ScoreCalculator, CliError> {
    let file = File::open(path).map_err(|source| CliError::OpenScoringConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ScoringConfig = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        CliError::ParseScoringConfig {
            path: path.to_path_buf(),
            source,
        }
    })?;
    ScoreCalculator::new(config).map_err(|source| CliError::InvalidScoringConfig {
        path: path.to_path_buf(),
        source,
    })
}
