//! Error types emitted by the restorank CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use restorank_core::{PlanError, StoreError};
use restorank_scorer::{RescoreError, ScoringConfigError};
use thiserror::Error;

/// Errors emitted by the restorank CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The query flags did not form a valid plan.
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// Executing the plan against the database failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// `--now` was not an RFC 3339 timestamp.
    #[error("--now value {value:?} is not an RFC 3339 timestamp: {source}")]
    InvalidNow {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// Opening the scoring configuration file failed.
    #[error("failed to open scoring configuration at {path:?}: {source}")]
    OpenScoringConfig {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Scoring configuration JSON could not be decoded.
    #[error("failed to parse scoring configuration JSON at {path:?}: {source}")]
    ParseScoringConfig {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The scoring configuration failed validation.
    #[error("scoring configuration in {path:?} failed validation: {source}")]
    InvalidScoringConfig {
        path: Utf8PathBuf,
        #[source]
        source: ScoringConfigError,
    },
    /// Opening the database for writing failed.
    #[error("failed to open database {path:?} for rescoring: {source}")]
    OpenDatabase {
        path: Utf8PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    /// Recomputing stored scores failed.
    #[error(transparent)]
    Rescore(#[from] RescoreError),
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
