//! Command-line interface for querying and maintaining restaurant rankings.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use chrono::Utc;
use clap::{Parser, Subcommand};

mod error;
mod list;
mod rescore;

pub use error::CliError;

use list::{ListArgs, RankingArgs};
use rescore::RescoreArgs;

pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_CATEGORY_ID: &str = "categoria-id";
pub(crate) const ARG_SORT_BY: &str = "ordenar-por";
pub(crate) const ARG_SORT_DIRECTION: &str = "orden";
pub(crate) const ARG_APPROVED_ONLY: &str = "solo-aprobados";
pub(crate) const ARG_LIMIT: &str = "limite";
pub(crate) const ARG_OFFSET: &str = "saltar";
pub(crate) const ARG_NOW: &str = "now";
pub(crate) const ARG_SCORING: &str = "scoring";
pub(crate) const ENV_LIST_DATABASE: &str = "RESTORANK_CMDS_LIST_DATABASE";
pub(crate) const ENV_RANKING_DATABASE: &str = "RESTORANK_CMDS_RANKING_DATABASE";
pub(crate) const ENV_RESCORE_DATABASE: &str = "RESTORANK_CMDS_RESCORE_DATABASE";

/// Run the restorank CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration, the database or the
/// requested operation fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::List(args) => list::run_list_with(args, &mut stdout),
        Command::Ranking(args) => list::run_ranking_with(args, &mut stdout),
        Command::Rescore(args) => rescore::run_rescore_with(args, Utc::now, &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "restorank",
    about = "Query and maintain restaurant rankings stored in SQLite",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List restaurants with optional filters, sorting and pagination.
    List(ListArgs),
    /// Show the approved-only ranking view.
    Ranking(RankingArgs),
    /// Recompute every stored ranking score.
    Rescore(RescoreArgs),
}

/// Check that `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match path.metadata() {
        Ok(metadata) if metadata.is_file() => Ok(()),
        Ok(_) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: serde::Serialize + ?Sized>(
    writer: &mut dyn std::io::Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
