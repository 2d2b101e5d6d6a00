//! Unit tests for the shared CLI helpers.

use super::helpers::write_utf8;
use super::*;
use camino::Utf8PathBuf;
use rstest::rstest;
use std::io;
use tempfile::TempDir;

fn workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

#[rstest]
fn require_existing_accepts_files() {
    let (_tmp, root) = workspace();
    let path = root.join("restaurants.db");
    write_utf8(&path, b"db");
    assert!(require_existing(&path, ARG_DATABASE).is_ok());
}

#[rstest]
fn require_existing_reports_missing_files() {
    let (_tmp, root) = workspace();
    let path = root.join("missing.db");
    let err = require_existing(&path, ARG_DATABASE).expect_err("missing file");
    match err {
        CliError::MissingSourceFile { field, path: reported } => {
            assert_eq!(field, ARG_DATABASE);
            assert_eq!(reported, path);
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn require_existing_rejects_directories() {
    let (_tmp, root) = workspace();
    let err = require_existing(&root, ARG_SCORING).expect_err("directory");
    match err {
        CliError::SourcePathNotFile { field, path } => {
            assert_eq!(field, ARG_SCORING);
            assert_eq!(path, root);
        }
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn missing_argument_message_names_flag_and_variable() {
    let err = CliError::MissingArgument {
        field: ARG_DATABASE,
        env: ENV_LIST_DATABASE,
    };
    assert_eq!(
        err.to_string(),
        "missing database (set --database or RESTORANK_CMDS_LIST_DATABASE)"
    );
}

struct FailingWriter;

impl io::Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[rstest]
fn write_json_appends_a_newline() {
    let mut output = Vec::new();
    write_json(&mut output, &serde_json::json!({ "updated": 1 })).expect("write json");
    assert_eq!(output, b"{\n  \"updated\": 1\n}\n");
}

#[rstest]
fn write_failures_are_reported() {
    let err = write_json(&mut FailingWriter, &serde_json::json!([])).expect_err("write fails");
    assert!(matches!(err, CliError::WriteOutput(_)), "found {err:?}");
}

#[rstest]
fn subcommands_parse_their_flags() {
    let cli = Cli::try_parse_from([
        "restorank",
        "ranking",
        "--database",
        "restaurants.db",
        "--categoria-id",
        "tapas",
        "--limite",
        "5",
    ])
    .expect("arguments should parse");
    match cli.command {
        Command::Ranking(args) => {
            assert_eq!(args.database, Some(Utf8PathBuf::from("restaurants.db")));
            assert_eq!(args.categoria_id.as_deref(), Some("tapas"));
            assert_eq!(args.limite.as_deref(), Some("5"));
        }
        other => panic!("expected ranking, found {other:?}"),
    }
}

#[rstest]
fn ranking_rejects_the_approval_flag() {
    let err = Cli::try_parse_from([
        "restorank",
        "ranking",
        "--solo-aprobados",
        "false",
    ])
    .expect_err("ranking has no approval flag");
    assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
}
