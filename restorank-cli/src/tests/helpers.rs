//! Test helpers for building restaurant databases and capturing output.

use camino::{Utf8Path, Utf8PathBuf};
use restorank_core::test_support::{sample_restaurants, write_sqlite_database};
use std::fs;
use tempfile::TempDir;

/// A temporary directory holding a SQLite database of sample restaurants.
pub(super) struct SampleDatabase {
    _dir: TempDir,
    root: Utf8PathBuf,
    path: Utf8PathBuf,
}

impl SampleDatabase {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let path = root.join("restaurants.db");
        write_sqlite_database(&path, sample_restaurants()).expect("write sample database");
        Self {
            _dir: dir,
            root,
            path,
        }
    }

    pub(super) fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path, contents).expect("write file");
}

/// Parse captured JSON output and return the `id` of each listed restaurant.
pub(super) fn listed_ids(output: &[u8]) -> Vec<String> {
    let value: serde_json::Value = serde_json::from_slice(output).expect("output is JSON");
    value
        .as_array()
        .expect("output is a JSON array")
        .iter()
        .map(|entry| {
            entry
                .get("id")
                .and_then(serde_json::Value::as_str)
                .expect("restaurant has an id")
                .to_owned()
        })
        .collect()
}
