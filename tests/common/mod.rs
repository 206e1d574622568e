#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory for sample inputs and generated artifacts, removed on
/// drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` under the workspace and returns the full path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file");
        path
    }

    /// Lists the file names under `dir` (relative to the workspace), sorted.
    pub fn files_in(&self, dir: &str) -> Vec<String> {
        let mut names = fs::read_dir(self.path().join(dir))
            .expect("read dir")
            .map(|entry| {
                entry
                    .expect("dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path().join(relative)).expect("read workspace file")
    }
}

pub const USERS_JSON: &str = r#"[
    {"id": 1, "name": "Alice", "email": "alice@example.com", "price": 19.99, "joined": "2024-01-15", "tags": ["admin"]},
    {"id": 2, "name": "Bob", "email": null, "price": 5, "joined": "2024-02-01", "tags": []},
    {"id": 3, "name": "Carol", "price": 7.5, "joined": "2024-03-10", "tags": ["ops", "dev"]}
]"#;

pub const ORDERS_CSV: &str = "order_id,score,placed_on,notes\n\
1,20.5,2024-01-01,first order\n\
2,30,2024-02-01,\n\
3,12.125,2024-03-05,gift wrap\n";
