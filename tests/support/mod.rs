//! Shared fixtures for integration tests.
//!
//! A [`ManifestDir`] is a temporary project holding a main `package.json` and
//! an empty `packages/` directory that tests fill with secondary manifests.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

pub struct ManifestDir {
    dir: TempDir,
}

impl ManifestDir {
    /// Create the project with `main` as its `package.json`.
    pub fn new(main: &Value) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        fs::create_dir(dir.path().join("packages")).expect("create packages dir");
        fs::write(dir.path().join("package.json"), main.to_string()).expect("write main manifest");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn packages(&self) -> PathBuf {
        self.dir.path().join("packages")
    }

    pub fn add_package(&self, file_name: &str, manifest: &Value) {
        fs::write(self.packages().join(file_name), manifest.to_string())
            .expect("write secondary manifest");
    }

    /// Write `content` to `file_name` at the project root and return its path.
    pub fn write_file(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(file_name);
        fs::write(&path, content).expect("write file");
        path
    }

    pub fn read(&self, path: &Path) -> Value {
        let text = fs::read_to_string(path).expect("read manifest");
        serde_json::from_str(&text).expect("parse manifest")
    }

    pub fn read_main(&self) -> Value {
        self.read(&self.dir.path().join("package.json"))
    }
}
