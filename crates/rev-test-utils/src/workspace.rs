//! [`TestWorkspace`] for file-backed test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use rev_content::{Document, DocumentId, Section};
use serde_json::json;
use tempfile::TempDir;

use crate::fixtures::HANDBOOK_CONFIG;

/// A temporary directory with helpers for writing the files the `rev` binary
/// reads.
///
/// # Example
///
/// ```rust,no_run
/// use rev_test_utils::fixtures::handbook;
/// use rev_test_utils::workspace::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// ws.write_config();
/// let doc = ws.write_document("doc.json", &handbook());
/// assert!(doc.exists());
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Write the handbook `rev.toml`.
    pub fn write_config(&self) -> PathBuf {
        self.write_config_with(HANDBOOK_CONFIG)
    }

    /// Write `rev.toml` with custom content.
    pub fn write_config_with(&self, content: &str) -> PathBuf {
        let path = self.path("rev.toml");
        fs::write(&path, content).unwrap();
        path
    }

    pub fn write_document(&self, name: &str, document: &Document) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, serde_json::to_string_pretty(document).unwrap()).unwrap();
        path
    }

    /// Write a draft revision of `parent` proposing `document` for `targets`.
    pub fn write_revision(
        &self,
        name: &str,
        parent: DocumentId,
        document: &Document,
        targets: &[Section],
    ) -> PathBuf {
        let revision = json!({
            "parent": parent,
            "targets": targets,
            "document": document,
        });
        let path = self.path(name);
        fs::write(&path, serde_json::to_string_pretty(&revision).unwrap()).unwrap();
        path
    }

    pub fn read_document(&self, name: &str) -> Document {
        serde_json::from_str(&self.read(name)).unwrap()
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name)).unwrap()
    }
}
