//! File-backed storage for documents, revisions, and publish state
//!
//! The state file holds the version state and changelog of one document:
//!
//! ```json
//! { "format": "1", "versions": { "guide": "0.2" }, "changelog": { ... } }
//! ```
//!
//! A publish holds a [`FileLock`] on the state file and on the revision for
//! its whole read-publish-write cycle; `compare` holds the revision's lock
//! while it records the compared status. Locks live in sidecar `<file>.lock`
//! files because writes replace the locked file itself.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use rev_core::{Changelog, VersionState};

use crate::error::{CliError, Result};

/// Current state file format
pub const STATE_FORMAT: &str = "1";

/// Persisted version state and changelog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    format: String,
    #[serde(default)]
    pub versions: VersionState,
    #[serde(default)]
    pub changelog: Changelog,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            format: STATE_FORMAT.to_string(),
            versions: VersionState::new(),
            changelog: Changelog::new(),
        }
    }
}

impl StateFile {
    /// Load the state file with a shared lock
    ///
    /// A missing file is an empty state: every section starts at the initial
    /// version with no changelog.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "State file not found, starting empty");
            return Ok(Self::default());
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        // Read through the locked handle
        let mut content = String::new();
        (&file).read_to_string(&mut content)?;
        let state: StateFile =
            serde_json::from_str(&content).map_err(|e| CliError::json(path, e))?;

        if state.format != STATE_FORMAT {
            return Err(CliError::user(format!(
                "{}: unsupported state format {:?} (expected {:?})",
                path.display(),
                state.format,
                STATE_FORMAT
            )));
        }
        Ok(state)
    }

    /// Write the state to a temp file beside `path` without replacing it
    pub fn stage(&self, path: &Path) -> Result<StagedFile> {
        stage_json(path, self)
    }
}

/// Exclusive advisory lock serializing writers of one file
///
/// Released when dropped.
#[derive(Debug)]
pub struct FileLock {
    _file: File,
    path: PathBuf,
}

impl FileLock {
    /// Block until the lock for `target` is held
    pub fn acquire(target: &Path) -> Result<Self> {
        let path = lock_path(target);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        file.lock_exclusive()?;
        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn lock_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    target.with_file_name(name)
}

/// Read and parse a JSON file, naming the file in parse errors
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        CliError::user(format!("cannot read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| CliError::json(path, e))
}

/// Serialize `value` as pretty JSON and write it atomically: temp file in
/// the same directory, then rename
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    stage_json(path, value)?.commit()
}

/// Serialize `value` as pretty JSON into a staged temp file for `path`
pub fn stage_json<T: Serialize>(path: &Path, value: &T) -> Result<StagedFile> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    stage_atomic(path, content.as_bytes())
}

/// Write content to a synced temp file in `path`'s directory
///
/// The target is untouched until [`StagedFile::commit`] renames the temp file
/// over it.
pub fn stage_atomic(path: &Path, content: &[u8]) -> Result<StagedFile> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let staged = StagedFile {
        temp: path.with_file_name(&temp_name),
        target: path.to_path_buf(),
        committed: false,
    };

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&staged.temp)?;
    temp_file.lock_exclusive()?;
    temp_file.write_all(content)?;
    temp_file.sync_all()?;
    temp_file.unlock()?;

    Ok(staged)
}

/// A fully written temp file waiting to replace its target
///
/// Dropping it without committing removes the temp file.
#[derive(Debug)]
pub struct StagedFile {
    temp: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedFile {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rename the temp file over the target
    pub fn commit(mut self) -> Result<()> {
        fs::rename(&self.temp, &self.target)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed
            && let Err(e) = fs::remove_file(&self.temp)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = ?self.temp, error = %e, "Failed to remove staged file");
        }
    }
}
