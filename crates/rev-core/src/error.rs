//! Error types for rev-core

use crate::version::{IncrementKind, VersionNumber};
use rev_content::DocumentId;

/// Result type for rev-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rev-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A revision targets a section the classifier does not declare
    #[error("Invalid target section: {section} is not a declared section")]
    InvalidTarget { section: String },

    /// A revision was applied to a document other than its parent
    #[error("Revision belongs to document {expected}, not {actual}")]
    ParentMismatch {
        expected: DocumentId,
        actual: DocumentId,
    },

    /// The revision has already reached the published state
    #[error("Revision has already been published")]
    AlreadyPublished,

    /// A version string could not be parsed
    #[error("Invalid version {input:?}: {reason}")]
    InvalidVersion { input: String, reason: String },

    /// Incrementing a version would overflow one of its components
    #[error("Cannot apply a {kind} increment to version {version}: component overflow")]
    VersionOverflow {
        version: VersionNumber,
        kind: IncrementKind,
    },

    /// An increment kind could not be parsed
    #[error("Invalid increment kind {input:?}: expected major, minor or hotfix")]
    InvalidIncrement { input: String },

    /// Configuration is structurally valid TOML but semantically wrong
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error from rev-content
    #[error(transparent)]
    Content(#[from] rev_content::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
