//! Error types for rev-content

/// Result type for rev-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rev-content operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid section name {name:?}: {reason}")]
    InvalidSectionName { name: String, reason: String },

    #[error("Type tag {tag:?} is mapped to both {first} and {second}")]
    ConflictingTypeTag {
        tag: String,
        first: String,
        second: String,
    },

    #[error("Section {section} lists an empty type tag")]
    EmptyTypeTag { section: String },

    #[error("Invalid document id: {0}")]
    InvalidDocumentId(#[from] uuid::Error),
}

impl Error {
    pub fn section_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSectionName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
