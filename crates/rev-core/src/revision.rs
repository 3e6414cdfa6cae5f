//! Revision type and its lifecycle
//!
//! A revision is a full alternate document proposed for one or more sections
//! of its parent. It moves `Draft -> Compared -> Published`; `Compared` only
//! records that a preview was taken and is not required before publishing.

use crate::error::{Error, Result};
use indexmap::IndexSet;
use rev_content::{Document, DocumentId, Section};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a revision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevisionStatus {
    #[default]
    Draft,
    Compared,
    Published,
}

impl fmt::Display for RevisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Compared => write!(f, "compared"),
            Self::Published => write!(f, "published"),
        }
    }
}

/// A proposed replacement for sections of a parent document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// Identity of the document this revision applies to
    parent: DocumentId,
    /// Sections to replace, in publish order
    #[serde(default)]
    targets: IndexSet<Section>,
    /// The proposed document
    document: Document,
    #[serde(default)]
    status: RevisionStatus,
}

impl Revision {
    /// Create a draft revision
    ///
    /// Duplicate targets are kept once, at their first position.
    pub fn new(
        parent: DocumentId,
        document: Document,
        targets: impl IntoIterator<Item = Section>,
    ) -> Self {
        Self {
            parent,
            targets: targets.into_iter().collect(),
            document,
            status: RevisionStatus::Draft,
        }
    }

    pub fn parent(&self) -> DocumentId {
        self.parent
    }

    pub fn targets(&self) -> &IndexSet<Section> {
        &self.targets
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn status(&self) -> RevisionStatus {
        self.status
    }

    pub fn is_published(&self) -> bool {
        self.status == RevisionStatus::Published
    }

    /// Record that a preview was taken
    ///
    /// # Errors
    ///
    /// Returns `AlreadyPublished` once the revision is published.
    pub fn mark_compared(&mut self) -> Result<()> {
        if self.is_published() {
            return Err(Error::AlreadyPublished);
        }
        self.status = RevisionStatus::Compared;
        Ok(())
    }

    pub(crate) fn mark_published(&mut self) {
        self.status = RevisionStatus::Published;
    }
}
