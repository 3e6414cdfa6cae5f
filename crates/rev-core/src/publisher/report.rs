//! Publish report types

use crate::version::{IncrementKind, VersionNumber};
use rev_content::{DiffSummary, Section};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a publish did to one target section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionReport {
    pub section: Section,
    pub kind: IncrementKind,
    pub previous: VersionNumber,
    pub version: VersionNumber,
    pub summary: DiffSummary,
}

/// Conditions worth surfacing that did not stop the publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "notice", rename_all = "kebab-case")]
pub enum PublishNotice {
    /// A section version was bumped although its diff was empty
    EmptyDiff {
        section: Section,
        version: VersionNumber,
    },
    /// Identity collapsing dropped blocks while indexing a section
    CollapsedDuplicates { section: Section, count: usize },
}

impl fmt::Display for PublishNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDiff { section, version } => {
                write!(f, "{} bumped to {} with no changes", section, version)
            }
            Self::CollapsedDuplicates { section, count } => write!(
                f,
                "{} block(s) in {} share an identity and were collapsed",
                count, section
            ),
        }
    }
}

/// Summary of a completed publish
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReport {
    /// One entry per target section, in target order
    pub sections: Vec<SectionReport>,
    #[serde(default)]
    pub notices: Vec<PublishNotice>,
}

impl PublishReport {
    /// True when no section was published
    pub fn is_noop(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section(&self, section: &Section) -> Option<&SectionReport> {
        self.sections.iter().find(|s| &s.section == section)
    }
}
