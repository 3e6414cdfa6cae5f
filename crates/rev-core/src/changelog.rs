//! Per-section, per-version changelog
//!
//! Each published section version has at most one entry holding the diff
//! that produced it. Recording a version that already has an entry replaces
//! that entry.

use crate::clock::Clock;
use crate::version::VersionNumber;
use chrono::{DateTime, Utc};
use rev_content::{DiffResult, Section};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The recorded change behind one published section version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    /// When the version was recorded
    pub timestamp: DateTime<Utc>,
    /// What changed in the section
    pub diff: DiffResult,
}

/// Changelog of every section, keyed by section then version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Changelog {
    sections: BTreeMap<Section, BTreeMap<VersionNumber, ChangelogEntry>>,
}

impl Changelog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `(section, version)`
    ///
    /// Entries for other versions and sections are left untouched.
    pub fn record(
        mut self,
        section: &Section,
        version: VersionNumber,
        diff: DiffResult,
        clock: &dyn Clock,
    ) -> Self {
        let entry = ChangelogEntry {
            timestamp: clock.now(),
            diff,
        };
        let replaced = self
            .sections
            .entry(section.clone())
            .or_default()
            .insert(version, entry);
        if replaced.is_some() {
            tracing::debug!(%section, %version, "Overwrote existing changelog entry");
        }
        self
    }

    pub fn entry(&self, section: &Section, version: &VersionNumber) -> Option<&ChangelogEntry> {
        self.sections.get(section)?.get(version)
    }

    /// Entries of one section, oldest version first
    pub fn entries(
        &self,
        section: &Section,
    ) -> impl Iterator<Item = (&VersionNumber, &ChangelogEntry)> {
        self.sections.get(section).into_iter().flat_map(|v| v.iter())
    }

    /// Entry of the highest recorded version of a section
    pub fn latest(&self, section: &Section) -> Option<(&VersionNumber, &ChangelogEntry)> {
        self.sections.get(section)?.iter().next_back()
    }

    /// Sections with at least one entry
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.keys()
    }

    /// Total number of entries across sections
    pub fn len(&self) -> usize {
        self.sections.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
