//! Revision publishing
//!
//! The [`Publisher`] previews a revision against its parent document with
//! [`Publisher::compare`] and commits it with [`Publisher::publish`]. Publish
//! replaces every target section of the document with the revision's blocks
//! of that section, bumps each target section's version, and records the
//! section diff in the changelog. Everything outside the target sections is
//! left alone on the document side and discarded on the revision side.
//!
//! State is passed in and handed back: the publisher owns no storage, and
//! `publish` either returns every new value or an error.

mod merge;
mod report;

pub use report::{PublishNotice, PublishReport, SectionReport};

use crate::changelog::Changelog;
use crate::clock::Clock;
use crate::config::PublishSettings;
use crate::error::{Error, Result};
use crate::revision::Revision;
use crate::version::{IncrementKind, VersionState};
use indexmap::IndexMap;
use rev_content::{DiffResult, Differ, Document, Section, SectionClassifier};
use std::collections::BTreeMap;

/// Caller-chosen increment per target section
pub type IncrementKinds = BTreeMap<Section, IncrementKind>;

/// Everything produced by a publish
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    pub document: Document,
    pub versions: VersionState,
    pub changelog: Changelog,
    /// The revision, now in the published state
    pub revision: Revision,
    pub report: PublishReport,
}

/// Compares and publishes revisions under one classification table
#[derive(Debug, Clone)]
pub struct Publisher {
    classifier: SectionClassifier,
    settings: PublishSettings,
}

impl Publisher {
    pub fn new(classifier: SectionClassifier, settings: PublishSettings) -> Self {
        Self {
            classifier,
            settings,
        }
    }

    pub fn classifier(&self) -> &SectionClassifier {
        &self.classifier
    }

    pub fn settings(&self) -> &PublishSettings {
        &self.settings
    }

    fn differ(&self) -> Differ {
        Differ::new(self.settings.duplicate_keys)
    }

    fn validate_targets(&self, revision: &Revision) -> Result<()> {
        match revision
            .targets()
            .iter()
            .find(|section| !self.classifier.recognizes(section))
        {
            Some(section) => Err(Error::InvalidTarget {
                section: section.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn validate_parent(document: &Document, revision: &Revision) -> Result<()> {
        if revision.parent() != document.id {
            return Err(Error::ParentMismatch {
                expected: revision.parent(),
                actual: document.id,
            });
        }
        Ok(())
    }

    /// Preview the per-section changes a publish would make
    ///
    /// Returns one diff per target section, in target order. Nothing is
    /// modified.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTarget` if a target is not a declared section and
    /// `ParentMismatch` if the revision does not belong to `document`.
    pub fn compare(
        &self,
        document: &Document,
        revision: &Revision,
    ) -> Result<IndexMap<Section, DiffResult>> {
        self.validate_targets(revision)?;
        Self::validate_parent(document, revision)?;

        let differ = self.differ();
        let diffs = revision
            .targets()
            .iter()
            .map(|section| {
                let old = self.classifier.blocks_in(document.blocks(), section);
                let new = self.classifier.blocks_in(revision.document().blocks(), section);
                (section.clone(), differ.diff(old, new))
            })
            .collect();
        Ok(diffs)
    }

    /// Publish a revision into its parent document
    ///
    /// Target sections without an entry in `increments` are bumped with the
    /// configured default increment. An empty target set publishes nothing
    /// and returns the state unchanged.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyPublished`, `InvalidTarget` or `ParentMismatch`. No
    /// state is changed on error.
    pub fn publish(
        &self,
        document: Document,
        mut revision: Revision,
        versions: VersionState,
        changelog: Changelog,
        increments: &IncrementKinds,
        clock: &dyn Clock,
    ) -> Result<PublishOutcome> {
        if revision.is_published() {
            return Err(Error::AlreadyPublished);
        }
        self.validate_targets(&revision)?;
        Self::validate_parent(&document, &revision)?;

        let mut report = PublishReport::default();

        if revision.targets().is_empty() {
            tracing::debug!(document = %document.id, "Revision has no targets, nothing to publish");
            revision.mark_published();
            return Ok(PublishOutcome {
                document,
                versions,
                changelog,
                revision,
                report,
            });
        }

        let differ = self.differ();
        let mut versions = versions;
        let mut changelog = changelog;
        let mut replacements: IndexMap<Section, Vec<_>> = IndexMap::new();

        for section in revision.targets() {
            let old = self.classifier.blocks_in(document.blocks(), section);
            let new = self.classifier.blocks_in(revision.document().blocks(), section);
            let (diff, stats) = differ.diff_with_stats(old, new.iter().copied());
            replacements.insert(section.clone(), new.into_iter().cloned().collect());

            let kind = increments
                .get(section)
                .copied()
                .unwrap_or(self.settings.default_increment);
            let previous = versions.get(section);
            versions = versions.increment(section, kind)?;
            let version = versions.get(section);

            tracing::debug!(%section, %kind, %previous, %version, summary = %diff.summary(), "Publishing section");

            if diff.is_empty() {
                tracing::warn!(%section, %version, "Version bumped with no changes");
                report.notices.push(PublishNotice::EmptyDiff {
                    section: section.clone(),
                    version,
                });
            }
            if stats.collapsed() > 0 {
                tracing::warn!(%section, count = stats.collapsed(), "Duplicate block identities collapsed");
                report.notices.push(PublishNotice::CollapsedDuplicates {
                    section: section.clone(),
                    count: stats.collapsed(),
                });
            }

            report.sections.push(SectionReport {
                section: section.clone(),
                kind,
                previous,
                version,
                summary: diff.summary(),
            });
            changelog = changelog.record(section, version, diff, clock);
        }

        let id = document.id;
        let blocks = merge::assemble(
            &self.classifier,
            document.into_blocks(),
            revision.targets(),
            replacements,
            self.settings.merge_order,
        );
        revision.mark_published();

        tracing::info!(
            document = %id,
            sections = report.sections.len(),
            "Published revision"
        );

        Ok(PublishOutcome {
            document: Document::new(id, blocks),
            versions,
            changelog,
            revision,
            report,
        })
    }
}
