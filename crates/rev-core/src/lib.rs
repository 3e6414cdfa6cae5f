//! Revision publishing engine
//!
//! This crate sits on top of `rev-content` and provides:
//!
//! - **Version manager**: per-section `major.minor[.hotfix]` versions
//! - **Changelog recorder**: one diff entry per section version
//! - **Publisher**: compare and publish revisions into their parent document
//! - **Configuration**: `rev.toml` classification table, publish settings, hooks
//!
//! ```text
//!        rev-cli
//!           |
//!       rev-core
//!           |
//!      rev-content
//! ```
//!
//! # Example
//!
//! ```
//! use rev_content::{Block, ClassificationTable, Document, DocumentId, SectionClassifier, SectionName};
//! use rev_core::{Changelog, IncrementKinds, PublishSettings, Publisher, Revision, SystemClock, VersionState};
//!
//! let table = ClassificationTable::new()
//!     .with_section(SectionName::new("guide").unwrap(), ["guide/step"]);
//! let publisher = Publisher::new(SectionClassifier::new(&table).unwrap(), PublishSettings::default());
//!
//! let document = Document::new(DocumentId::new(), vec![
//!     Block::new("guide/step").with_id(1).with_content("x"),
//! ]);
//! let revision = Revision::new(
//!     document.id,
//!     Document::new(DocumentId::new(), vec![Block::new("guide/step").with_id(1).with_content("x2")]),
//!     [rev_content::Section::named("guide").unwrap()],
//! );
//!
//! let outcome = publisher
//!     .publish(document, revision, VersionState::new(), Changelog::new(), &IncrementKinds::new(), &SystemClock)
//!     .unwrap();
//! assert_eq!(outcome.report.sections[0].version.to_string(), "0.2");
//! ```

pub mod changelog;
pub mod clock;
pub mod config;
pub mod error;
pub mod hooks;
pub mod publisher;
pub mod revision;
pub mod version;

pub use changelog::{Changelog, ChangelogEntry};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{MergeOrder, PublishSettings, RevisionConfig};
pub use error::{Error, Result};
pub use hooks::{HookConfig, HookContext, HookEvent, HookResult, run_hooks};
pub use publisher::{
    IncrementKinds, PublishNotice, PublishOutcome, PublishReport, Publisher, SectionReport,
};
pub use revision::{Revision, RevisionStatus};
pub use version::{IncrementKind, VersionNumber, VersionState};
