//! Block model, section classification, and block diffing
//!
//! Provides the value types a section-versioned document is built from and
//! the pure operations the publishing engine relies on:
//!
//! - **Block model**: typed blocks with sorted attributes and explicit children
//! - **Section classifier**: type tag to section lookup over an explicit table
//! - **Block indexer**: identity keys and content fingerprints
//! - **Differ**: added/removed/modified classification between block lists

pub mod block;
pub mod diff;
pub mod document;
pub mod error;
pub mod index;
pub mod section;

pub use block::{Block, ID_ATTRIBUTE};
pub use diff::{DiffResult, DiffSummary, Differ, IndexStats, ModifiedBlock, diff, diff_with};
pub use document::{Document, DocumentId};
pub use error::{Error, Result};
pub use index::{BlockIndex, BlockKey, DuplicatePolicy, Fingerprint, fingerprint, identify};
pub use section::{ClassificationTable, Section, SectionClassifier, SectionName};
