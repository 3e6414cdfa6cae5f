//! Configuration parsing for rev.toml files
//!
//! The configuration declares the section classification table, publish
//! settings, and post-publish hooks:
//!
//! ```toml
//! [sections]
//! guide = ["guide/intro", "guide/step"]
//! procedure = ["procedure/step"]
//!
//! [publish]
//! merge_order = "append"
//! duplicate_keys = "collapse"
//! default_increment = "minor"
//!
//! [[hooks]]
//! event = "post-publish"
//! command = "echo"
//! args = ["${VERSIONS}"]
//! ```

use crate::Result;
use crate::error::Error;
use crate::hooks::HookConfig;
use crate::publisher::Publisher;
use crate::version::IncrementKind;
use rev_content::{ClassificationTable, DuplicatePolicy, SectionClassifier};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where published sections land in the merged document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeOrder {
    /// Untouched blocks first, then each published section in target order
    #[default]
    Append,
    /// Each published section replaces its blocks at the position where the
    /// section first appeared
    Preserve,
}

fn default_increment() -> IncrementKind {
    IncrementKind::Minor
}

/// Settings controlling how a publish is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishSettings {
    #[serde(default)]
    pub merge_order: MergeOrder,
    #[serde(default)]
    pub duplicate_keys: DuplicatePolicy,
    /// Increment used for a target section the caller gave no kind for
    #[serde(default = "default_increment")]
    pub default_increment: IncrementKind,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            merge_order: MergeOrder::default(),
            duplicate_keys: DuplicatePolicy::default(),
            default_increment: default_increment(),
        }
    }
}

/// Parsed rev.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevisionConfig {
    /// Section classification table
    #[serde(default)]
    pub sections: ClassificationTable,

    #[serde(default)]
    pub publish: PublishSettings,

    #[serde(default)]
    pub hooks: Vec<HookConfig>,
}

impl RevisionConfig {
    /// Parse configuration from TOML content
    ///
    /// # Example
    ///
    /// ```
    /// use rev_core::config::{MergeOrder, RevisionConfig};
    ///
    /// let config = RevisionConfig::parse(r#"
    /// [sections]
    /// guide = ["guide/step"]
    ///
    /// [publish]
    /// merge_order = "preserve"
    /// "#).unwrap();
    ///
    /// assert_eq!(config.publish.merge_order, MergeOrder::Preserve);
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(?path, "Loading configuration");
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.sections.is_empty() {
            return Err(Error::InvalidConfig {
                message: "no sections declared under [sections]".to_string(),
            });
        }
        // Surfaces tag conflicts at load time rather than first use
        SectionClassifier::new(&self.sections)?;
        Ok(())
    }

    pub fn classifier(&self) -> Result<SectionClassifier> {
        Ok(SectionClassifier::new(&self.sections)?)
    }

    /// Build a publisher from the classification table and publish settings
    pub fn publisher(&self) -> Result<Publisher> {
        Ok(Publisher::new(self.classifier()?, self.publish))
    }
}
