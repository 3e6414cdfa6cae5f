//! Sections and the type-tag section classifier
//!
//! A section is a named, independently versioned partition of a document's
//! blocks. Which section a block belongs to is decided only by its type tag,
//! looked up in a [`ClassificationTable`] handed to the classifier when it is
//! built. Tags absent from the table classify as [`Section::Unclassified`].

use crate::block::Block;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Reserved label of the unclassified section
pub const UNCLASSIFIED: &str = "unclassified";

/// Validated name of a declared section
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionName(String);

impl SectionName {
    /// Validate and wrap a section name
    ///
    /// Names must be non-empty, contain no whitespace, and must not be the
    /// reserved `unclassified` label.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::section_name(name, "must not be empty"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(Error::section_name(name, "must not contain whitespace"));
        }
        if name == UNCLASSIFIED {
            return Err(Error::section_name(name, "is reserved"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SectionName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SectionName> for String {
    fn from(name: SectionName) -> Self {
        name.0
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The section a block belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Section {
    /// A section declared in the classification table
    Named(SectionName),
    /// Blocks whose type tag is not in the table
    Unclassified,
}

impl Section {
    /// Build a named section, validating the name
    pub fn named(name: impl Into<String>) -> Result<Self> {
        Ok(Self::Named(SectionName::new(name)?))
    }

    pub fn name(&self) -> Option<&SectionName> {
        match self {
            Self::Named(name) => Some(name),
            Self::Unclassified => None,
        }
    }

    pub fn is_classified(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Named(name) => name.as_str(),
            Self::Unclassified => UNCLASSIFIED,
        }
    }
}

impl From<SectionName> for Section {
    fn from(name: SectionName) -> Self {
        Self::Named(name)
    }
}

impl FromStr for Section {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == UNCLASSIFIED {
            Ok(Self::Unclassified)
        } else {
            Self::named(s)
        }
    }
}

impl TryFrom<String> for Section {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Section> for String {
    fn from(section: Section) -> Self {
        section.as_str().to_string()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared sections and the type tags that belong to each
///
/// Deserializes from a TOML/JSON table of `section = ["type/tag", ...]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationTable {
    sections: IndexMap<SectionName, Vec<String>>,
}

impl ClassificationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a section (if new) and add type tags to it
    pub fn with_section<I, S>(mut self, name: SectionName, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sections
            .entry(name)
            .or_default()
            .extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn sections(&self) -> impl Iterator<Item = (&SectionName, &[String])> {
        self.sections
            .iter()
            .map(|(name, tags)| (name, tags.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Maps blocks to sections by type tag
#[derive(Debug, Clone)]
pub struct SectionClassifier {
    by_tag: HashMap<String, SectionName>,
    sections: Vec<SectionName>,
}

impl SectionClassifier {
    /// Build a classifier from a classification table
    ///
    /// # Errors
    ///
    /// Returns `ConflictingTypeTag` if a tag is listed under two different
    /// sections, and `EmptyTypeTag` for an empty tag.
    pub fn new(table: &ClassificationTable) -> Result<Self> {
        let mut by_tag: HashMap<String, SectionName> = HashMap::new();
        let mut sections = Vec::new();

        for (name, tags) in table.sections() {
            sections.push(name.clone());
            for tag in tags {
                if tag.is_empty() {
                    return Err(Error::EmptyTypeTag {
                        section: name.to_string(),
                    });
                }
                if let Some(existing) = by_tag.get(tag) {
                    if existing != name {
                        return Err(Error::ConflictingTypeTag {
                            tag: tag.clone(),
                            first: existing.to_string(),
                            second: name.to_string(),
                        });
                    }
                    continue;
                }
                by_tag.insert(tag.clone(), name.clone());
            }
        }

        Ok(Self { by_tag, sections })
    }

    /// Section of a block; unknown tags are `Unclassified`
    pub fn classify(&self, block: &Block) -> Section {
        self.by_tag
            .get(block.type_tag())
            .map_or(Section::Unclassified, |name| Section::Named(name.clone()))
    }

    /// Declared sections in declaration order
    pub fn sections(&self) -> &[SectionName] {
        &self.sections
    }

    /// Whether `section` is a declared, named section
    pub fn recognizes(&self, section: &Section) -> bool {
        match section {
            Section::Named(name) => self.sections.contains(name),
            Section::Unclassified => false,
        }
    }

    /// Group blocks by section, keeping each group's relative order
    ///
    /// Groups appear in order of their first block.
    pub fn partition<'a>(&self, blocks: &'a [Block]) -> IndexMap<Section, Vec<&'a Block>> {
        let mut groups: IndexMap<Section, Vec<&'a Block>> = IndexMap::new();
        for block in blocks {
            groups.entry(self.classify(block)).or_default().push(block);
        }
        groups
    }

    /// Blocks of a single section, in document order
    pub fn blocks_in<'a>(&self, blocks: &'a [Block], section: &Section) -> Vec<&'a Block> {
        blocks
            .iter()
            .filter(|block| &self.classify(block) == section)
            .collect()
    }
}
