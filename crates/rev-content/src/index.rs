//! Block identity keys and content fingerprints
//!
//! A block's identity is its explicit `id` attribute when it has one, and a
//! SHA-256 hash of its full structure otherwise. Content-identical blocks
//! without an explicit id therefore share a key; how such duplicates are
//! indexed is governed by [`DuplicatePolicy`].

use crate::block::{Block, ID_ATTRIBUTE};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Identity used to match a block across two block lists
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockKey {
    /// A string `id` attribute
    Explicit(String),
    /// A numeric `id` attribute, kept apart from strings so `1` and `"1"`
    /// never match
    Numeric(String),
    /// Structural hash of an unidentified block
    ///
    /// `occurrence` is always 0 unless the index was built with
    /// [`DuplicatePolicy::Positional`].
    Content { hash: String, occurrence: usize },
}

impl BlockKey {
    pub fn is_explicit(&self) -> bool {
        matches!(self, Self::Explicit(_) | Self::Numeric(_))
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(id) => write!(f, "id:{}", id),
            Self::Numeric(id) => write!(f, "id:#{}", id),
            Self::Content { hash, occurrence: 0 } => write!(f, "sha256:{}", hash),
            Self::Content { hash, occurrence } => write!(f, "sha256:{}#{}", hash, occurrence),
        }
    }
}

/// Hash over the parts of a block that decide whether it changed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How blocks sharing a key within one list are indexed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Later duplicates overwrite earlier ones; the first position is kept
    #[default]
    Collapse,
    /// Unidentified duplicates get an occurrence ordinal and stay distinct
    Positional,
}

/// Identity key of a block
pub fn identify(block: &Block) -> BlockKey {
    match block.attr(ID_ATTRIBUTE) {
        Some(Value::String(id)) if !id.is_empty() => BlockKey::Explicit(id.clone()),
        Some(Value::Number(id)) => BlockKey::Numeric(id.to_string()),
        _ => BlockKey::Content {
            hash: structural_hash(block),
            occurrence: 0,
        },
    }
}

/// Fingerprint of a block's inner content and attributes
///
/// Children and the type tag are not part of the fingerprint.
pub fn fingerprint(block: &Block) -> Fingerprint {
    let mut hasher = Sha256::new();
    feed_str(&mut hasher, block.inner_content());
    feed_attributes(&mut hasher, block.attributes());
    Fingerprint(format!("{:x}", hasher.finalize()))
}

fn structural_hash(block: &Block) -> String {
    let mut hasher = Sha256::new();
    feed_structure(&mut hasher, block);
    format!("{:x}", hasher.finalize())
}

fn feed_structure(hasher: &mut Sha256, block: &Block) {
    feed_str(hasher, block.type_tag());
    feed_attributes(hasher, block.attributes());
    feed_str(hasher, block.inner_content());
    hasher.update((block.children().len() as u64).to_le_bytes());
    for child in block.children() {
        feed_structure(hasher, child);
    }
}

fn feed_attributes(hasher: &mut Sha256, attributes: &BTreeMap<String, Value>) {
    hasher.update((attributes.len() as u64).to_le_bytes());
    for (key, value) in attributes {
        feed_str(hasher, key);
        feed_str(hasher, &value.to_string());
    }
}

// Length prefix keeps adjacent fields from running into each other.
fn feed_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

/// Insertion-ordered mapping from identity key to block
#[derive(Debug, Clone)]
pub struct BlockIndex<'a> {
    entries: IndexMap<BlockKey, &'a Block>,
    collapsed: usize,
}

impl<'a> BlockIndex<'a> {
    /// Index blocks by identity key
    ///
    /// Under [`DuplicatePolicy::Collapse`] a repeated key replaces the stored
    /// block but keeps the position of its first occurrence. Explicit-id
    /// duplicates collapse under either policy.
    pub fn build<I>(blocks: I, policy: DuplicatePolicy) -> Self
    where
        I: IntoIterator<Item = &'a Block>,
    {
        let mut entries: IndexMap<BlockKey, &'a Block> = IndexMap::new();
        let mut occurrences: HashMap<String, usize> = HashMap::new();
        let mut collapsed = 0;

        for block in blocks {
            let key = match (policy, identify(block)) {
                (DuplicatePolicy::Positional, BlockKey::Content { hash, .. }) => {
                    let seen = occurrences.entry(hash.clone()).or_insert(0);
                    let occurrence = *seen;
                    *seen += 1;
                    BlockKey::Content { hash, occurrence }
                }
                (_, key) => key,
            };

            if entries.insert(key, block).is_some() {
                collapsed += 1;
            }
        }

        if collapsed > 0 {
            tracing::debug!(collapsed, ?policy, "Duplicate block keys collapsed while indexing");
        }

        Self { entries, collapsed }
    }

    pub fn get(&self, key: &BlockKey) -> Option<&'a Block> {
        self.entries.get(key).copied()
    }

    pub fn contains_key(&self, key: &BlockKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BlockKey, &'a Block)> {
        self.entries.iter().map(|(key, block)| (key, *block))
    }

    pub fn keys(&self) -> impl Iterator<Item = &BlockKey> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of blocks dropped because their key was already indexed
    pub fn collapsed(&self) -> usize {
        self.collapsed
    }
}
