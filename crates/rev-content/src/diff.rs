//! Block list diffing
//!
//! Both sides are indexed by [`BlockKey`](crate::index::BlockKey); keys
//! present on one side only are added or removed, keys present on both sides
//! with differing fingerprints are modified, and everything else is unchanged
//! and left out of the result. The pass is linear after indexing.

use crate::block::Block;
use crate::index::{BlockIndex, DuplicatePolicy, fingerprint};
use serde::{Deserialize, Serialize};
use similar::TextDiff;
use std::fmt;

/// A block present on both sides whose fingerprint changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifiedBlock {
    pub old: Block,
    pub new: Block,
}

impl ModifiedBlock {
    /// Character-level similarity of the inner content (0.0 to 1.0)
    pub fn similarity(&self) -> f64 {
        if self.old.inner_content() == self.new.inner_content() {
            return 1.0;
        }
        TextDiff::from_chars(self.old.inner_content(), self.new.inner_content()).ratio() as f64
    }
}

/// Classification of blocks between two block lists
///
/// `added` and `modified` follow the iteration order of the new side's
/// index, `removed` that of the old side's index. Index order is the order
/// of first occurrence of each key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    #[serde(default)]
    pub added: Vec<Block>,
    #[serde(default)]
    pub removed: Vec<Block>,
    #[serde(default)]
    pub modified: Vec<ModifiedBlock>,
}

impl DiffResult {
    /// True when nothing was added, removed, or modified
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }

    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            added: self.added.len(),
            removed: self.removed.len(),
            modified: self.modified.len(),
        }
    }
}

/// Change counts of a [`DiffResult`], displayed as `+added -removed ~modified`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
}

impl DiffSummary {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.modified == 0
    }
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{} -{} ~{}", self.added, self.removed, self.modified)
    }
}

/// Blocks dropped by key collapsing on each side of a diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub collapsed_old: usize,
    pub collapsed_new: usize,
}

impl IndexStats {
    pub fn collapsed(&self) -> usize {
        self.collapsed_old + self.collapsed_new
    }
}

/// Computes [`DiffResult`]s under a duplicate-key policy
#[derive(Debug, Clone, Copy, Default)]
pub struct Differ {
    policy: DuplicatePolicy,
}

impl Differ {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Diff two block lists
    pub fn diff<'a, 'b, O, N>(&self, old: O, new: N) -> DiffResult
    where
        O: IntoIterator<Item = &'a Block>,
        N: IntoIterator<Item = &'b Block>,
    {
        self.diff_with_stats(old, new).0
    }

    /// Diff two block lists and report how many blocks indexing collapsed
    pub fn diff_with_stats<'a, 'b, O, N>(&self, old: O, new: N) -> (DiffResult, IndexStats)
    where
        O: IntoIterator<Item = &'a Block>,
        N: IntoIterator<Item = &'b Block>,
    {
        let old_index = BlockIndex::build(old, self.policy);
        let new_index = BlockIndex::build(new, self.policy);
        let mut result = DiffResult::default();

        for (key, new_block) in new_index.iter() {
            match old_index.get(key) {
                None => result.added.push(new_block.clone()),
                Some(old_block) if fingerprint(old_block) != fingerprint(new_block) => {
                    result.modified.push(ModifiedBlock {
                        old: old_block.clone(),
                        new: new_block.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        for (key, old_block) in old_index.iter() {
            if !new_index.contains_key(key) {
                result.removed.push(old_block.clone());
            }
        }

        let stats = IndexStats {
            collapsed_old: old_index.collapsed(),
            collapsed_new: new_index.collapsed(),
        };
        (result, stats)
    }
}

/// Diff two block lists with the default (collapsing) policy
pub fn diff<'a, 'b, O, N>(old: O, new: N) -> DiffResult
where
    O: IntoIterator<Item = &'a Block>,
    N: IntoIterator<Item = &'b Block>,
{
    Differ::default().diff(old, new)
}

/// Diff two block lists under an explicit duplicate-key policy
pub fn diff_with<'a, 'b, O, N>(old: O, new: N, policy: DuplicatePolicy) -> DiffResult
where
    O: IntoIterator<Item = &'a Block>,
    N: IntoIterator<Item = &'b Block>,
{
    Differ::new(policy).diff(old, new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn diff_with_positional_keeps_identical_blocks_apart() {
        let old = vec![Block::new("p").with_content("same")];
        let new = vec![
            Block::new("p").with_content("same"),
            Block::new("p").with_content("same"),
        ];

        assert!(diff(&old, &new).is_empty());
        let positional = diff_with(&old, &new, DuplicatePolicy::Positional);
        assert_eq!(positional.summary().to_string(), "+1 -0 ~0");
    }

    fn p(id: &str, content: &str) -> Block {
        Block::new("p").with_id(id).with_content(content)
    }

    #[test]
    fn identical_lists_diff_empty() {
        let blocks = vec![p("1", "a"), p("2", "b"), Block::new("hr")];
        let result = diff(&blocks, &blocks);
        assert!(result.is_empty());
        assert_eq!(result.change_count(), 0);
    }

    #[test]
    fn modified_block_is_paired_with_its_original() {
        let old = vec![p("1", "x")];
        let new = vec![p("1", "x2")];
        let result = diff(&old, &new);

        assert!(result.added.is_empty());
        assert!(result.removed.is_empty());
        assert_eq!(
            result.modified,
            vec![ModifiedBlock {
                old: p("1", "x"),
                new: p("1", "x2"),
            }]
        );
    }

    #[test]
    fn numeric_id_does_not_match_string_id() {
        let old = vec![Block::new("p").with_id(1).with_content("x")];
        let new = vec![p("1", "x")];
        let result = diff(&old, &new);

        assert!(result.modified.is_empty());
        assert_eq!(result.removed, old);
        assert_eq!(result.added, new);
    }

    #[test]
    fn added_and_removed_are_classified() {
        let old = vec![p("1", "a"), p("2", "b")];
        let new = vec![p("2", "b"), p("3", "c")];
        let result = diff(&old, &new);

        assert_eq!(result.added, vec![p("3", "c")]);
        assert_eq!(result.removed, vec![p("1", "a")]);
        assert!(result.modified.is_empty());
    }

    #[test]
    fn unidentified_edit_reads_as_remove_plus_add() {
        let old = vec![Block::new("p").with_content("before")];
        let new = vec![Block::new("p").with_content("after")];
        let result = diff(&old, &new);

        assert_eq!(result.added.len(), 1);
        assert_eq!(result.removed.len(), 1);
        assert!(result.modified.is_empty());
    }

    #[test]
    fn order_follows_index_order_not_position() {
        let old = vec![p("a", "1"), p("b", "1"), p("c", "1")];
        let new = vec![p("c", "2"), p("a", "2"), p("d", "1"), p("b", "1")];
        let result = diff(&old, &new);

        let modified: Vec<String> = result
            .modified
            .iter()
            .filter_map(|m| m.new.explicit_id())
            .collect();
        assert_eq!(modified, vec!["c", "a"]);
        assert_eq!(result.added, vec![p("d", "1")]);
    }

    #[test]
    fn collapsed_duplicates_are_invisible_to_the_diff() {
        let old = vec![Block::new("hr")];
        let new = vec![Block::new("hr"), Block::new("hr")];

        let (collapsed, stats) = Differ::new(DuplicatePolicy::Collapse).diff_with_stats(&old, &new);
        assert!(collapsed.is_empty());
        assert_eq!(stats.collapsed_new, 1);

        let (positional, stats) =
            Differ::new(DuplicatePolicy::Positional).diff_with_stats(&old, &new);
        assert_eq!(positional.added, vec![Block::new("hr")]);
        assert_eq!(stats.collapsed(), 0);
    }

    #[test]
    fn accepts_borrowed_block_lists() {
        let old = vec![p("1", "a")];
        let new = vec![p("1", "b")];
        let old_refs: Vec<&Block> = old.iter().collect();
        let result = diff(old_refs, new.iter());
        assert_eq!(result.modified.len(), 1);
    }

    #[test]
    fn similarity_of_modified_content() {
        let same = ModifiedBlock {
            old: p("1", "abc").with_attr("k", 1),
            new: p("1", "abc").with_attr("k", 2),
        };
        assert_eq!(same.similarity(), 1.0);

        let changed = ModifiedBlock {
            old: p("1", "abcd"),
            new: p("1", "wxyz"),
        };
        assert!(changed.similarity() < 0.5);
    }

    #[test]
    fn summary_renders_counts() {
        let old = vec![p("1", "a"), p("2", "b")];
        let new = vec![p("3", "c")];
        let summary = diff(&old, &new).summary();
        insta::assert_snapshot!(summary.to_string(), @"+1 -2 ~0");
        assert!(!summary.is_empty());
        assert!(DiffSummary::default().is_empty());
    }
}
