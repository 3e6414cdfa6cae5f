//! Section merge: splice published sections into a document's block list

use crate::config::MergeOrder;
use indexmap::{IndexMap, IndexSet};
use rev_content::{Block, Section, SectionClassifier};

/// Build the published block list
///
/// Blocks of `original` outside `targets` keep their relative order. Each
/// target's replacement blocks are placed according to `order`:
///
/// - `Append`: after all remaining blocks, in target order
/// - `Preserve`: at the position of the section's first block in `original`,
///   or at the end (in target order) if the section never appeared
pub(crate) fn assemble(
    classifier: &SectionClassifier,
    original: Vec<Block>,
    targets: &IndexSet<Section>,
    mut replacements: IndexMap<Section, Vec<Block>>,
    order: MergeOrder,
) -> Vec<Block> {
    let mut merged = Vec::with_capacity(original.len());

    for block in original {
        let section = classifier.classify(&block);
        if !targets.contains(&section) {
            merged.push(block);
        } else if order == MergeOrder::Preserve
            && let Some(blocks) = replacements.shift_remove(&section)
        {
            merged.extend(blocks);
        }
    }

    // Append mode places every section here; preserve mode only the sections
    // that had no blocks in the original
    for section in targets {
        if let Some(blocks) = replacements.shift_remove(section) {
            merged.extend(blocks);
        }
    }

    merged
}
