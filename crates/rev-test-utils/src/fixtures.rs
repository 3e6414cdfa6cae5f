//! Handbook fixtures
//!
//! The handbook has two declared sections, `guide` (`guide/intro`,
//! `guide/step`) and `procedure` (`procedure/step`, `procedure/check`), plus
//! unclassified `core/*` blocks.

use rev_content::{Block, ClassificationTable, Document, DocumentId, Section, SectionClassifier, SectionName};

/// `rev.toml` content matching [`table`]
pub const HANDBOOK_CONFIG: &str = r#"[sections]
guide = ["guide/intro", "guide/step"]
procedure = ["procedure/step", "procedure/check"]
"#;

/// A declared section by name
///
/// # Panics
///
/// Panics if `name` is not a valid section name.
pub fn section(name: &str) -> Section {
    Section::named(name).unwrap()
}

pub fn table() -> ClassificationTable {
    ClassificationTable::new()
        .with_section(
            SectionName::new("guide").unwrap(),
            ["guide/intro", "guide/step"],
        )
        .with_section(
            SectionName::new("procedure").unwrap(),
            ["procedure/step", "procedure/check"],
        )
}

pub fn classifier() -> SectionClassifier {
    SectionClassifier::new(&table()).unwrap()
}

pub fn guide_step(id: u64, content: &str) -> Block {
    Block::new("guide/step").with_id(id).with_content(content)
}

pub fn procedure_step(id: u64, content: &str) -> Block {
    Block::new("procedure/step").with_id(id).with_content(content)
}

/// An unclassified block without an explicit identity
pub fn paragraph(content: &str) -> Block {
    Block::new("core/paragraph").with_content(content)
}

/// A document with blocks from both sections and unclassified blocks
/// interleaved:
///
/// ```text
/// core/heading      "Handbook"
/// guide/intro       "Welcome"       (id 1)
/// guide/step        "Open the lid"  (id 2)
/// core/paragraph    "Safety first"
/// procedure/step    "Check power"   (id 10)
/// procedure/check   "Lamp is on"    (id 11)
/// ```
pub fn handbook() -> Document {
    Document::new(
        DocumentId::new(),
        vec![
            Block::new("core/heading").with_content("Handbook"),
            Block::new("guide/intro").with_id(1).with_content("Welcome"),
            guide_step(2, "Open the lid"),
            paragraph("Safety first"),
            procedure_step(10, "Check power"),
            Block::new("procedure/check").with_id(11).with_content("Lamp is on"),
        ],
    )
}

/// Contents of `blocks` in order, for compact assertions
pub fn contents(blocks: &[Block]) -> Vec<&str> {
    blocks.iter().map(Block::inner_content).collect()
}
