//! Compare command implementation
//!
//! Previews what publishing a revision would change, section by section.
//! The document and state are never touched; a draft revision is written
//! back with its status set to compared.

use std::path::Path;

use colored::Colorize;
use rev_content::{Block, DiffResult, Document, Section};
use rev_core::{Revision, RevisionStatus};

use super::load_config;
use crate::error::Result;
use crate::state::{FileLock, read_json, write_json};

/// Run the compare command
pub fn run_compare(config: &Path, document: &Path, revision: &Path, json: bool) -> Result<()> {
    let publisher = load_config(config)?.publisher()?;
    let doc: Document = read_json(document)?;

    let diffs = {
        let _lock = FileLock::acquire(revision)?;
        let mut rev: Revision = read_json(revision)?;
        let diffs = publisher.compare(&doc, &rev)?;

        if rev.status() == RevisionStatus::Draft {
            rev.mark_compared()?;
            write_json(revision, &rev)?;
        }
        tracing::debug!(sections = diffs.len(), status = ?rev.status(), "Compared revision");
        diffs
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&diffs)?);
        return Ok(());
    }

    if diffs.is_empty() {
        println!("{} Revision targets no sections.", "OK".green().bold());
        return Ok(());
    }

    for (section, diff) in &diffs {
        print_section(section, diff);
    }
    Ok(())
}

fn print_section(section: &Section, diff: &DiffResult) {
    println!(
        "{} {} ({})",
        "Section".blue().bold(),
        section.to_string().yellow(),
        diff.summary()
    );

    if diff.is_empty() {
        println!("  {}", "no changes".dimmed());
    }
    for block in &diff.added {
        println!("  {} {}", "+".green(), describe(block).green());
    }
    for block in &diff.removed {
        println!("  {} {}", "-".red(), describe(block).red());
    }
    for change in &diff.modified {
        println!(
            "  {} {} -> {} ({:.0}% similar)",
            "~".yellow(),
            describe(&change.old),
            describe(&change.new).yellow(),
            change.similarity() * 100.0
        );
    }
    println!();
}

/// One-line block description: type tag, explicit id, truncated content
fn describe(block: &Block) -> String {
    const MAX: usize = 40;
    let content: String = block.inner_content().chars().take(MAX).collect();
    let ellipsis = if block.inner_content().chars().count() > MAX {
        "..."
    } else {
        ""
    };
    match block.explicit_id() {
        Some(id) => format!("{}#{} {:?}{}", block.type_tag(), id, content, ellipsis),
        None => format!("{} {:?}{}", block.type_tag(), content, ellipsis),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_includes_id_and_truncates() {
        let block = Block::new("guide/step")
            .with_id(7)
            .with_content("x".repeat(50));
        let text = describe(&block);
        assert!(text.starts_with("guide/step#7 "));
        assert!(text.ends_with("..."));

        assert_eq!(describe(&Block::new("p").with_content("hi")), "p \"hi\"");
    }
}
