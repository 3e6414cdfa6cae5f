//! Log command implementation

use std::path::Path;

use colored::Colorize;
use serde_json::json;

use rev_content::Section;
use rev_core::ChangelogEntry;
use rev_core::VersionNumber;

use crate::error::Result;
use crate::state::StateFile;

/// Run the log command
///
/// Entries are grouped by section, oldest version first.
pub fn run_log(state: &Path, section: Option<&Section>, json: bool) -> Result<()> {
    let state = StateFile::load(state)?;
    let changelog = &state.changelog;

    let sections: Vec<&Section> = match section {
        Some(section) => vec![section],
        None => changelog.sections().collect(),
    };

    if json {
        let entries: Vec<_> = sections
            .iter()
            .flat_map(|section| {
                changelog.entries(section).map(move |(version, entry)| {
                    json!({
                        "section": section,
                        "version": version,
                        "timestamp": entry.timestamp,
                        "summary": entry.diff.summary(),
                        "diff": entry.diff,
                    })
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let mut printed = 0;
    for section in sections {
        for (version, entry) in changelog.entries(section) {
            print_entry(section, version, entry);
            printed += 1;
        }
    }
    if printed == 0 {
        println!("{}", "No changelog entries.".dimmed());
    }
    Ok(())
}

fn print_entry(section: &Section, version: &VersionNumber, entry: &ChangelogEntry) {
    println!(
        "{} {} {}  {}",
        section.to_string().yellow(),
        version.to_string().cyan(),
        entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        entry.diff.summary()
    );
}
