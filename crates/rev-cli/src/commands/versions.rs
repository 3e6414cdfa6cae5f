//! Versions command implementation

use std::path::Path;

use colored::Colorize;

use crate::error::Result;
use crate::state::StateFile;

/// Run the versions command
///
/// Lists the sections that have been published at least once.
pub fn run_versions(state: &Path, json: bool) -> Result<()> {
    let state = StateFile::load(state)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&state.versions)?);
        return Ok(());
    }

    if state.versions.is_empty() {
        println!("{}", "No sections published yet.".dimmed());
        return Ok(());
    }

    let width = state
        .versions
        .iter()
        .map(|(section, _)| section.as_str().len())
        .max()
        .unwrap_or(0);
    for (section, version) in state.versions.iter() {
        println!(
            "{:width$}  {}",
            section.as_str(),
            version.to_string().cyan(),
            width = width
        );
    }
    Ok(())
}
