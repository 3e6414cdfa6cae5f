//! Publish command implementation
//!
//! Runs the whole read-publish-write cycle under the state lock, then runs
//! post-publish hooks once everything is on disk.
//!
//! The state, output document and revision are all staged as temp files
//! before any is renamed into place, so a failed write changes nothing. The
//! renames themselves run state first and revision last; a failure between
//! two renames leaves the files partly updated with the revision still
//! unpublished.

use std::path::{Path, PathBuf};

use colored::Colorize;
use serde_json::json;

use rev_content::{Document, Section};
use rev_core::{
    HookContext, HookEvent, HookResult, IncrementKind, IncrementKinds, PublishReport, Revision,
    SystemClock, run_hooks,
};

use super::load_config;
use crate::error::Result;
use crate::state::{FileLock, StateFile, read_json, stage_json};

/// Files a publish reads and writes
#[derive(Debug, Clone)]
pub struct PublishPaths<'a> {
    pub config: &'a Path,
    pub document: &'a Path,
    pub revision: &'a Path,
    pub state: &'a Path,
    /// Defaults to `document`
    pub output: Option<&'a Path>,
}

/// Run the publish command
pub fn run_publish(
    paths: PublishPaths<'_>,
    increments: &[(Section, IncrementKind)],
    json: bool,
) -> Result<()> {
    let config = load_config(paths.config)?;
    let publisher = config.publisher()?;
    let increments: IncrementKinds = increments.iter().cloned().collect();
    let output = paths.output.unwrap_or(paths.document);

    let (document_id, report) = {
        // State before revision, the same order every writer takes them in
        let state_lock = FileLock::acquire(paths.state)?;
        let revision_lock = FileLock::acquire(paths.revision)?;
        tracing::debug!(state = ?state_lock.path(), revision = ?revision_lock.path(), "Holding publish locks");

        let mut state = StateFile::load(paths.state)?;
        let document: Document = read_json(paths.document)?;
        let revision: Revision = read_json(paths.revision)?;

        let outcome = publisher.publish(
            document,
            revision,
            state.versions,
            state.changelog,
            &increments,
            &SystemClock,
        )?;

        // Stage everything before replacing anything
        state.versions = outcome.versions;
        state.changelog = outcome.changelog;
        let staged_state = state.stage(paths.state)?;
        let staged_document = stage_json(output, &outcome.document)?;
        let staged_revision = stage_json(paths.revision, &outcome.revision)?;

        // Revision last: while it is still unpublished the publish can be rerun
        for staged in [staged_state, staged_document, staged_revision] {
            tracing::debug!(path = ?staged.target(), "Replacing file");
            staged.commit()?;
        }

        (outcome.document.id, outcome.report)
    };

    let hook_dir = hook_dir(paths.config)?;
    let hooks = if report.is_noop() {
        Vec::new()
    } else {
        let context = HookContext::for_publish(document_id, &report);
        run_hooks(&config.hooks, HookEvent::PostPublish, &context, &hook_dir)
    };

    if json {
        let json_output = json!({
            "document": document_id,
            "output": output,
            "sections": report.sections,
            "notices": report.notices,
            "hooks": hooks.iter().map(|h| json!({
                "command": h.command,
                "success": h.success,
                "exit_code": h.exit_code,
            })).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&json_output)?);
    } else {
        print_report(&report, output, &hooks);
    }

    Ok(())
}

/// Hooks run relative to the directory holding the configuration
fn hook_dir(config: &Path) -> Result<PathBuf> {
    match config.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        _ => Ok(std::env::current_dir()?),
    }
}

fn print_report(report: &PublishReport, output: &Path, hooks: &[HookResult]) {
    if report.is_noop() {
        println!(
            "{} Revision targets no sections, nothing published.",
            "OK".green().bold()
        );
        return;
    }

    for section in &report.sections {
        println!(
            "{} {} {} -> {} ({}, {})",
            "Published".green().bold(),
            section.section.to_string().yellow(),
            section.previous,
            section.version.to_string().cyan(),
            section.kind,
            section.summary
        );
    }
    for notice in &report.notices {
        println!("{} {}", "warning:".yellow().bold(), notice);
    }
    for hook in hooks.iter().filter(|h| !h.success) {
        println!(
            "{} hook {} failed: {}",
            "warning:".yellow().bold(),
            hook.command,
            hook.stderr.trim()
        );
    }
    println!("Wrote {}", output.display());
}
