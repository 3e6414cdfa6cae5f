//! Post-publish hooks
//!
//! Hooks are configured in `rev.toml` as `[[hooks]]` entries and executed as
//! subprocesses after a publish has been persisted. They are fire-and-forget:
//! a failing hook is logged and reported, never turned into an error, so a
//! publish is never undone by its hooks.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use rev_content::DocumentId;
use serde::{Deserialize, Serialize};

use crate::publisher::PublishReport;

/// Events that can trigger hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookEvent {
    /// After a publish has been written out
    PostPublish,
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PostPublish => write!(f, "post-publish"),
        }
    }
}

/// Configuration for a single hook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookConfig {
    /// The event that triggers this hook
    pub event: HookEvent,
    /// The command to execute
    pub command: String,
    /// Arguments, with `${VAR}` substitution from the hook context
    #[serde(default)]
    pub args: Vec<String>,
    /// Working directory override, relative to the caller's directory
    pub working_dir: Option<PathBuf>,
}

/// Variables exposed to hooks, both substituted into args and set as
/// environment variables
#[derive(Debug, Clone, Default)]
pub struct HookContext {
    pub vars: HashMap<String, String>,
}

impl HookContext {
    /// Context for a completed publish
    ///
    /// - `DOCUMENT_ID`: the published document
    /// - `SECTIONS`: comma-separated published sections
    /// - `VERSIONS`: comma-separated `section=version` pairs
    pub fn for_publish(document: DocumentId, report: &PublishReport) -> Self {
        let sections: Vec<String> = report
            .sections
            .iter()
            .map(|s| s.section.to_string())
            .collect();
        let versions: Vec<String> = report
            .sections
            .iter()
            .map(|s| format!("{}={}", s.section, s.version))
            .collect();

        let mut vars = HashMap::new();
        vars.insert("HOOK_EVENT_TYPE".to_string(), HookEvent::PostPublish.to_string());
        vars.insert("DOCUMENT_ID".to_string(), document.to_string());
        vars.insert("SECTIONS".to_string(), sections.join(","));
        vars.insert("VERSIONS".to_string(), versions.join(","));
        Self { vars }
    }
}

/// Result of running a single hook
#[derive(Debug)]
pub struct HookResult {
    pub event: HookEvent,
    pub command: String,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

/// Run every hook registered for `event`, in order
///
/// All matching hooks run even if an earlier one fails.
pub fn run_hooks(
    hooks: &[HookConfig],
    event: HookEvent,
    context: &HookContext,
    default_dir: &Path,
) -> Vec<HookResult> {
    hooks
        .iter()
        .filter(|h| h.event == event)
        .map(|hook| {
            let result = execute_hook(hook, context, default_dir);
            if !result.success {
                tracing::warn!(
                    command = %result.command,
                    exit_code = ?result.exit_code,
                    stderr = %result.stderr.trim(),
                    "Hook {} failed",
                    event
                );
            }
            result
        })
        .collect()
}

fn execute_hook(hook: &HookConfig, context: &HookContext, default_dir: &Path) -> HookResult {
    let failed = |message: String| HookResult {
        event: hook.event,
        command: hook.command.clone(),
        success: false,
        stdout: String::new(),
        stderr: message,
        exit_code: None,
    };

    // Relative overrides resolve against `default_dir`; absolute ones replace it
    let work_dir = match &hook.working_dir {
        Some(custom_dir) => default_dir.join(custom_dir),
        None => default_dir.to_path_buf(),
    };

    // Hooks may not escape the caller's directory
    if let Some(ref custom_dir) = hook.working_dir
        && let (Ok(canon_custom), Ok(canon_default)) =
            (work_dir.canonicalize(), default_dir.canonicalize())
        && !canon_custom.starts_with(&canon_default)
    {
        return failed(format!(
            "Hook working_dir {:?} is outside {:?}",
            custom_dir, default_dir
        ));
    }

    let args: Vec<String> = hook
        .args
        .iter()
        .map(|arg| substitute_vars(arg, &context.vars))
        .collect();

    let output = match Command::new(&hook.command)
        .args(&args)
        .current_dir(&work_dir)
        .envs(&context.vars)
        .output()
    {
        Ok(output) => output,
        Err(e) => return failed(format!("Failed to spawn {}: {}", hook.command, e)),
    };

    HookResult {
        event: hook.event,
        command: hook.command.clone(),
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code(),
    }
}

/// Substitute ${VAR_NAME} patterns in a string with context variables
fn substitute_vars(input: &str, vars: &HashMap<String, String>) -> String {
    let mut result = input.to_string();
    for (key, value) in vars {
        let pattern = format!("${{{}}}", key);
        result = result.replace(&pattern, value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::SectionReport;
    use crate::version::{IncrementKind, VersionNumber};
    use rev_content::{DiffSummary, Section};

    fn report() -> PublishReport {
        PublishReport {
            sections: vec![
                SectionReport {
                    section: Section::named("guide").unwrap(),
                    kind: IncrementKind::Minor,
                    previous: VersionNumber::new(0, 1),
                    version: VersionNumber::new(0, 2),
                    summary: DiffSummary::default(),
                },
                SectionReport {
                    section: Section::named("procedure").unwrap(),
                    kind: IncrementKind::Major,
                    previous: VersionNumber::new(1, 3),
                    version: VersionNumber::new(2, 0),
                    summary: DiffSummary::default(),
                },
            ],
            notices: Vec::new(),
        }
    }

    fn echo_hook(args: &[&str]) -> HookConfig {
        HookConfig {
            event: HookEvent::PostPublish,
            command: if cfg!(windows) { "cmd" } else { "echo" }.to_string(),
            args: if cfg!(windows) {
                ["/C", "echo"].iter().chain(args).map(|s| s.to_string()).collect()
            } else {
                args.iter().map(|s| s.to_string()).collect()
            },
            working_dir: None,
        }
    }

    #[test]
    fn context_for_publish_lists_sections_and_versions() {
        let id = DocumentId::new();
        let ctx = HookContext::for_publish(id, &report());
        assert_eq!(ctx.vars["DOCUMENT_ID"], id.to_string());
        assert_eq!(ctx.vars["SECTIONS"], "guide,procedure");
        assert_eq!(ctx.vars["VERSIONS"], "guide=0.2,procedure=2.0");
        assert_eq!(ctx.vars["HOOK_EVENT_TYPE"], "post-publish");
    }

    #[test]
    fn substitute_vars_replaces_known_patterns() {
        let mut vars = HashMap::new();
        vars.insert("SECTIONS".to_string(), "guide".to_string());

        assert_eq!(substitute_vars("published ${SECTIONS}", &vars), "published guide");
        assert_eq!(substitute_vars("${UNKNOWN}", &vars), "${UNKNOWN}");
    }

    #[test]
    fn run_hooks_echoes_substituted_args() {
        let hooks = vec![echo_hook(&["versions ${VERSIONS}"])];
        let ctx = HookContext::for_publish(DocumentId::new(), &report());
        let temp = tempfile::TempDir::new().unwrap();

        let results = run_hooks(&hooks, HookEvent::PostPublish, &ctx, temp.path());
        assert_eq!(results.len(), 1);
        assert!(results[0].success);
        assert!(results[0].stdout.contains("guide=0.2,procedure=2.0"));
    }

    #[test]
    fn failing_hook_is_reported_not_raised() {
        let hooks = vec![
            HookConfig {
                event: HookEvent::PostPublish,
                command: "rev-hook-command-that-does-not-exist".to_string(),
                args: vec![],
                working_dir: None,
            },
            echo_hook(&["still runs"]),
        ];
        let temp = tempfile::TempDir::new().unwrap();

        let results = run_hooks(&hooks, HookEvent::PostPublish, &HookContext::default(), temp.path());
        assert_eq!(results.len(), 2);
        assert!(!results[0].success);
        assert!(results[0].stderr.contains("Failed to spawn"));
        assert!(results[1].success);
    }

    #[cfg(unix)]
    #[test]
    fn relative_working_dir_resolves_against_default_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("build")).unwrap();
        let hook = HookConfig {
            event: HookEvent::PostPublish,
            command: "pwd".to_string(),
            args: vec![],
            working_dir: Some(PathBuf::from("build")),
        };

        let results = run_hooks(&[hook], HookEvent::PostPublish, &HookContext::default(), temp.path());
        assert!(results[0].success, "{}", results[0].stderr);
        let ran_in = PathBuf::from(results[0].stdout.trim());
        assert_eq!(
            ran_in.canonicalize().unwrap(),
            temp.path().join("build").canonicalize().unwrap()
        );
    }

    #[test]
    fn working_dir_outside_default_dir_is_refused() {
        let temp = tempfile::TempDir::new().unwrap();
        let inner = temp.path().join("docs");
        std::fs::create_dir(&inner).unwrap();
        let mut hook = echo_hook(&["never"]);
        hook.working_dir = Some(PathBuf::from(".."));

        let results = run_hooks(&[hook], HookEvent::PostPublish, &HookContext::default(), &inner);
        assert!(!results[0].success);
        assert!(results[0].stderr.contains("is outside"));
    }

    #[test]
    fn hook_config_parses_from_toml() {
        let hook: HookConfig = toml::from_str(
            r#"
event = "post-publish"
command = "make"
args = ["pdf", "${DOCUMENT_ID}"]
"#,
        )
        .unwrap();
        assert_eq!(hook.event, HookEvent::PostPublish);
        assert_eq!(hook.command, "make");
        assert_eq!(hook.args, vec!["pdf", "${DOCUMENT_ID}"]);
        assert_eq!(hook.working_dir, None);
    }

    #[test]
    fn unknown_event_is_rejected() {
        let result: std::result::Result<HookConfig, _> =
            toml::from_str("event = \"pre-sync\"\ncommand = \"true\"\n");
        assert!(result.is_err());
    }
}
