//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rev_content::Section;
use rev_core::IncrementKind;

/// Compare and publish section revisions of structured documents
#[derive(Parser, Debug)]
#[command(name = "rev")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "rev.toml", env = "REV_CONFIG")]
    pub config: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Preview the per-section changes a revision would publish
    Compare {
        /// Document JSON file
        document: PathBuf,

        /// Revision JSON file
        revision: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Publish a revision into its document
    ///
    /// Replaces each target section, bumps its version and records the change
    /// in the changelog kept in the state file.
    ///
    /// Examples:
    ///   rev publish doc.json rev.json --state state.json
    ///   rev publish doc.json rev.json --state state.json -i guide=major
    Publish {
        /// Document JSON file
        document: PathBuf,

        /// Revision JSON file (rewritten with published status)
        revision: PathBuf,

        /// State file holding versions and changelog
        #[arg(short, long)]
        state: PathBuf,

        /// Increment kind for a section (defaults to the configured kind)
        #[arg(short = 'i', long = "increment", value_name = "SECTION=KIND", value_parser = parse_increment)]
        increments: Vec<(Section, IncrementKind)>,

        /// Where to write the published document (defaults to overwriting it)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the current version of each section
    Versions {
        /// State file holding versions and changelog
        #[arg(short, long)]
        state: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show changelog entries
    Log {
        /// State file holding versions and changelog
        #[arg(short, long)]
        state: PathBuf,

        /// Only show this section
        #[arg(long)]
        section: Option<Section>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Parse a `section=kind` pair
fn parse_increment(s: &str) -> Result<(Section, IncrementKind), String> {
    let (section, kind) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SECTION=KIND, got {:?}", s))?;
    let section = section.trim().parse::<Section>().map_err(|e| e.to_string())?;
    let kind = kind.trim().parse::<IncrementKind>().map_err(|e| e.to_string())?;
    Ok((section, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_publish_with_increments() {
        let cli = Cli::try_parse_from([
            "rev", "publish", "doc.json", "rev.json", "--state", "state.json", "-i",
            "guide=major", "--increment", "procedure=hotfix",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Publish {
                increments, output, ..
            }) => {
                assert_eq!(
                    increments,
                    vec![
                        (Section::named("guide").unwrap(), IncrementKind::Major),
                        (Section::named("procedure").unwrap(), IncrementKind::Hotfix),
                    ]
                );
                assert_eq!(output, None);
            }
            other => panic!("expected publish, got {:?}", other),
        }
        assert_eq!(cli.config, PathBuf::from("rev.toml"));
    }

    #[test]
    fn bad_increment_is_rejected() {
        for arg in ["guide", "guide=sideways", "=minor"] {
            let result = Cli::try_parse_from([
                "rev", "publish", "d.json", "r.json", "--state", "s.json", "-i", arg,
            ]);
            assert!(result.is_err(), "{arg} should be rejected");
        }
    }

    #[test]
    fn publish_requires_state() {
        let result = Cli::try_parse_from(["rev", "publish", "d.json", "r.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from([
            "rev", "compare", "d.json", "r.json", "--config", "conf/rev.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("conf/rev.toml"));
    }
}
