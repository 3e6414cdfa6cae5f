//! Command implementations for rev-cli

pub mod compare;
pub mod log;
pub mod publish;
pub mod versions;

pub use compare::run_compare;
pub use log::run_log;
pub use publish::run_publish;
pub use versions::run_versions;

use std::path::Path;

use rev_core::RevisionConfig;

use crate::error::{CliError, Result};

/// Load `rev.toml`, with a hint when it does not exist
pub(crate) fn load_config(path: &Path) -> Result<RevisionConfig> {
    if !path.exists() {
        return Err(CliError::user(format!(
            "configuration not found: {} (pass --config or set REV_CONFIG)",
            path.display()
        )));
    }
    Ok(RevisionConfig::load(path)?)
}
