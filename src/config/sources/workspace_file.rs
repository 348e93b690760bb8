//! Workspace config file source: <workspace>/.gut/config.toml

use crate::store::DEFAULT_STORE_DIR;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::{Path, PathBuf};

/// Path to the workspace config file.
///
/// Always under the default store directory name, since the store
/// directory name itself may be configured here.
pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(DEFAULT_STORE_DIR).join("config.toml")
}

/// Add workspace config file to builder.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = workspace_config_path(workspace_root);
    if path.is_file() {
        return Ok(builder.add_source(File::from(path.as_path()).required(false)));
    }
    Ok(builder)
}
