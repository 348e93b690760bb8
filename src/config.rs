//! Configuration System
//!
//! Layered configuration: built-in defaults, then the global config file, then
//! the workspace config file, then `GUT_*` environment variables. Values are
//! validated after loading.

use crate::logging::LoggingConfig;
use crate::store::DEFAULT_STORE_DIR;
use crate::tree::validate_name;
use config::{ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod merge;
mod sources;

pub use sources::global_file::global_config_path;
pub use sources::workspace_file::workspace_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GutConfig {
    /// Object store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Snapshot settings
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Object store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Name of the reserved store directory under the workspace root
    #[serde(default = "default_dir_name")]
    pub dir_name: String,

    /// zlib compression level, 0 (none) to 9 (best)
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,

    /// Skip the write when an object file already exists at the target path
    #[serde(default = "default_true")]
    pub skip_existing: bool,

    /// Re-hash objects on read and reject any whose digest does not match
    #[serde(default = "default_true")]
    pub verify_on_read: bool,
}

fn default_dir_name() -> String {
    DEFAULT_STORE_DIR.to_string()
}

fn default_compression_level() -> u32 {
    6
}

fn default_true() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir_name: default_dir_name(),
            compression_level: default_compression_level(),
            skip_existing: true,
            verify_on_read: true,
        }
    }
}

/// Snapshot configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Entry names excluded from snapshots in addition to the store directory
    #[serde(default)]
    pub ignore: Vec<String>,
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Store(String),
    Snapshot(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Store(msg) => write!(f, "Store: {}", msg),
            ValidationError::Snapshot(msg) => write!(f, "Snapshot: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl StoreConfig {
    /// Validate store configuration
    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.dir_name)
            .map_err(|reason| format!("invalid dir_name: {}", reason))?;
        if self.dir_name.contains('\\') {
            return Err(format!("invalid dir_name {:?}: contains a separator", self.dir_name));
        }
        if self.compression_level > 9 {
            return Err(format!(
                "compression_level must be between 0 and 9, got {}",
                self.compression_level
            ));
        }
        Ok(())
    }
}

impl GutConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.store.validate() {
            errors.push(ValidationError::Store(e));
        }

        for name in &self.snapshot.ignore {
            if let Err(reason) = validate_name(name) {
                errors.push(ValidationError::Snapshot(format!(
                    "invalid ignore entry: {}",
                    reason
                )));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Names the snapshot walker must skip
    ///
    /// Always includes the configured store directory and `.gut`, which holds
    /// the workspace config file even when objects live elsewhere.
    pub fn ignore_names(&self) -> Vec<String> {
        let mut names = vec![self.store.dir_name.clone()];
        if self.store.dir_name != DEFAULT_STORE_DIR {
            names.push(DEFAULT_STORE_DIR.to_string());
        }
        for name in &self.snapshot.ignore {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}

/// Loads [`GutConfig`] from the layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace
    ///
    /// Precedence (highest last): defaults, global file, workspace file, environment.
    pub fn load(workspace_root: &Path) -> Result<GutConfig, ConfigError> {
        let builder = merge::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = sources::add_environment(builder);

        builder.build()?.try_deserialize()
    }

    /// Load configuration from an explicit file (skips global and workspace files)
    pub fn load_from_file(path: &Path) -> Result<GutConfig, ConfigError> {
        let builder = merge::builder_with_defaults()?.add_source(File::from(path).required(true));
        let builder = sources::add_environment(builder);

        builder.build()?.try_deserialize()
    }

    /// Path of the global config file, if a home directory can be determined
    pub fn global_config_path() -> Option<PathBuf> {
        global_config_path()
    }
}
