//! CLI route: single route table and run context. Dispatches to the store and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation::{
    format_config_toml, format_object_json, format_object_list_json, format_object_list_text,
    format_object_text, format_snapshot_json, format_snapshot_text, format_start_result,
    format_store_not_initialized,
};
use crate::config::{ConfigLoader, GutConfig};
use crate::error::ApiError;
use crate::store::{LooseObjectStore, ObjectStore};
use crate::tree::walker::WalkerConfig;
use crate::tree::SnapshotBuilder;
use crate::types::ObjectId;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info_span};

/// Runtime context for CLI execution: workspace, merged config and the store handle.
pub struct RunContext {
    workspace_root: PathBuf,
    config: GutConfig,
    store: LooseObjectStore,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::with_config(workspace_root, config)
    }

    /// Create run context from an already loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: GutConfig) -> Result<Self, ApiError> {
        if let Err(errors) = config.validate() {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return Err(ApiError::ConfigError(messages.join("; ")));
        }

        let store = LooseObjectStore::with_config(&workspace_root, config.store.clone());
        Ok(Self {
            workspace_root,
            config,
            store,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &GutConfig {
        &self.config
    }

    pub fn store(&self) -> &LooseObjectStore {
        &self.store
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let span = info_span!("command", command = command_name(command));
        let _guard = span.enter();
        let started = Instant::now();

        let result = self.execute_inner(command);
        debug!(
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis(),
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Start => {
                self.store.init_layout()?;
                Ok(format_start_result())
            }
            Commands::Snap { path, format } => self.handle_snap(path, *format),
            Commands::Show { hash, format } => {
                let id: ObjectId = hash.parse()?;
                let object = self.store.get(&id)?;
                Ok(match format {
                    OutputFormat::Text => format_object_text(&object),
                    OutputFormat::Json => format_object_json(&object),
                })
            }
            Commands::List { kind, format } => {
                if !self.store.is_initialized() && *format == OutputFormat::Text {
                    return Ok(format_store_not_initialized());
                }
                let objects = self.store.list(kind.map(Into::into))?;
                Ok(match format {
                    OutputFormat::Text => format_object_list_text(&objects),
                    OutputFormat::Json => format_object_list_json(&objects),
                })
            }
            Commands::Config => format_config_toml(&self.config),
        }
    }

    fn handle_snap(&self, path: &Path, format: OutputFormat) -> Result<String, ApiError> {
        // Relative paths are taken from the workspace, not the process cwd
        let target = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        };

        self.store.init_layout()?;
        let walker_config = WalkerConfig {
            ignore_names: self.config.ignore_names(),
        };
        let snapshot = SnapshotBuilder::new(&self.store)
            .with_walker_config(walker_config)
            .build(&target)?;

        Ok(match format {
            OutputFormat::Text => format_snapshot_text(&snapshot),
            OutputFormat::Json => format_snapshot_json(&snapshot),
        })
    }
}
