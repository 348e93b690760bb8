//! Snapshot and workspace presentation.

use crate::config::GutConfig;
use crate::error::ApiError;
use crate::tree::Snapshot;

pub fn format_snapshot_text(snapshot: &Snapshot) -> String {
    format!(
        "Snapshot: {}\n  Type: {}\n  Blobs: {}\n  Trees: {}\n  New objects: {}\n  Bytes: {}",
        snapshot.root_id,
        snapshot.root_kind,
        snapshot.blobs,
        snapshot.trees,
        snapshot.written,
        snapshot.bytes
    )
}

pub fn format_snapshot_json(snapshot: &Snapshot) -> String {
    serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_start_result() -> String {
    "Gut started!".to_string()
}

pub fn format_config_toml(config: &GutConfig) -> Result<String, ApiError> {
    toml::to_string_pretty(config)
        .map_err(|e| ApiError::ConfigError(format!("Failed to render configuration: {}", e)))
}
