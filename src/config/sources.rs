//! Configuration sources, lowest precedence first: global file, workspace file, environment.

pub mod global_file;
pub mod workspace_file;

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

/// Add `GUT_*` environment overrides, e.g. `GUT_STORE__DIR_NAME`.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("GUT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}
