//! Merge rules: built-in defaults applied beneath every other source.

use crate::store::DEFAULT_STORE_DIR;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("store.dir_name", DEFAULT_STORE_DIR)?
        .set_default("store.compression_level", 6)?
        .set_default("store.skip_existing", true)?
        .set_default("store.verify_on_read", true)?
        .set_default("snapshot.ignore", Vec::<String>::new())
}
