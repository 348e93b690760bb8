//! CLI presentation: text and json formatters per command family.

mod objects;
mod snapshot;

pub use objects::{
    format_object_json, format_object_list_json, format_object_list_text, format_object_text,
    format_section_heading, format_store_not_initialized,
};
pub use snapshot::{
    format_config_toml, format_snapshot_json, format_snapshot_text, format_start_result,
};
