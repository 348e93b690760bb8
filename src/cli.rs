//! CLI domain: parse, route, help, output, and presentation only.
//! No domain logic; a single route table dispatches to the store and snapshot builder.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, KindFilter, OutputFormat};
pub use presentation::{
    format_config_toml, format_object_json, format_object_list_json, format_object_list_text,
    format_object_text, format_section_heading, format_snapshot_json, format_snapshot_text,
    format_start_result, format_store_not_initialized,
};
pub use route::RunContext;
