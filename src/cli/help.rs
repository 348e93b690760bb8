//! CLI command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name string used in log spans (e.g. "snap", "list").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Start => "start",
        Commands::Snap { .. } => "snap",
        Commands::Show { .. } => "show",
        Commands::List { .. } => "list",
        Commands::Config => "config",
    }
}
