//! CLI parse: clap types for Gut. No behavior; definitions only.

use crate::object::ObjectKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Gut CLI - content-addressable object store
#[derive(Parser)]
#[command(name = "gut")]
#[command(about = "Content-addressable object store for files and directories")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (the store lives under it)
    #[arg(long, global = true, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the object store in the workspace
    Start,
    /// Snapshot a file or directory into the store
    Snap {
        /// File or directory to snapshot
        path: PathBuf,
        /// Output format (text or json)
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show a stored object
    Show {
        /// Full 64-character object hash
        hash: String,
        /// Output format (text or json)
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List stored objects
    List {
        /// Only list objects of this type
        #[arg(long = "type", value_enum)]
        kind: Option<KindFilter>,
        /// Output format (text or json)
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindFilter {
    Blob,
    Tree,
    Commit,
}

impl From<KindFilter> for ObjectKind {
    fn from(filter: KindFilter) -> Self {
        match filter {
            KindFilter::Blob => ObjectKind::Blob,
            KindFilter::Tree => ObjectKind::Tree,
            KindFilter::Commit => ObjectKind::Commit,
        }
    }
}
