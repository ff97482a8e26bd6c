use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command Line Interface definition for the happy-server-settings binary.
#[derive(Parser, Debug)]
#[clap(author, version, about = "Happy server URL settings")]
pub struct Cli {
    /// Directory holding the server-config store (defaults to the platform config dir)
    #[clap(long)]
    pub config_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[clap(long, default_value = "info")]
    pub log_level: String,

    /// Enable timestamp in logs
    #[clap(long)]
    pub log_timestamp: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the server currently in use
    Show {
        /// Print as JSON
        #[clap(long)]
        json: bool,
    },

    /// Check that a URL points at a compatible server without saving it
    Check {
        /// URL to check (defaults to the server currently in use)
        url: Option<String>,
    },

    /// Use a custom server
    Set {
        /// Server URL, e.g. https://happy.example.com
        url: String,

        /// Save without asking for confirmation
        #[clap(long, short)]
        yes: bool,
    },

    /// Go back to the default server
    Reset {
        /// Reset without asking for confirmation
        #[clap(long, short)]
        yes: bool,
    },
}
