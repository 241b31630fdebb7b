//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

use crate::git::VcsType;

pub mod context;
pub mod init;
pub mod status;

/// Output format options
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format - one row per entry (default)
    #[default]
    Table,
    /// JSON format - structured for scripts/APIs
    Json,
}

/// circlet - CLI companion for managing CircleCI contexts
#[derive(Parser, Debug)]
#[command(name = "circlet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(
        long,
        global = true,
        env = "CIRCLET_FORMAT",
        default_value = "table",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// The organization to operate on (overrides git inference)
    #[arg(long, global = true, env = "CIRCLET_ORG", hide_env = true)]
    pub org: Option<String>,

    /// The VCS provider hosting the organization (github, bitbucket)
    #[arg(long, global = true, env = "CIRCLET_VCS", hide_env = true)]
    pub vcs: Option<VcsType>,

    /// Override config file location
    #[arg(long, global = true, env = "CIRCLET_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "CIRCLET_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize circlet configuration
    Init,

    /// Show configuration status
    Status,

    /// Display version information
    Version,

    /// Manage contexts: shared, encrypted environment variables injected at runtime
    #[command(subcommand)]
    Context(ContextCommands),
}

/// Context subcommands
#[derive(Subcommand, Debug)]
pub enum ContextCommands {
    /// List contexts
    List,

    /// Show a context's environment variables (values stay masked)
    Show {
        /// Context name
        name: String,
    },

    /// Create a new context
    Create {
        /// Context name
        name: String,
    },

    /// Delete the named context
    Delete {
        /// Context name
        name: String,
    },

    /// Store a new secret in the named context. The value is read from stdin.
    Store {
        /// Context name
        context: String,
        /// Environment variable name
        variable: String,
    },

    /// Remove a secret from the named context
    Remove {
        /// Context name
        context: String,
        /// Environment variable name
        variable: String,
    },
}
