//! CLI argument parsing and command definitions.

use clap::{Args, Parser, Subcommand};
use lectern_vector::SearchGranularity;

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "lectern", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "LECTERN_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Vector-store credentials, overriding the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct StoreArgs {
    /// Mixedbread API key.
    #[arg(long, env = "MXBAI_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Target vector-store identifier.
    #[arg(long, env = "VECTOR_STORE_ID", global = true)]
    pub vector_store_id: Option<String>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload the markdown content tree to the vector store.
    Ingest {
        /// Content directory (defaults to `content.path`).
        #[arg(long)]
        content: Option<String>,

        /// Upload manifest used to skip unchanged files.
        #[arg(long)]
        manifest: Option<String>,

        /// Upload every file, ignoring the manifest.
        #[arg(short, long)]
        force: bool,
    },

    /// Start the search gateway.
    Serve {
        /// Host address to bind to.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run one search and print the result items as JSON.
    Search {
        /// Search query.
        query: String,

        /// Search chunks or whole files.
        #[arg(short, long)]
        granularity: Option<SearchGranularity>,

        /// Number of matches requested from the store.
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Print version information.
    Version,

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Get a configuration value by dotted key.
    Get {
        /// Dotted key (e.g., "server.port").
        key: String,
    },

    /// Set a configuration value by dotted key.
    Set {
        /// Dotted key (e.g., "server.port").
        key: String,

        /// Value to set.
        value: String,
    },

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================
