//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

/// Collapsible tree diagrams: layout, outline and interactive collapse
#[derive(Parser, Debug)]
#[command(name = "treeflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory holding .treeflow.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Tree source plus initial collapse state, shared by layout-producing commands.
#[derive(Args, Debug, Clone, Default)]
pub struct TreeArgs {
    /// Tree document (.json or .toml); default: configured tree_file, then the sample tree
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Collapse a node by id (repeatable)
    #[arg(short, long = "collapse", value_name = "ID")]
    pub collapse: Vec<String>,

    /// Collapse every branch below the root
    #[arg(long, conflicts_with = "collapse")]
    pub collapse_all: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Renderer-ready node/edge document
    #[default]
    Json,
    /// Raw layout (positions, depth, span)
    Layout,
    /// Aligned text table
    Table,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute node positions and edges
    Layout {
        #[command(flatten)]
        tree: TreeArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Show the visible tree as an outline
    Outline {
        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Read collapse commands from stdin and re-render after each
    Session {
        /// Tree document (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
