//! CLI Argument Parsing
//!
//! Global flags (`--json`, `--color`, `--verbose`, `--config-dir`) are
//! accepted before or after the subcommand. Running `dcr` with no
//! subcommand is the same as `dcr run`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// dcr - package a local directory and deliver it over SSH
#[derive(Parser, Debug)]
#[command(name = "dcr")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'dcr config' first to save a connection profile.")]
pub struct Cli {
    /// Emit NDJSON events on stdout instead of human output
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding profile.toml (overrides DCR_CONFIG_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Package, upload and unpack using the saved profile
    Run {
        /// Additional exclusion pattern (can be specified multiple times)
        #[arg(short, long = "exclude", value_name = "PATTERN")]
        exclude: Vec<String>,
    },

    /// Create or update the saved profile interactively
    Config {
        /// Save without running a connection test first
        #[arg(long)]
        skip_test: bool,
    },

    /// Connect and run the destination checks without uploading
    Test,

    /// Print the saved profile with secrets redacted
    Show,

    /// Delete the saved profile
    Reset {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    /// The subcommand to run, defaulting to `run`.
    pub fn command_or_default(&self) -> Commands {
        match &self.command {
            Some(Commands::Run { exclude }) => Commands::Run {
                exclude: exclude.clone(),
            },
            Some(Commands::Config { skip_test }) => Commands::Config {
                skip_test: *skip_test,
            },
            Some(Commands::Test) => Commands::Test,
            Some(Commands::Show) => Commands::Show,
            Some(Commands::Reset { yes }) => Commands::Reset { yes: *yes },
            None => Commands::Run {
                exclude: Vec::new(),
            },
        }
    }
}
