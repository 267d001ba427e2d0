//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Infobook static documentation generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Config file path
    #[arg(short = 'C', long, default_value = "infobook.json")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate the static HTML site from the configured infobook
    Build {
        /// Output directory path
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Directory holding the generated recipe and translation-key
        /// registries
        #[arg(long, default_value = "registries")]
        registries: PathBuf,

        /// Directory holding the exported item and fluid icons
        #[arg(long, default_value = "icons")]
        icons: PathBuf,

        /// Additional asset directories copied into the output's
        /// `assets/` directory
        #[arg(long)]
        assets: Vec<PathBuf>,

        /// Override the base URL of the published site.
        ///
        /// Useful for CI/CD deployments where the production URL differs
        /// from local development, without modifying the config file.
        #[arg(long = "base-url")]
        base_url: Option<String>,
    },
}
