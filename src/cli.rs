//! Command-line interface for Bingerr.

use clap::{Parser, Subcommand};

/// Bingerr - Personal TV series discovery service
#[derive(Parser)]
#[command(name = "bingerr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web service (default when no command is given)
    #[command(alias = "-s", alias = "--serve")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}
