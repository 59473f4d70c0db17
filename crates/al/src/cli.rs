//! CLI command structure using clap

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "al")]
#[command(about = "Agent Layer CLI", long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Print version information
    #[arg(short = 'V', long)]
    pub version: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Version dispatch diagnostics
    #[command(subcommand)]
    Dispatch(DispatchCommands),
}

#[derive(Subcommand)]
pub enum DispatchCommands {
    /// Show which al version this directory resolves to
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
