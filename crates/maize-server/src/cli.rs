use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// MaizeCare - crop monitoring backend.
#[derive(Debug, Parser)]
#[command(name = "maizecare", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra TOML config file, layered above the discovered ones
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Replace a user's plants, detections and soil readings with demo data
    Seed {
        /// Internal user id that will own the seeded records
        #[arg(long)]
        owner: String,
    },
}

impl Cli {
    /// Subcommand to run; `serve` when none is given.
    #[must_use]
    pub fn subcommand(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}
