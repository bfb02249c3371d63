pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::error::Result;

#[derive(Parser)]
#[command(name = "chirpterm")]
#[command(about = "A terminal client for microblogging services")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize chirpterm configuration
    Init,

    /// Validate the configuration and key bindings
    Check,

    /// Show the resolved key bindings
    Keys,

    /// Walk through the repository lifecycle with sample data
    Demo,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = commands::load_config(self.config.as_deref())?;
        let _guard = commands::init_logging(self.debug, self.verbose, &config.logging)?;

        match self.command {
            Commands::Init => commands::init(self.config.as_deref()),
            Commands::Check => commands::check(&config),
            Commands::Keys => commands::keys(&config),
            Commands::Demo => commands::demo(&config),
        }
    }
}
