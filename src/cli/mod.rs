// src/cli/mod.rs
use clap::Parser;
use std::path::PathBuf;

use rust_passkeep::core::config::Config;

pub mod commands;
pub mod menu;
pub mod handlers;

pub use commands::CliCommand;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON file holding the saved credentials [default: PASSKEEP_DATA_FILE or data.json]
    #[arg(long, short = 'f')]
    pub data_file: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

impl Args {
    /// The command line wins; otherwise the configured file is used.
    pub fn data_file(&self, config: &Config) -> PathBuf {
        self.data_file.clone().unwrap_or_else(|| config.data_file.clone())
    }
}
