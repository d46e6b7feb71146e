// src/cli/commands.rs
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print freshly generated passwords
    Generate {
        /// How many passwords to print
        #[arg(long, short)]
        count: Option<usize>,
    },

    /// Save credentials for a website
    Add {
        /// Website the credentials belong to
        #[arg(long, short)]
        website: String,

        /// Email or username (defaults to the configured login)
        #[arg(long, short)]
        login: Option<String>,

        /// Password to store; pick from generated ones when omitted
        #[arg(long, short)]
        password: Option<String>,
    },

    /// Show the credentials saved for a website
    Find {
        /// Website to look up
        #[arg(required = true)]
        website: String,
    },
}
