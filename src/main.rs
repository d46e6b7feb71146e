use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::Path;

mod cli;

use crate::cli::{Args, CliCommand};
use rust_passkeep::core::config::Config;
use rust_passkeep::core::CredentialStore;
use rust_passkeep::generators::PasswordGenerator;

fn init_logging(config: &Config) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = config.log_file.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .format_timestamp_secs()
        .format_module_path(true)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables
    if Path::new(".env").exists() {
        dotenvy::dotenv().ok();
    }

    let args = Args::parse();
    let config = Config::load();

    if let Err(e) = init_logging(&config) {
        eprintln!("⚠️  Logging disabled, cannot open {}: {}", config.log_file.display(), e);
    }

    let data_file = args.data_file(&config);
    log::info!("🔒 Starting passkeep with data file {}", data_file.display());

    let store = CredentialStore::new(data_file);
    let generator = PasswordGenerator::new();

    match args.command {
        Some(CliCommand::Generate { count }) => {
            cli::handlers::handle_generate(&generator, count.unwrap_or(config.password_choices));
        }
        Some(CliCommand::Add { website, login, password }) => {
            let login = login.unwrap_or_else(|| config.default_login.clone());
            let password = match password {
                Some(password) => password,
                None => cli::handlers::choose_password(&generator, config.password_choices)?
                    .unwrap_or_default(),
            };
            cli::handlers::handle_add(&store, &website, &login, &password)?;
        }
        Some(CliCommand::Find { website }) => {
            cli::handlers::handle_find(&store, &website)?;
        }
        None => {
            cli::menu::run_cli_menu(&store, &generator, &config)?;
        }
    }

    log::info!("✅ passkeep shutdown complete.");
    Ok(())
}
