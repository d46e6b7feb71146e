// src/cli/menu.rs
use inquire::{Confirm, InquireError, Select, Text};
use std::error::Error;

use rust_passkeep::core::config::Config;
use rust_passkeep::core::CredentialStore;
use rust_passkeep::generators::PasswordGenerator;

use crate::cli::handlers;

const GENERATE: &str = "🔐  Generate passwords";
const ADD: &str = "➕  Add credentials";
const FIND: &str = "🔍  Find credentials";
const EXIT: &str = "❌  Exit";

pub fn run_cli_menu(store: &CredentialStore, generator: &PasswordGenerator, config: &Config) -> Result<(), Box<dyn Error>> {
    println!("🦀🔐 Welcome to");
    println!("╔══════════════════════════════════════╗");
    println!("║        🦀 PASSKEEP MANAGER           ║");
    println!("╚══════════════════════════════════════╝");
    println!("Data file: {}", store.path().display());

    loop {
        let options = vec![GENERATE, ADD, FIND, EXIT];

        let selection = Select::new("Choose an option:", options)
            .with_help_message("Use arrow keys to navigate, Enter to select. Esc to exit.")
            .prompt_skippable();

        let result = match selection {
            Ok(Some(GENERATE)) => {
                handlers::handle_generate(generator, config.password_choices);
                Ok(())
            }
            Ok(Some(ADD)) => add_credentials(store, generator, config),
            Ok(Some(FIND)) => find_credentials(store),
            Ok(Some(_)) | Ok(None) => break,
            Err(InquireError::OperationInterrupted) => break,
            Err(e) => return Err(Box::new(e)),
        };

        match result {
            Ok(()) => {}
            // Ctrl+C inside a sub-prompt returns to the main menu
            Err(e) if is_interrupt(e.as_ref()) => println!("❗ Cancelled."),
            Err(e) => return Err(e),
        }
    }

    println!("👋 Goodbye!");
    Ok(())
}

fn add_credentials(store: &CredentialStore, generator: &PasswordGenerator, config: &Config) -> Result<(), Box<dyn Error>> {
    let website = Text::new("Website:").prompt()?;
    let login = Text::new("Email/Username:")
        .with_default(&config.default_login)
        .prompt()?;

    let generate = Confirm::new("Generate a password?")
        .with_default(true)
        .prompt()?;

    let generated = if generate {
        handlers::choose_password(generator, config.password_choices)?
    } else {
        None
    };

    let password = match generated {
        Some(password) => password,
        None => Text::new("Password:").prompt()?,
    };

    handlers::handle_add(store, &website, &login, &password)
}

fn find_credentials(store: &CredentialStore) -> Result<(), Box<dyn Error>> {
    let website = Text::new("Website to search:").prompt()?;
    handlers::handle_find(store, &website)
}

fn is_interrupt(error: &(dyn Error + 'static)) -> bool {
    matches!(
        error.downcast_ref::<InquireError>(),
        Some(InquireError::OperationCanceled) | Some(InquireError::OperationInterrupted)
    )
}
