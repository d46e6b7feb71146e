// src/cli/handlers.rs
use inquire::{Confirm, InquireError, Select};
use std::error::Error;

use rust_passkeep::core::{
    CredentialStore, FindResult, PendingSave, SaveConfirmation, SaveOutcome, SaveReport, StoreError,
};
use rust_passkeep::generators::PasswordGenerator;
use rust_passkeep::models::{display_title, CredentialRecord};

/// Asks the overwrite and save questions on the terminal.
pub struct PromptConfirmation;

impl SaveConfirmation for PromptConfirmation {
    fn confirm_overwrite(&mut self, pending: &PendingSave, existing: &CredentialRecord) -> bool {
        println!("\n⚠️  Details for '{}' already exist.", pending.website());
        println!("Email: {}", existing.login);
        println!("Password: {}", existing.secret);

        ask("Do you want to update it with the new details?")
    }

    fn confirm_save(&mut self, pending: &PendingSave) -> bool {
        println!("\n📝 {}", display_title(pending.website()));
        println!("Details to save:");
        println!("Email: {}", pending.record().login);
        println!("Password: {}", pending.record().secret);

        ask("Is it okay?")
    }
}

// A prompt that fails or is interrupted counts as "no".
fn ask(question: &str) -> bool {
    match Confirm::new(question).with_default(false).prompt() {
        Ok(answer) => answer,
        Err(e) => {
            log::debug!("Confirmation prompt ended without an answer: {}", e);
            false
        }
    }
}

pub fn handle_generate(generator: &PasswordGenerator, count: usize) {
    for (i, password) in generator.generate_batch(count).iter().enumerate() {
        println!("{:>2}. {}", i + 1, password);
    }
}

/// Offer generated candidates and return the one picked, if any.
pub fn choose_password(generator: &PasswordGenerator, count: usize) -> Result<Option<String>, InquireError> {
    let candidates = generator.generate_batch(count);

    Select::new("Choose a password:", candidates)
        .with_help_message("Use arrow keys to navigate, Enter to select, Esc to skip.")
        .with_page_size(count.max(1))
        .prompt_skippable()
}

pub fn handle_add(
    store: &CredentialStore,
    website: &str,
    login: &str,
    password: &str,
) -> Result<(), Box<dyn Error>> {
    match store.upsert(website, login, password, &mut PromptConfirmation) {
        Ok(report) => {
            for line in save_messages(&report) {
                println!("{}", line);
            }
        }
        Err(e) => {
            if is_storage_failure(&e) {
                log::error!("Saving credentials for '{}' failed: {}", website.trim(), e);
            }
            println!("{}", error_message(&e));
        }
    }

    Ok(())
}

pub fn handle_find(store: &CredentialStore, website: &str) -> Result<(), Box<dyn Error>> {
    match store.find(website) {
        Ok(result) => println!("{}", find_message(&result)),
        Err(e) => {
            if is_storage_failure(&e) {
                log::error!("Looking up '{}' failed: {}", website.trim(), e);
            }
            println!("{}", error_message(&e));
        }
    }

    Ok(())
}

pub fn save_messages(report: &SaveReport) -> Vec<String> {
    let mut lines = Vec::new();

    if report.recovered_from_corruption {
        lines.push("⚠️  Existing data file is corrupted. Starting fresh.".to_string());
    }

    match report.outcome {
        SaveOutcome::Saved => lines.push("✅ Password details saved!".to_string()),
        SaveOutcome::Cancelled => lines.push("❗ Nothing saved.".to_string()),
    }

    lines
}

pub fn find_message(result: &FindResult) -> String {
    match result {
        FindResult::Found { website, record } => format!(
            "\n🔐 {} Details\nEmail: {}\nPassword: {}",
            display_title(website),
            record.login,
            record.secret
        ),
        FindResult::NotFound { website } => {
            format!("❌ No details for '{}' exist.", display_title(website))
        }
        FindResult::NoDataYet => "❗ No saved passwords yet. Save some first!".to_string(),
        FindResult::CorruptedStore => {
            "❌ The data file is corrupted or empty. Cannot read passwords.".to_string()
        }
    }
}

pub fn error_message(error: &StoreError) -> String {
    match error {
        StoreError::EmptyField => "❌ Please don't leave Website or Password fields empty!".to_string(),
        StoreError::InvalidLogin => "⚠️  Please enter a valid email address.".to_string(),
        StoreError::EmptyQuery => "❌ Please enter a website to search.".to_string(),
        other => format!("❌ {}", other),
    }
}

fn is_storage_failure(error: &StoreError) -> bool {
    matches!(
        error,
        StoreError::IoError(_) | StoreError::JsonError(_) | StoreError::PersistError(_)
    )
}
