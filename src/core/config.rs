// src/core/config.rs
use std::env;
use std::path::PathBuf;
use log::LevelFilter;
use crate::generators::DEFAULT_BATCH_SIZE;

// Configuration for the credential keeper
#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub data_file: PathBuf,

    // Prompts
    pub default_login: String,
    pub password_choices: usize,

    // Logging
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data.json"),

            default_login: "your.email@example.com".to_string(),
            password_choices: DEFAULT_BATCH_SIZE,

            log_level: LevelFilter::Info,
            log_file: PathBuf::from("./logs/passkeep.log"),
        }
    }
}

impl Config {
    // Load configuration from environment variables
    pub fn load() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup("PASSKEEP_DATA_FILE") {
            if !path.trim().is_empty() {
                config.data_file = PathBuf::from(path);
            }
        }

        if let Some(login) = lookup("PASSKEEP_DEFAULT_LOGIN") {
            config.default_login = login;
        }

        if let Some(val) = lookup("PASSKEEP_PASSWORD_CHOICES") {
            match val.parse::<usize>() {
                Ok(count) if count > 0 => config.password_choices = count,
                _ => log::warn!("Invalid PASSKEEP_PASSWORD_CHOICES '{}', using {}", val, config.password_choices),
            }
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            match level.to_lowercase().as_str() {
                "off" => config.log_level = LevelFilter::Off,
                "error" => config.log_level = LevelFilter::Error,
                "warn" => config.log_level = LevelFilter::Warn,
                "info" => config.log_level = LevelFilter::Info,
                "debug" => config.log_level = LevelFilter::Debug,
                "trace" => config.log_level = LevelFilter::Trace,
                _ => log::warn!("Unknown log level '{}', using {}", level, config.log_level),
            }
        }

        if let Some(file) = lookup("LOG_FILE") {
            config.log_file = PathBuf::from(file);
        }

        config
    }
}
