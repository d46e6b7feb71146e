// src/lib.rs
pub mod core;
pub mod generators;
pub mod models;

pub use crate::core::store::{CredentialStore, FindResult, SaveOutcome, StoreError};
pub use crate::generators::PasswordGenerator;
pub use crate::models::{CredentialCollection, CredentialRecord};
