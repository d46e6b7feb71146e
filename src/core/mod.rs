// src/core/mod.rs
pub mod config;
pub mod store;

pub use store::{
    CredentialStore, FindResult, LoadStatus, PendingSave, SaveConfirmation, SaveOutcome,
    SaveReport, Snapshot, StoreError,
};
