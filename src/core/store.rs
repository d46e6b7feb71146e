// src/core/store.rs
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use serde::Serialize;
use crate::models::{website_key, CredentialCollection, CredentialRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Website and password must not be empty")]
    EmptyField,

    #[error("Login must look like an email address")]
    InvalidLogin,

    #[error("Enter a website to search for")]
    EmptyQuery,

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to replace data file: {0}")]
    PersistError(#[from] tempfile::PersistError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// What the backing file looked like when it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Absent or zero-length; nothing has been saved yet.
    Missing,
    Parsed,
    /// The content did not parse and was treated as empty.
    Corrupted,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub collection: CredentialCollection,
    pub status: LoadStatus,
}

impl Snapshot {
    pub fn is_corrupted(&self) -> bool {
        self.status == LoadStatus::Corrupted
    }
}

/// A validated save waiting on the caller's decisions.
#[derive(Debug, Clone)]
pub struct PendingSave {
    website: String,
    key: String,
    record: CredentialRecord,
    existing: Option<CredentialRecord>,
    recovered_from_corruption: bool,
}

impl PendingSave {
    /// Website as the user typed it, trimmed.
    pub fn website(&self) -> &str {
        &self.website
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn record(&self) -> &CredentialRecord {
        &self.record
    }

    /// The record already stored under this key. `Some` means the caller has
    /// to agree to an overwrite before committing.
    pub fn conflict(&self) -> Option<&CredentialRecord> {
        self.existing.as_ref()
    }

    pub fn recovered_from_corruption(&self) -> bool {
        self.recovered_from_corruption
    }
}

/// Answers the two questions a save asks before touching the file.
pub trait SaveConfirmation {
    fn confirm_overwrite(&mut self, pending: &PendingSave, existing: &CredentialRecord) -> bool;

    fn confirm_save(&mut self, pending: &PendingSave) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub outcome: SaveOutcome,
    /// The data file was unreadable and has been treated as empty.
    pub recovered_from_corruption: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindResult {
    Found { website: String, record: CredentialRecord },
    NotFound { website: String },
    NoDataYet,
    CorruptedStore,
}

/// JSON file of credentials keyed by website.
///
/// Nothing is cached between calls: every operation reads the file again and
/// every save rewrites it completely.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Snapshot> {
        let content = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No data file at {}", self.path.display());
                return Ok(Snapshot {
                    collection: CredentialCollection::new(),
                    status: LoadStatus::Missing,
                });
            }
            Err(e) => return Err(e.into()),
        };

        if content.is_empty() {
            log::debug!("Data file {} is empty", self.path.display());
            return Ok(Snapshot {
                collection: CredentialCollection::new(),
                status: LoadStatus::Missing,
            });
        }

        match serde_json::from_slice::<CredentialCollection>(&content) {
            Ok(collection) => {
                log::debug!("Loaded {} entries from {}", collection.len(), self.path.display());
                Ok(Snapshot { collection, status: LoadStatus::Parsed })
            }
            Err(e) => {
                log::warn!("Data file {} is corrupted, treating it as empty: {}", self.path.display(), e);
                Ok(Snapshot {
                    collection: CredentialCollection::new(),
                    status: LoadStatus::Corrupted,
                })
            }
        }
    }

    /// Validate the input and look for an existing record under the same key.
    /// Nothing is written.
    pub fn prepare(&self, website: &str, login: &str, secret: &str) -> Result<PendingSave> {
        let website = website.trim();
        let secret = secret.trim();

        if website.is_empty() || secret.is_empty() {
            return Err(StoreError::EmptyField);
        }

        let login = login.trim();
        if !login.contains('@') || !login.contains('.') {
            return Err(StoreError::InvalidLogin);
        }

        let key = website_key(website);
        let snapshot = self.load()?;
        let existing = snapshot.collection.get(&key).cloned();

        Ok(PendingSave {
            website: website.to_string(),
            key,
            record: CredentialRecord::new(login, secret),
            existing,
            recovered_from_corruption: snapshot.is_corrupted(),
        })
    }

    /// Write a confirmed save. The file is read again right before writing so
    /// that entries added since `prepare` are kept.
    ///
    /// Returns the status of that second read; `Corrupted` means whatever was
    /// in the file has been replaced by this single entry.
    pub fn commit(&self, pending: &PendingSave) -> Result<LoadStatus> {
        let snapshot = self.load()?;
        let status = snapshot.status;
        let mut collection = snapshot.collection;
        collection.insert(&pending.key, pending.record.clone());
        self.write(&collection)?;

        log::info!("Saved credentials for {}", pending.key);
        Ok(status)
    }

    pub fn upsert<C>(&self, website: &str, login: &str, secret: &str, confirm: &mut C) -> Result<SaveReport>
    where
        C: SaveConfirmation + ?Sized,
    {
        let pending = self.prepare(website, login, secret)?;
        let cancelled = SaveReport {
            outcome: SaveOutcome::Cancelled,
            recovered_from_corruption: pending.recovered_from_corruption,
        };

        if let Some(existing) = pending.conflict() {
            if !confirm.confirm_overwrite(&pending, existing) {
                log::debug!("Overwrite of {} declined", pending.key);
                return Ok(cancelled);
            }
        }

        if !confirm.confirm_save(&pending) {
            log::debug!("Save of {} declined", pending.key);
            return Ok(cancelled);
        }

        let status = self.commit(&pending)?;
        if status == LoadStatus::Corrupted && !pending.recovered_from_corruption {
            log::warn!("Data file {} was corrupted before saving {}", self.path.display(), pending.key);
        }

        Ok(SaveReport {
            outcome: SaveOutcome::Saved,
            recovered_from_corruption: pending.recovered_from_corruption || status == LoadStatus::Corrupted,
        })
    }

    pub fn find(&self, website: &str) -> Result<FindResult> {
        let key = website_key(website);
        if key.is_empty() {
            return Err(StoreError::EmptyQuery);
        }

        let snapshot = self.load()?;
        let result = match snapshot.status {
            LoadStatus::Missing => FindResult::NoDataYet,
            LoadStatus::Corrupted => FindResult::CorruptedStore,
            LoadStatus::Parsed => match snapshot.collection.get(&key) {
                Some(record) => FindResult::Found { website: key, record: record.clone() },
                None => FindResult::NotFound { website: key },
            },
        };

        Ok(result)
    }

    // Serialized into a sibling temp file and renamed over the data file; a
    // failed write leaves the previous file intact.
    fn write(&self, collection: &CredentialCollection) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let mut file = NamedTempFile::new_in(&dir)?;
        {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut file, formatter);
            collection.serialize(&mut serializer)?;
        }
        file.write_all(b"\n")?;
        file.as_file().sync_all()?;
        file.persist(&self.path)?;

        log::debug!("Wrote {} entries to {}", collection.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Answers {
        overwrite: bool,
        save: bool,
        asked_overwrite: usize,
    }

    impl Answers {
        fn yes() -> Self {
            Self { overwrite: true, save: true, asked_overwrite: 0 }
        }
    }

    impl SaveConfirmation for Answers {
        fn confirm_overwrite(&mut self, _pending: &PendingSave, _existing: &CredentialRecord) -> bool {
            self.asked_overwrite += 1;
            self.overwrite
        }

        fn confirm_save(&mut self, _pending: &PendingSave) -> bool {
            self.save
        }
    }

    fn store_in(dir: &TempDir) -> CredentialStore {
        CredentialStore::new(dir.path().join("data.json"))
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let snapshot = store_in(&dir).load().unwrap();

        assert_eq!(snapshot.status, LoadStatus::Missing);
        assert!(snapshot.collection.is_empty());
    }

    #[test]
    fn load_zero_length_file_is_missing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "").unwrap();

        assert_eq!(store.load().unwrap().status, LoadStatus::Missing);
    }

    #[test]
    fn load_garbage_recovers_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        let snapshot = store.load().unwrap();
        assert!(snapshot.is_corrupted());
        assert!(snapshot.collection.is_empty());
    }

    #[test]
    fn load_wrong_shape_counts_as_corrupted() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"site.com": {"email": "a@b.com"}}"#).unwrap();

        assert_eq!(store.load().unwrap().status, LoadStatus::Corrupted);
    }

    #[test]
    fn empty_website_or_secret_is_rejected_without_writing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let err = store.upsert("", "a@b.com", "x", &mut Answers::yes()).unwrap_err();
        assert!(matches!(err, StoreError::EmptyField));

        let err = store.upsert("site.com", "a@b.com", "   ", &mut Answers::yes()).unwrap_err();
        assert!(matches!(err, StoreError::EmptyField));

        assert!(!store.path().exists());
    }

    #[test]
    fn empty_field_wins_over_invalid_login() {
        let dir = TempDir::new().unwrap();
        let err = store_in(&dir).prepare(" ", "noatsign", "").unwrap_err();
        assert!(matches!(err, StoreError::EmptyField));
    }

    #[test]
    fn login_without_at_or_dot_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        for login in ["noatsign", "user@localhost", "first.last"] {
            let err = store.upsert("site.com", login, "secret123", &mut Answers::yes()).unwrap_err();
            assert!(matches!(err, StoreError::InvalidLogin), "{login} accepted");
        }
    }

    #[test]
    fn save_writes_four_space_indented_json() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let report = store.upsert("Site.com", "a@b.com", "pw", &mut Answers::yes()).unwrap();
        assert_eq!(report.outcome, SaveOutcome::Saved);
        assert!(!report.recovered_from_corruption);

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            content,
            "{\n    \"site.com\": {\n        \"email\": \"a@b.com\",\n        \"password\": \"pw\"\n    }\n}\n"
        );
    }

    #[test]
    fn declining_final_confirmation_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut answers = Answers { overwrite: true, save: false, asked_overwrite: 0 };

        let report = store.upsert("site.com", "a@b.com", "pw", &mut answers).unwrap();
        assert_eq!(report.outcome, SaveOutcome::Cancelled);
        assert_eq!(answers.asked_overwrite, 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn duplicate_key_asks_before_overwriting() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.upsert("site.com", "old@b.com", "old", &mut Answers::yes()).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let mut decline = Answers { overwrite: false, save: true, asked_overwrite: 0 };
        let report = store.upsert(" SITE.com", "new@b.com", "new", &mut decline).unwrap();
        assert_eq!(report.outcome, SaveOutcome::Cancelled);
        assert_eq!(decline.asked_overwrite, 1);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);

        let mut accept = Answers::yes();
        store.upsert("site.com", "new@b.com", "new", &mut accept).unwrap();
        assert_eq!(accept.asked_overwrite, 1);

        match store.find("site.com").unwrap() {
            FindResult::Found { record, .. } => assert_eq!(record, CredentialRecord::new("new@b.com", "new")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn prepare_exposes_existing_record() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.upsert("site.com", "old@b.com", "old", &mut Answers::yes()).unwrap();

        let pending = store.prepare("Site.com ", "new@b.com", " new ").unwrap();
        assert_eq!(pending.key(), "site.com");
        assert_eq!(pending.website(), "Site.com");
        assert_eq!(pending.record().secret, "new");
        assert_eq!(pending.conflict(), Some(&CredentialRecord::new("old@b.com", "old")));
    }

    #[test]
    fn commit_keeps_entries_written_after_prepare() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let pending = store.prepare("first.com", "a@b.com", "one").unwrap();

        store.upsert("second.com", "c@d.com", "two", &mut Answers::yes()).unwrap();
        store.commit(&pending).unwrap();

        let snapshot = store.load().unwrap();
        assert_eq!(snapshot.collection.len(), 2);
        assert!(snapshot.collection.contains_key("first.com"));
        assert!(snapshot.collection.contains_key("second.com"));
    }

    #[test]
    fn save_over_corrupted_file_reports_recovery() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "[1, 2").unwrap();

        let report = store.upsert("site.com", "a@b.com", "pw", &mut Answers::yes()).unwrap();
        assert_eq!(report.outcome, SaveOutcome::Saved);
        assert!(report.recovered_from_corruption);

        let snapshot = store.load().unwrap();
        assert_eq!(snapshot.status, LoadStatus::Parsed);
        assert_eq!(snapshot.collection.len(), 1);
    }

    /// Confirms everything, but damages the data file before the save lands.
    struct CorruptBeforeSave {
        path: PathBuf,
    }

    impl SaveConfirmation for CorruptBeforeSave {
        fn confirm_overwrite(&mut self, _pending: &PendingSave, _existing: &CredentialRecord) -> bool {
            true
        }

        fn confirm_save(&mut self, _pending: &PendingSave) -> bool {
            fs::write(&self.path, "{ broken").unwrap();
            true
        }
    }

    #[test]
    fn corruption_between_prepare_and_commit_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.upsert("old.com", "a@b.com", "pw", &mut Answers::yes()).unwrap();

        let mut answers = CorruptBeforeSave { path: store.path().to_path_buf() };
        let report = store.upsert("new.com", "c@d.com", "pw2", &mut answers).unwrap();

        assert_eq!(report.outcome, SaveOutcome::Saved);
        assert!(report.recovered_from_corruption);

        let keys: Vec<String> = store.load().unwrap().collection.keys().map(String::from).collect();
        assert_eq!(keys, vec!["new.com".to_string()]);
    }

    #[test]
    fn commit_returns_status_of_second_read() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let pending = store.prepare("site.com", "a@b.com", "pw").unwrap();
        assert_eq!(store.commit(&pending).unwrap(), LoadStatus::Missing);
        assert_eq!(store.commit(&pending).unwrap(), LoadStatus::Parsed);

        fs::write(store.path(), "[oops").unwrap();
        assert_eq!(store.commit(&pending).unwrap(), LoadStatus::Corrupted);
    }

    #[test]
    fn one_bad_record_discards_the_whole_file_on_next_save() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"good.com": {"email": "a@b.com", "password": "pw"}, "bad.com": {"email": 42}}"#,
        )
        .unwrap();

        let snapshot = store.load().unwrap();
        assert_eq!(snapshot.status, LoadStatus::Corrupted);
        assert!(snapshot.collection.is_empty());
        assert_eq!(store.find("good.com").unwrap(), FindResult::CorruptedStore);

        let report = store.upsert("new.com", "c@d.com", "pw2", &mut Answers::yes()).unwrap();
        assert!(report.recovered_from_corruption);

        let snapshot = store.load().unwrap();
        assert_eq!(snapshot.collection.len(), 1);
        assert!(!snapshot.collection.contains_key("good.com"));
        assert!(snapshot.collection.contains_key("new.com"));
    }

    #[test]
    fn find_on_zero_length_file_is_no_data_yet() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "").unwrap();

        assert_eq!(store.find("anything").unwrap(), FindResult::NoDataYet);
    }

    #[test]
    fn mixed_case_keys_on_disk_are_found_and_merged() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"Example.com": {"email": "old@b.com", "password": "old"}}"#).unwrap();

        assert_eq!(
            store.find("example.com").unwrap(),
            FindResult::Found {
                website: "example.com".to_string(),
                record: CredentialRecord::new("old@b.com", "old"),
            }
        );

        let pending = store.prepare("EXAMPLE.com", "new@b.com", "new").unwrap();
        assert_eq!(pending.conflict(), Some(&CredentialRecord::new("old@b.com", "old")));
        store.commit(&pending).unwrap();

        let keys: Vec<String> = store.load().unwrap().collection.keys().map(String::from).collect();
        assert_eq!(keys, vec!["example.com".to_string()]);
        assert!(fs::read_to_string(store.path()).unwrap().contains("\"example.com\""));
    }

    #[test]
    fn find_distinguishes_missing_corrupted_and_absent_key() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.find("anything").unwrap(), FindResult::NoDataYet);
        assert!(matches!(store.find("  ").unwrap_err(), StoreError::EmptyQuery));

        store.upsert("known.com", "a@b.com", "pw", &mut Answers::yes()).unwrap();
        assert_eq!(
            store.find("Unknown.com").unwrap(),
            FindResult::NotFound { website: "unknown.com".to_string() }
        );

        fs::write(store.path(), "not json at all").unwrap();
        assert_eq!(store.find("known.com").unwrap(), FindResult::CorruptedStore);
    }

    #[test]
    fn write_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("nested/deeper/data.json"));

        store.upsert("site.com", "a@b.com", "pw", &mut Answers::yes()).unwrap();
        assert!(store.path().exists());
    }
}
