// src/models.rs
use serde::{Serialize, Deserialize, Deserializer};
use std::collections::btree_map::{self, BTreeMap};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Login and secret stored under one website key.
///
/// The on-disk field names stay `email` and `password` so existing data files
/// keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(rename = "email")]
    pub login: String,
    #[serde(rename = "password")]
    pub secret: String,
}

impl CredentialRecord {
    pub fn new(login: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            secret: secret.into(),
        }
    }
}

/// Every saved record, keyed by normalized website.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CredentialCollection {
    entries: BTreeMap<String, CredentialRecord>,
}

impl<'de> Deserialize<'de> for CredentialCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, CredentialRecord>::deserialize(deserializer)?;
        Ok(Self::from_raw(raw))
    }
}

impl CredentialCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize keys read from a file that may have been edited by hand.
    ///
    /// A key that is already normalized beats any variant of it. Among
    /// variants only, the first in key order is kept.
    fn from_raw(raw: BTreeMap<String, CredentialRecord>) -> Self {
        let (canonical, variants): (Vec<_>, Vec<_>) = raw
            .into_iter()
            .partition(|(key, _)| *key == website_key(key));

        let mut entries: BTreeMap<String, CredentialRecord> = canonical.into_iter().collect();
        for (key, record) in variants {
            let normalized = website_key(&key);
            match entries.entry(normalized) {
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(record);
                }
                btree_map::Entry::Occupied(slot) => {
                    log::warn!("Ignoring entry '{}', it duplicates '{}'", key, slot.key());
                }
            }
        }

        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&CredentialRecord> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Replaces whatever was stored under `key`. Keys are normalized here so
    /// the lowercase invariant holds no matter who calls this.
    pub fn insert(&mut self, key: &str, record: CredentialRecord) -> Option<CredentialRecord> {
        self.entries.insert(website_key(key), record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, CredentialRecord> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a CredentialCollection {
    type Item = (&'a String, &'a CredentialRecord);
    type IntoIter = btree_map::Iter<'a, String, CredentialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Normalize a website as typed by the user into its storage key.
pub fn website_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Title-case a website for display, capitalizing the first letter of every
/// alphanumeric run (`example.com` becomes `Example.Com`).
pub fn display_title(website: &str) -> String {
    let mut title = String::with_capacity(website.len());
    let mut at_word_start = true;

    for c in website.trim().chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                title.extend(c.to_uppercase());
            } else {
                title.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            title.push(c);
            at_word_start = true;
        }
    }

    title
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("Empty {0} count range")]
    EmptyRange(&'static str),

    #[error("Symbol alphabet must not be empty")]
    NoSymbols,

    #[error("Symbols must be printable ASCII, got byte {0:#04x}")]
    NonAsciiSymbol(u8),
}

// Password generation rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordRules {
    letter_count: RangeInclusive<usize>,
    symbol_count: RangeInclusive<usize>,
    digit_count: RangeInclusive<usize>,
    symbols: &'static [u8],
}

impl PasswordRules {
    pub const LETTERS: &'static [u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    pub const DIGITS: &'static [u8] = b"0123456789";
    pub const SYMBOLS: &'static [u8] = b"!#$%&()*+";

    pub fn new(
        letter_count: RangeInclusive<usize>,
        symbol_count: RangeInclusive<usize>,
        digit_count: RangeInclusive<usize>,
        symbols: &'static str,
    ) -> Result<Self, RulesError> {
        for (name, range) in [("letter", &letter_count), ("symbol", &symbol_count), ("digit", &digit_count)] {
            if range.is_empty() {
                return Err(RulesError::EmptyRange(name));
            }
        }

        let symbols = symbols.as_bytes();
        if symbols.is_empty() {
            return Err(RulesError::NoSymbols);
        }
        if let Some(&bad) = symbols.iter().find(|b| !b.is_ascii_graphic()) {
            return Err(RulesError::NonAsciiSymbol(bad));
        }

        Ok(Self { letter_count, symbol_count, digit_count, symbols })
    }

    pub fn letter_count(&self) -> &RangeInclusive<usize> {
        &self.letter_count
    }

    pub fn symbol_count(&self) -> &RangeInclusive<usize> {
        &self.symbol_count
    }

    pub fn digit_count(&self) -> &RangeInclusive<usize> {
        &self.digit_count
    }

    pub fn symbols(&self) -> &'static [u8] {
        self.symbols
    }

    pub fn min_length(&self) -> usize {
        self.letter_count.start() + self.symbol_count.start() + self.digit_count.start()
    }

    pub fn max_length(&self) -> usize {
        self.letter_count.end() + self.symbol_count.end() + self.digit_count.end()
    }
}

impl Default for PasswordRules {
    fn default() -> Self {
        Self {
            letter_count: 8..=12,
            symbol_count: 2..=4,
            digit_count: 2..=4,
            symbols: Self::SYMBOLS,
        }
    }
}
