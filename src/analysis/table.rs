//! Set classification table
//!
//! The catalog of all 224 set classes is generated offline and embedded as
//! JSON. It is parsed once into an immutable [`PcSetTable`] and shared by
//! reference; tests can build reduced tables with [`PcSetTable::from_entries`].

use lazy_static::lazy_static;
use std::collections::HashMap;
use thiserror::Error;

use crate::analysis::prime_form::prime_form;
use crate::models::pc_set::{ClassificationEntry, PrimeForm};
use crate::models::pitch_class::{pitch_class_of, PitchClass};

const CATALOG_JSON: &str = include_str!("../../data/pc_set_table.json");

lazy_static! {
    static ref STANDARD_TABLE: PcSetTable = PcSetTable::from_json(CATALOG_JSON).unwrap_or_else(|e| {
        log::error!("Embedded set-class catalog is invalid: {}", e);
        PcSetTable::default()
    });
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate catalog key '{0}'")]
    DuplicateKey(String),

    #[error("catalog entry '{key}' is not in prime form (expected '{expected}')")]
    NotPrimeForm { key: String, expected: String },

    #[error("catalog entry '{key}' has cardinality {cardinality}")]
    CardinalityMismatch { key: String, cardinality: u8 },
}

/// Immutable mapping from prime-form key to classification entry
#[derive(Debug, Clone, Default)]
pub struct PcSetTable {
    entries: Vec<ClassificationEntry>,
    index: HashMap<String, usize>,
}

impl PcSetTable {
    /// The embedded catalog
    pub fn standard() -> &'static PcSetTable {
        &STANDARD_TABLE
    }

    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let entries: Vec<ClassificationEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Build a table, checking that every entry is keyed by its own prime form
    pub fn from_entries(entries: Vec<ClassificationEntry>) -> Result<Self, TableError> {
        let mut index = HashMap::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            let key = entry.key();

            let expected = prime_form(entry.forte_prime_form.pitch_classes()).key();
            if expected != key {
                return Err(TableError::NotPrimeForm { key, expected });
            }
            if entry.cardinality as usize != entry.forte_prime_form.len() {
                return Err(TableError::CardinalityMismatch {
                    key,
                    cardinality: entry.cardinality,
                });
            }
            if index.insert(key.clone(), i).is_some() {
                return Err(TableError::DuplicateKey(key));
            }
        }

        Ok(PcSetTable { entries, index })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in catalog order (by cardinality, then Forte ordinal)
    pub fn iter(&self) -> impl Iterator<Item = &ClassificationEntry> {
        self.entries.iter()
    }

    /// Look up a prime-form key; lower-case hex digits are accepted
    pub fn lookup(&self, key: &str) -> Option<&ClassificationEntry> {
        let entry = self
            .index
            .get(key)
            .or_else(|| self.index.get(&key.to_ascii_uppercase()))
            .map(|&i| &self.entries[i]);
        if entry.is_none() {
            log::warn!("No set class for key '{}'", key);
        }
        entry
    }

    pub fn get(&self, prime_form: &PrimeForm) -> Option<&ClassificationEntry> {
        self.lookup(&prime_form.key())
    }

    /// The cardinality-0 entry, if the table has one
    pub fn empty_set(&self) -> Option<&ClassificationEntry> {
        self.lookup("")
    }

    /// Reduce a pitch-class multiset and look up its set class
    pub fn classify(&self, pitch_classes: &[PitchClass]) -> Option<&ClassificationEntry> {
        self.get(&prime_form(pitch_classes))
    }

    /// Classify ABC note tokens; tokens that are not notes are ignored
    pub fn classify_notes<S: AsRef<str>>(&self, notes: &[S]) -> Option<&ClassificationEntry> {
        let pitch_classes: Vec<PitchClass> = notes
            .iter()
            .filter_map(|n| pitch_class_of(n.as_ref()))
            .collect();
        self.classify(&pitch_classes)
    }

    /// Forte name for a key, for labelling super/subset lists
    pub fn forte_name(&self, key: &str) -> Option<&str> {
        self.lookup(key).and_then(|e| e.forte_name.as_deref())
    }
}
