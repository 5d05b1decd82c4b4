//! Analysis log: saved snapshots of analyzed note sets
//!
//! Each entry keeps the ABC notes that were analyzed, a copy of their
//! classification and the user's annotations. The log is exported and
//! re-imported as a JSON array; imports tolerate missing and extra fields
//! but reject anything that is not an array of entry objects.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::pc_set::ClassificationEntry;

/// Classification data embedded in a log entry
///
/// Every field is optional: entries written by older versions, or edited by
/// hand, may lack any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PcSetSnapshot {
    pub rahn_prime_form: Option<String>,
    pub forte_prime_form: Option<String>,
    pub interval_vector: Option<String>,
    pub forte_name: Option<String>,
    pub cardinality: Option<u8>,
    pub z_mate: Option<String>,
    pub super_sets: Option<Vec<String>>,
    pub sub_sets: Option<Vec<String>>,
}

impl From<&ClassificationEntry> for PcSetSnapshot {
    fn from(entry: &ClassificationEntry) -> Self {
        let keys = |sets: &[crate::models::pc_set::PrimeForm]| sets.iter().map(|pf| pf.key()).collect();
        PcSetSnapshot {
            rahn_prime_form: Some(entry.rahn_prime_form.key()),
            forte_prime_form: Some(entry.forte_prime_form.key()),
            interval_vector: Some(entry.interval_vector.to_string()),
            forte_name: entry.forte_name.clone(),
            cardinality: Some(entry.cardinality),
            z_mate: entry.z_mate.as_ref().map(|pf| pf.key()),
            super_sets: Some(keys(&entry.super_sets)),
            sub_sets: Some(keys(&entry.sub_sets)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisLogEntry {
    pub key: String,
    /// Free-text measure reference ("T. 12", "m. 3-4")
    pub measure: String,
    pub comment: String,
    pub abc_notes: Vec<String>,
    pub pc_set: Option<PcSetSnapshot>,
    pub chord_label: Option<String>,
    pub chord_value: Option<String>,
}

/// The editable part of an entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub measure: String,
    pub comment: String,
    pub abc_notes: Vec<String>,
    pub pc_set: Option<PcSetSnapshot>,
    pub chord_label: Option<String>,
    pub chord_value: Option<String>,
}

impl EntryDraft {
    pub fn new(abc_notes: Vec<String>, classification: Option<&ClassificationEntry>) -> Self {
        EntryDraft {
            abc_notes,
            pc_set: classification.map(PcSetSnapshot::from),
            ..Default::default()
        }
    }

    pub fn with_annotations(mut self, measure: impl Into<String>, comment: impl Into<String>) -> Self {
        self.measure = measure.into();
        self.comment = comment.into();
        self
    }

    /// Empty chord strings are stored as absent
    pub fn with_chord(mut self, label: Option<String>, value: Option<String>) -> Self {
        self.chord_label = label.filter(|s| !s.is_empty());
        self.chord_value = value.filter(|s| !s.is_empty());
        self
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("analysis file is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("analysis file must contain a JSON array of entries")]
    NotAnArray,

    #[error("entry {index} is malformed: {message}")]
    InvalidEntry { index: usize, message: String },
}

fn generate_key() -> String {
    format!("entry-{}", uuid::Uuid::new_v4())
}

/// Parse an exported analysis file
pub fn parse_entries(json: &str) -> Result<Vec<AnalysisLogEntry>, ImportError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(ImportError::InvalidEntry {
                    index,
                    message: "expected an object".to_string(),
                });
            }
            let mut entry: AnalysisLogEntry =
                serde_json::from_value(item).map_err(|e| ImportError::InvalidEntry {
                    index,
                    message: e.to_string(),
                })?;
            if entry.key.is_empty() {
                entry.key = generate_key();
            }
            Ok(entry)
        })
        .collect()
}

/// Ordered list of saved analyses with an optional selection
#[derive(Debug, Clone, Default)]
pub struct AnalysisLog {
    entries: Vec<AnalysisLogEntry>,
    selected: Option<String>,
}

impl AnalysisLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[AnalysisLogEntry] {
        &self.entries
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a new entry and clear the selection; returns the new key
    pub fn save(&mut self, draft: EntryDraft) -> String {
        let key = generate_key();
        self.entries.push(AnalysisLogEntry {
            key: key.clone(),
            measure: draft.measure,
            comment: draft.comment,
            abc_notes: draft.abc_notes,
            pc_set: draft.pc_set,
            chord_label: draft.chord_label,
            chord_value: draft.chord_value,
        });
        self.selected = None;
        key
    }

    /// Overwrite an entry in place, keeping its key and position
    pub fn update(&mut self, key: &str, draft: EntryDraft) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) else {
            log::warn!("Analysis log update for unknown entry '{}'", key);
            return false;
        };
        entry.measure = draft.measure;
        entry.comment = draft.comment;
        entry.abc_notes = draft.abc_notes;
        entry.pc_set = draft.pc_set;
        entry.chord_label = draft.chord_label;
        entry.chord_value = draft.chord_value;
        true
    }

    pub fn delete(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        if self.selected.as_deref() == Some(key) {
            self.selected = None;
        }
        self.entries.len() != before
    }

    /// Select an entry and return its notes for re-analysis
    pub fn select(&mut self, key: &str) -> Option<&[String]> {
        let entry = self.entries.iter().find(|e| e.key == key)?;
        self.selected = Some(entry.key.clone());
        Some(&entry.abc_notes)
    }

    /// Move an entry from one position to another; out-of-range moves are ignored
    pub fn move_item(&mut self, from: usize, to: usize) {
        if from >= self.entries.len() || to >= self.entries.len() {
            return;
        }
        let item = self.entries.remove(from);
        self.entries.insert(to, item);
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }

    /// Replace the log with an imported file; on error the log is unchanged
    pub fn import_json(&mut self, json: &str) -> Result<usize, ImportError> {
        let entries = parse_entries(json).map_err(|e| {
            log::warn!("Analysis log import failed: {}", e);
            e
        })?;
        self.entries = entries;
        self.selected = None;
        Ok(self.entries.len())
    }
}
