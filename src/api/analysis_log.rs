//! Analysis log operations for the WASM API
//!
//! The log lives in WASM memory for the lifetime of the module; the host
//! persists it through `exportAnalysisLog` / `importAnalysisLog`.

use lazy_static::lazy_static;
use serde::Deserialize;
use std::sync::{Mutex, MutexGuard};
use wasm_bindgen::prelude::*;

use crate::analysis::table::PcSetTable;
use crate::api::helpers::{deserialize, serialize, validation_error};
use crate::converters::lookup_pcset_table;
use crate::models::analysis_log::EntryDraft;
use crate::models::AnalysisLog;
use crate::{wasm_error, wasm_info, wasm_warn};

// WASM-owned analysis log
lazy_static! {
    static ref ANALYSIS_LOG: Mutex<AnalysisLog> = Mutex::new(AnalysisLog::new());
}

fn lock_log() -> Result<MutexGuard<'static, AnalysisLog>, JsValue> {
    ANALYSIS_LOG.lock().map_err(|_| {
        wasm_error!("Analysis log lock poisoned");
        JsValue::from_str("Analysis log is unavailable")
    })
}

/// Entry fields as sent by the editor form
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct EntryInput {
    abc_notes: Vec<String>,
    measure: String,
    comment: String,
    chord_label: Option<String>,
    chord_value: Option<String>,
}

impl EntryInput {
    /// Classification is recomputed from the notes, never taken from the host
    fn into_draft(self) -> EntryDraft {
        let entry = if self.abc_notes.is_empty() {
            None
        } else {
            lookup_pcset_table(PcSetTable::standard(), &self.abc_notes)
        };
        EntryDraft::new(self.abc_notes, entry)
            .with_annotations(self.measure, self.comment)
            .with_chord(self.chord_label, self.chord_value)
    }
}

/// Save the current analysis; returns the new entry key
#[wasm_bindgen(js_name = saveAnalysis)]
pub fn save_analysis(input: JsValue) -> Result<String, JsValue> {
    let input: EntryInput = deserialize(input, "Invalid analysis entry")?;
    let key = lock_log()?.save(input.into_draft());
    wasm_info!("saveAnalysis: saved {}", key);
    Ok(key)
}

/// Overwrite an entry; throws when the key is unknown
#[wasm_bindgen(js_name = updateAnalysis)]
pub fn update_analysis(key: &str, input: JsValue) -> Result<(), JsValue> {
    let input: EntryInput = deserialize(input, "Invalid analysis entry")?;
    if lock_log()?.update(key, input.into_draft()) {
        Ok(())
    } else {
        Err(validation_error(format!("Unknown analysis entry: '{}'", key)))
    }
}

/// Delete an entry; returns false when the key is unknown
#[wasm_bindgen(js_name = deleteAnalysis)]
pub fn delete_analysis(key: &str) -> Result<bool, JsValue> {
    let deleted = lock_log()?.delete(key);
    if !deleted {
        wasm_warn!("deleteAnalysis: no entry '{}'", key);
    }
    Ok(deleted)
}

/// Select an entry; returns its notes, or null when the key is unknown
#[wasm_bindgen(js_name = selectAnalysis)]
pub fn select_analysis(key: &str) -> Result<JsValue, JsValue> {
    let mut log = lock_log()?;
    match log.select(key) {
        Some(notes) => serialize(&notes, "Failed to serialize notes"),
        None => Ok(JsValue::NULL),
    }
}

#[wasm_bindgen(js_name = moveAnalysis)]
pub fn move_analysis(from: usize, to: usize) -> Result<(), JsValue> {
    lock_log()?.move_item(from, to);
    Ok(())
}

/// Entries in display order
#[wasm_bindgen(js_name = getAnalysisLog)]
pub fn get_analysis_log() -> Result<JsValue, JsValue> {
    let log = lock_log()?;
    serialize(&log.entries(), "Failed to serialize analysis log")
}

#[wasm_bindgen(js_name = getSelectedAnalysis)]
pub fn get_selected_analysis() -> Result<Option<String>, JsValue> {
    Ok(lock_log()?.selected_key().map(str::to_string))
}

/// Pretty-printed JSON array for download
#[wasm_bindgen(js_name = exportAnalysisLog)]
pub fn export_analysis_log() -> Result<String, JsValue> {
    lock_log()?.export_json().map_err(|e| {
        wasm_error!("exportAnalysisLog failed: {}", e);
        JsValue::from_str(&e.to_string())
    })
}

/// Replace the log with an uploaded file; returns the number of entries
#[wasm_bindgen(js_name = importAnalysisLog)]
pub fn import_analysis_log(json: &str) -> Result<usize, JsValue> {
    let count = lock_log()?
        .import_json(json)
        .map_err(|e| validation_error(e.to_string()))?;
    wasm_info!("importAnalysisLog: loaded {} entries", count);
    Ok(count)
}
