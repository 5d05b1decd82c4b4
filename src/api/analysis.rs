//! Set analysis operations for the WASM API
//!
//! Note lists cross the boundary as arrays of ABC token strings.

use wasm_bindgen::prelude::*;

use crate::analysis::table::PcSetTable;
use crate::api::helpers::{deserialize, serialize, validate_pitch_class, validation_error};
use crate::converters::{interval_vector_of_notes, lookup_pcset_table, record_to_abc_notes, sort_abc_notes_by_pitch};
use crate::models::PrimeForm;
use crate::parse::tokens::{active_pitch_classes, parse_abc_input, toggle_pitch_class};
use crate::renderers::{filter_set_keys, render_pc_set_html, summary_title, PcSetLabels};
use crate::{wasm_error, wasm_log, wasm_warn};

fn notes_from_js(notes: JsValue) -> Result<Vec<String>, JsValue> {
    deserialize(notes, "Invalid note list")
}

/// Classify ABC notes; returns the classification entry or `null`
#[wasm_bindgen(js_name = classifyAbcNotes)]
pub fn classify_abc_notes(notes: JsValue) -> Result<JsValue, JsValue> {
    let notes = notes_from_js(notes)?;
    let entry = lookup_pcset_table(PcSetTable::standard(), &notes);

    match entry {
        Some(entry) => {
            wasm_log!("classifyAbcNotes: {} note(s) → {}", notes.len(), entry.key());
            serialize(entry, "Failed to serialize classification")
        }
        None => {
            wasm_warn!("classifyAbcNotes: no set class for {:?}", notes);
            Ok(JsValue::NULL)
        }
    }
}

#[wasm_bindgen(js_name = intervalVectorOfNotes)]
pub fn interval_vector_of_notes_js(notes: JsValue) -> Result<String, JsValue> {
    let notes = notes_from_js(notes)?;
    Ok(interval_vector_of_notes(PcSetTable::standard(), &notes))
}

/// Tokenize and normalize typed ABC text
///
/// Returns `{ notes, transformed }`.
#[wasm_bindgen(js_name = parseAbcInput)]
pub fn parse_abc_input_js(text: &str) -> Result<JsValue, JsValue> {
    let parsed = parse_abc_input(text);
    serialize(&parsed, "Failed to serialize parsed input")
}

/// Piano-key click: toggle pitch class `pc`, adding `note` when it is absent
#[wasm_bindgen(js_name = togglePianoKey)]
pub fn toggle_piano_key(notes: JsValue, note: &str, pc: u8) -> Result<JsValue, JsValue> {
    let notes = notes_from_js(notes)?;
    let pc = validate_pitch_class(pc).map_err(validation_error)?;
    let next = toggle_pitch_class(&notes, note, pc);
    serialize(&next, "Failed to serialize notes")
}

/// Pitch classes (0-11) that are lit on the keyboard
#[wasm_bindgen(js_name = activePitchClasses)]
pub fn active_pitch_classes_js(notes: JsValue) -> Result<JsValue, JsValue> {
    let notes = notes_from_js(notes)?;
    let values: Vec<u8> = active_pitch_classes(&notes).into_iter().map(|pc| pc.value()).collect();
    serialize(&values, "Failed to serialize pitch classes")
}

/// Notes of a classification record (`{ fortePrimeForm }`); `[]` for anything else
#[wasm_bindgen(js_name = pcsetToAbcNotes)]
pub fn pcset_to_abc_notes_js(record: JsValue) -> Result<JsValue, JsValue> {
    let record: serde_json::Value = serde_wasm_bindgen::from_value(record).unwrap_or(serde_json::Value::Null);
    serialize(&record_to_abc_notes(&record), "Failed to serialize notes")
}

#[wasm_bindgen(js_name = sortAbcNotesByPitch)]
pub fn sort_abc_notes_by_pitch_js(notes: JsValue) -> Result<JsValue, JsValue> {
    let notes = notes_from_js(notes)?;
    serialize(&sort_abc_notes_by_pitch(&notes), "Failed to serialize notes")
}

/// HTML table for a prime form; `locale` "en" selects English labels
#[wasm_bindgen(js_name = renderPcSet)]
pub fn render_pc_set(prime_form: &str, locale: Option<String>) -> Result<String, JsValue> {
    let table = PcSetTable::standard();
    let entry = table
        .lookup(prime_form)
        .ok_or_else(|| validation_error(format!("Unknown prime form: '{}'", prime_form)))?;

    let labels = match locale.as_deref() {
        Some(l) if l.starts_with("en") => PcSetLabels::english(),
        _ => PcSetLabels::german(),
    };

    render_pc_set_html(table, entry, &labels).map_err(|e| {
        wasm_error!("renderPcSet failed: {}", e);
        JsValue::from_str(&e.to_string())
    })
}

/// Panel title for a prime form, e.g. "3-11 · PF [037]"
#[wasm_bindgen(js_name = pcSetSummaryTitle)]
pub fn pc_set_summary_title(prime_form: &str, title: Option<String>) -> String {
    let entry = PcSetTable::standard().lookup(prime_form);
    summary_title(title.as_deref(), entry)
}

/// Filter super/subset keys by a search string
#[wasm_bindgen(js_name = filterSetKeys)]
pub fn filter_set_keys_js(keys: JsValue, filter: &str) -> Result<JsValue, JsValue> {
    let keys: Vec<PrimeForm> = deserialize(keys, "Invalid prime form list")?;
    let filtered: Vec<String> = filter_set_keys(&keys, filter).into_iter().map(|pf| pf.key()).collect();
    serialize(&filtered, "Failed to serialize prime forms")
}
