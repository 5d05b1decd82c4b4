//! Score import and range selection for the WASM API

use wasm_bindgen::prelude::*;

use crate::analysis::table::PcSetTable;
use crate::api::helpers::{deserialize, serialize};
use crate::converters::{lookup_pcset_table, select_tokens, ScoreSelection};
use crate::models::ParsedScore;
use crate::parse::{parse_score, ScoreParseOptions};
use crate::{wasm_info, wasm_log};

/// Parse an ABC transcription into voices, measures and timed tokens
///
/// `applyKeySignature` defaults to true.
#[wasm_bindgen(js_name = parseAbcScore)]
pub fn parse_abc_score(text: &str, apply_key_signature: Option<bool>) -> Result<JsValue, JsValue> {
    let options = ScoreParseOptions {
        apply_key_signature: apply_key_signature.unwrap_or(true),
    };
    let score = parse_score(text, options);

    wasm_info!(
        "parseAbcScore: {} voice(s), {} measure(s)",
        score.voices.len(),
        score.measure_count
    );

    serialize(&score, "Failed to serialize parsed score")
}

/// Selection covering the whole score
#[wasm_bindgen(js_name = fullScoreSelection)]
pub fn full_score_selection(score: JsValue) -> Result<JsValue, JsValue> {
    let score: ParsedScore = deserialize(score, "Invalid parsed score")?;
    serialize(&ScoreSelection::full(&score), "Failed to serialize selection")
}

/// Clamp a user-edited selection to the score bounds
#[wasm_bindgen(js_name = clampScoreSelection)]
pub fn clamp_score_selection(score: JsValue, selection: JsValue) -> Result<JsValue, JsValue> {
    let score: ParsedScore = deserialize(score, "Invalid parsed score")?;
    let selection: ScoreSelection = deserialize(selection, "Invalid score selection")?;
    serialize(&selection.clamp(&score), "Failed to serialize selection")
}

/// Tokens in the selected range, one per pitch class
#[wasm_bindgen(js_name = selectScoreTokens)]
pub fn select_score_tokens(score: JsValue, selection: JsValue) -> Result<JsValue, JsValue> {
    let score: ParsedScore = deserialize(score, "Invalid parsed score")?;
    let selection: ScoreSelection = deserialize(selection, "Invalid score selection")?;

    let tokens = select_tokens(&score, &selection);
    wasm_log!(
        "selectScoreTokens: m.{}/{} - m.{}/{} → {:?}",
        selection.from_measure,
        selection.from_beat,
        selection.to_measure,
        selection.to_beat,
        tokens
    );

    serialize(&tokens, "Failed to serialize tokens")
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectionAnalysis<'a> {
    notes: Vec<String>,
    pc_set: Option<&'a crate::models::ClassificationEntry>,
}

/// Select a range and classify it in one call
///
/// Returns `{ notes, pcSet }`; `pcSet` is null when the selection is empty.
#[wasm_bindgen(js_name = analyzeScoreSelection)]
pub fn analyze_score_selection(score: JsValue, selection: JsValue) -> Result<JsValue, JsValue> {
    let score: ParsedScore = deserialize(score, "Invalid parsed score")?;
    let selection: ScoreSelection = deserialize(selection, "Invalid score selection")?;

    let notes = select_tokens(&score, &selection);
    let pc_set = if notes.is_empty() {
        None
    } else {
        lookup_pcset_table(PcSetTable::standard(), &notes)
    };

    serialize(&SelectionAnalysis { notes, pc_set }, "Failed to serialize selection analysis")
}
