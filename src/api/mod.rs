//! Pitch Analyzer WASM API
//!
//! This module provides the JavaScript-facing API of the analyzer. Values
//! cross the boundary as plain JS objects shaped like the serde models.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, validation and logging
//! - `analysis`: Note-set classification, piano input and the summary panel
//! - `score`: ABC score import and voice/measure/beat range selection
//! - `content`: Plugin content defaults, migration and validation
//! - `analysis_log`: The in-memory log of saved analyses

pub mod helpers;
pub mod analysis;
pub mod score;
pub mod content;
pub mod analysis_log;

pub use analysis::{
    active_pitch_classes_js, classify_abc_notes, filter_set_keys_js, interval_vector_of_notes_js,
    parse_abc_input_js, pc_set_summary_title, pcset_to_abc_notes_js, render_pc_set,
    sort_abc_notes_by_pitch_js, toggle_piano_key,
};
pub use score::{
    analyze_score_selection, clamp_score_selection, full_score_selection, parse_abc_score,
    select_score_tokens,
};
pub use content::{get_default_content, upgrade_content_js, validate_content_js};
pub use analysis_log::{
    delete_analysis, export_analysis_log, get_analysis_log, get_selected_analysis,
    import_analysis_log, move_analysis, save_analysis, select_analysis, update_analysis,
};
