//! Parsing module for the Pitch Analyzer
//!
//! This module contains the ABC parsers: the free-text note token stream
//! used by the keyboard and text field, and the structural parser for full
//! ABC transcriptions.

pub mod tokens;
pub mod duration;
pub mod key_signature;
pub mod measure;
pub mod score;

// Re-export commonly used types
pub use tokens::*;
pub use duration::{default_tuplet_q, parse_duration_suffix, DurationSuffix};
pub use key_signature::{KeyAccidentals, Mode};
pub use measure::{parse_measure, parse_voice_content, MeasureContext, VoiceMeasures};
pub use score::{parse_score, scan_header, ScoreHeader, ScoreParseOptions};
