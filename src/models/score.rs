//! Parsed score structure
//!
//! Produced once per imported ABC transcription and consumed read-only by
//! the voice/measure/beat range selection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::serde_helpers::serialize_beat;

/// A voice declared in the score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub id: String,
    /// Display label: "Name (V:id)" when the voice has an nm="..." attribute, else "V:id"
    pub label: String,
}

impl Voice {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let label = format!("V:{}", id);
        Self { id, label }
    }

    pub fn named(id: impl Into<String>, name: &str) -> Self {
        let id = id.into();
        let label = format!("{} (V:{})", name, id);
        Self { id, label }
    }
}

/// Time signature of one measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    #[serde(rename = "mNum")]
    pub m_num: u32,
    #[serde(rename = "mDen")]
    pub m_den: u32,
}

impl TimeSignature {
    pub fn new(m_num: u32, m_den: u32) -> Self {
        Self { m_num, m_den }
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

/// A note token with its onset inside the measure
///
/// `beat_start` counts in units of the time signature's denominator,
/// starting at 0 for the first beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedToken {
    pub token: String,
    #[serde(serialize_with = "serialize_beat")]
    pub beat_start: f64,
}

impl TimedToken {
    pub fn new(token: impl Into<String>, beat_start: f64) -> Self {
        Self {
            token: token.into(),
            beat_start,
        }
    }
}

/// The tokens of one measure, in written order
pub type Measure = Vec<TimedToken>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedScore {
    pub voices: Vec<Voice>,
    pub measure_count: usize,
    /// Time signature per measure (index 0 = measure 1)
    pub measures: Vec<TimeSignature>,
    /// Every voice has exactly `measure_count` measures (padded with empty ones)
    pub voice_measures: BTreeMap<String, Vec<Measure>>,
}

impl ParsedScore {
    pub fn voice(&self, id: &str) -> Option<&Voice> {
        self.voices.iter().find(|v| v.id == id)
    }

    /// Measures of a voice; empty for unknown voices
    pub fn measures_of(&self, voice_id: &str) -> &[Measure] {
        self.voice_measures
            .get(voice_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Time signature of a 1-based measure number
    pub fn time_signature(&self, measure: usize) -> Option<TimeSignature> {
        measure
            .checked_sub(1)
            .and_then(|idx| self.measures.get(idx))
            .copied()
    }
}
