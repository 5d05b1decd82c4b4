//! Voice, measure and beat range selection over a parsed score
//!
//! Measures and beats are 1-based and inclusive, as shown to the user. A
//! token belongs to the range when its measure is inside it and, in the
//! first and last measure, its onset is not before the start beat or after
//! the end beat.

use serde::{Deserialize, Serialize};

use crate::models::score::ParsedScore;
use crate::parse::tokens::deduplicate_notes;

/// Beats shown for measures without a known meter
const FALLBACK_BEATS: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSelection {
    /// Selected voice ids; voices are always read in declaration order
    pub voices: Vec<String>,
    pub from_measure: usize,
    pub from_beat: u32,
    pub to_measure: usize,
    pub to_beat: u32,
}

fn beats_in(score: &ParsedScore, measure: usize) -> u32 {
    score
        .time_signature(measure)
        .map(|ts| ts.m_num)
        .unwrap_or(FALLBACK_BEATS)
        .max(1)
}

impl ScoreSelection {
    /// Every voice, from the first beat to the last beat of the last measure
    pub fn full(score: &ParsedScore) -> Self {
        let last = score.measure_count.max(1);
        ScoreSelection {
            voices: score.voices.iter().map(|v| v.id.clone()).collect(),
            from_measure: 1,
            from_beat: 1,
            to_measure: last,
            to_beat: beats_in(score, last),
        }
    }

    /// Keep the range inside the score and ordered
    ///
    /// Measures are limited to 1..=measure_count with the start never after
    /// the end; beats to 1..=numerator of their measure.
    pub fn clamp(&self, score: &ParsedScore) -> Self {
        let last = score.measure_count.max(1);
        let from_measure = self.from_measure.clamp(1, last);
        let to_measure = self.to_measure.clamp(from_measure, last);
        ScoreSelection {
            voices: self.voices.clone(),
            from_measure,
            from_beat: self.from_beat.clamp(1, beats_in(score, from_measure)),
            to_measure,
            to_beat: self.to_beat.clamp(1, beats_in(score, to_measure)),
        }
    }

    fn includes_voice(&self, id: &str) -> bool {
        self.voices.iter().any(|v| v == id)
    }
}

/// Tokens in the selected range, one per pitch class (last occurrence wins)
///
/// Measures outside the score are skipped; an inverted range selects nothing.
pub fn select_tokens(score: &ParsedScore, selection: &ScoreSelection) -> Vec<String> {
    if selection.to_measure == 0 {
        return Vec::new();
    }
    let first = selection.from_measure.saturating_sub(1);
    let last = selection.to_measure.saturating_sub(1);
    let from_beat = selection.from_beat as f64 - 1.0;
    let to_beat = selection.to_beat as f64 - 1.0;

    let mut raw: Vec<&str> = Vec::new();
    for voice in score.voices.iter().filter(|v| selection.includes_voice(&v.id)) {
        let measures = score.measures_of(&voice.id);
        let end = last.min(measures.len().saturating_sub(1));
        for m in first..=end {
            let Some(measure) = measures.get(m) else {
                continue;
            };
            for timed in measure {
                if m == first && timed.beat_start < from_beat {
                    continue;
                }
                if m == last && timed.beat_start > to_beat {
                    continue;
                }
                raw.push(&timed.token);
            }
        }
    }

    deduplicate_notes(&raw)
}
