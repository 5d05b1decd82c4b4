//! Prime forms → ABC notes

use crate::models::pc_set::ClassificationEntry;
use crate::models::pitch_class::{pitch_class_of, PitchClass};

/// Decode a prime-form string ("047", "0123456789ab") to sharp-spelled ABC notes
///
/// Empty input, or any character that is not a pitch-class hex digit,
/// gives an empty list.
pub fn pcset_to_abc_notes(prime_form: &str) -> Vec<&'static str> {
    prime_form
        .chars()
        .map(|c| PitchClass::from_hex_digit(c).map(PitchClass::to_abc))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default()
}

/// Decode the `fortePrimeForm` of a classification record from the host
///
/// A bare prime-form string is decoded too. Anything else (`null`, a
/// record without a string prime form) gives an empty list.
pub fn record_to_abc_notes(record: &serde_json::Value) -> Vec<&'static str> {
    let prime_form = match record {
        serde_json::Value::String(s) => Some(s.as_str()),
        serde_json::Value::Object(fields) => fields.get("fortePrimeForm").and_then(|v| v.as_str()),
        _ => None,
    };
    prime_form.map(pcset_to_abc_notes).unwrap_or_default()
}

/// Notes of a classification entry's Forte prime form
pub fn entry_to_abc_notes(entry: &ClassificationEntry) -> Vec<&'static str> {
    entry
        .forte_prime_form
        .pitch_classes()
        .iter()
        .map(|pc| pc.to_abc())
        .collect()
}

/// Stable sort by pitch class; tokens without a note letter sort as C
pub fn sort_abc_notes_by_pitch<S: AsRef<str>>(notes: &[S]) -> Vec<String> {
    let mut sorted: Vec<String> = notes.iter().map(|n| n.as_ref().to_string()).collect();
    sorted.sort_by_key(|n| pitch_class_of(n).map(PitchClass::value).unwrap_or(0));
    sorted
}
