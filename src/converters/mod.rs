//! Format converters
//!
//! Adapters between ABC note lists, pitch-class sets and parsed scores.

pub mod abc_to_pcset;
pub mod pcset_to_abc;
pub mod score_selection;

// Re-export for convenience
pub use abc_to_pcset::{interval_vector_of_notes, lookup_pcset_table};
pub use pcset_to_abc::{entry_to_abc_notes, pcset_to_abc_notes, record_to_abc_notes, sort_abc_notes_by_pitch};
pub use score_selection::{select_tokens, ScoreSelection};
