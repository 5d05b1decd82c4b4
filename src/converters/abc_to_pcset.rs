//! ABC notes → set classification

use crate::analysis::table::PcSetTable;
use crate::models::pc_set::ClassificationEntry;

/// Classify ABC note tokens
///
/// Tokens that are not notes are ignored, so an empty list or a list of
/// rests resolves to the cardinality-0 entry. `None` only when the table has
/// no entry for the reduced set.
pub fn lookup_pcset_table<'t, S: AsRef<str>>(table: &'t PcSetTable, notes: &[S]) -> Option<&'t ClassificationEntry> {
    table.classify_notes(notes)
}

/// Interval vector of the classified set, "000000" when the lookup misses
pub fn interval_vector_of_notes<S: AsRef<str>>(table: &PcSetTable, notes: &[S]) -> String {
    lookup_pcset_table(table, notes)
        .map(|entry| entry.interval_vector)
        .unwrap_or_default()
        .to_string()
}
