//! Prime-form reduction
//!
//! Reduces a pitch-class multiset to the canonical representative of its
//! transposition/inversion class:
//!
//! 1. collapse to sorted unique pitch classes
//! 2. build every rotation as offsets from its first element
//! 3. keep the rotations with the smallest span
//! 4. add the inversion of each survivor
//! 5. take the lexicographically smallest sequence
//!
//! Example: A, Gb, E → {4, 6, 9}
//!   rotations   [0, 2, 5] [0, 3, 10] [0, 7, 9]
//!   most compact [0, 2, 5], inverted [0, 3, 5]
//!   prime form  "025"

use crate::models::pc_set::PrimeForm;
use crate::models::pitch_class::PitchClass;

/// Sorted, duplicate-free semitone values
pub fn unique_sorted(pitch_classes: &[PitchClass]) -> Vec<u8> {
    let mut values: Vec<u8> = pitch_classes.iter().map(|pc| pc.value()).collect();
    values.sort_unstable();
    values.dedup();
    values
}

/// The rotation that follows `prev`, re-based so it starts at 0
///
/// The old first element moves to the end, shifted up an octave; its offset
/// is the span of the new rotation.
fn next_rotation(prev: &[u8]) -> Vec<u8> {
    let new_start = prev[1];
    let mut rotation: Vec<u8> = prev[1..].iter().map(|&x| x - new_start).collect();
    rotation.push(prev[0] + 12 - new_start);
    rotation
}

/// All `n` rotations of a sorted unique set, each starting at 0
///
/// The first rotation is normalized like the others; an un-normalized first
/// rotation inflates its span and picks the wrong candidate.
pub fn normal_orders(sorted: &[u8]) -> Vec<Vec<u8>> {
    let Some(&first) = sorted.first() else {
        return Vec::new();
    };

    let mut rotations = Vec::with_capacity(sorted.len());
    rotations.push(sorted.iter().map(|&x| x - first).collect::<Vec<u8>>());
    for i in 1..sorted.len() {
        let next = next_rotation(&rotations[i - 1]);
        rotations.push(next);
    }
    rotations
}

/// Inversion of a 0-based rotation: reverse, then mirror against its span
pub fn invert(rotation: &[u8]) -> Vec<u8> {
    let biggest = rotation.last().copied().unwrap_or(0);
    rotation.iter().rev().map(|&x| biggest - x).collect()
}

/// Most compact rotation(s): those whose span equals the minimum
fn compact_rotations(rotations: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
    let min_span = rotations.iter().filter_map(|r| r.last().copied()).min();
    rotations
        .into_iter()
        .filter(|r| r.last().copied() == min_span)
        .collect()
}

/// Reduce a multiset of pitch classes to its prime form
///
/// Order and duplicates in the input are irrelevant; the empty multiset
/// reduces to the empty prime form.
pub fn prime_form(pitch_classes: &[PitchClass]) -> PrimeForm {
    let sorted = unique_sorted(pitch_classes);
    if sorted.is_empty() {
        return PrimeForm::empty();
    }

    let compact = compact_rotations(normal_orders(&sorted));
    let inversions: Vec<Vec<u8>> = compact.iter().map(|r| invert(r)).collect();

    let best = compact
        .into_iter()
        .chain(inversions)
        .min()
        .unwrap_or_default();

    log::trace!("prime form of {:?} is {:?}", sorted, best);

    PrimeForm::new(best.into_iter().map(|v| PitchClass::from_semitones(v as i32)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pitch_class::pitch_class_of;

    fn key_of(notes: &[&str]) -> String {
        let pcs: Vec<PitchClass> = notes.iter().filter_map(|n| pitch_class_of(n)).collect();
        prime_form(&pcs).key()
    }

    #[test]
    fn test_rotations_are_normalized() {
        let rotations = normal_orders(&[4, 6, 9]);
        assert_eq!(rotations, vec![vec![0, 2, 5], vec![0, 3, 10], vec![0, 7, 9]]);
    }

    #[test]
    fn test_rotation_count_matches_cardinality() {
        assert_eq!(normal_orders(&[]).len(), 0);
        assert_eq!(normal_orders(&[7]), vec![vec![0]]);
        assert_eq!(normal_orders(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]).len(), 12);
    }

    #[test]
    fn test_invert() {
        assert_eq!(invert(&[0, 4, 7]), vec![0, 3, 7]);
        assert_eq!(invert(&[0]), vec![0]);
    }

    #[test]
    fn test_regression_first_rotation() {
        assert_eq!(key_of(&["A", "_G", "E"]), "025");
    }

    #[test]
    fn test_common_sets() {
        assert_eq!(key_of(&[]), "");
        assert_eq!(key_of(&["C", "E", "G"]), "037");
        assert_eq!(key_of(&["C", "_E", "G"]), "037");
        assert_eq!(key_of(&["C", "^C"]), "01");
        assert_eq!(key_of(&["G", "B", "D", "F"]), "0258");
        assert_eq!(key_of(&["C", "D", "E", "^F", "^G", "^A"]), "02468A");
    }

    #[test]
    fn test_duplicates_and_order_ignored() {
        assert_eq!(key_of(&["G", "E", "C", "c", "G,"]), key_of(&["C", "E", "G"]));
    }

    #[test]
    fn test_forte_packing_for_5_20() {
        // {0,1,5,6,8}: packed to the left; the right-packed form is 01568
        assert_eq!(key_of(&["C", "^C", "F", "^F", "^G"]), "01378");
    }

    #[test]
    fn test_aggregate() {
        let all = ["C", "^C", "D", "^D", "E", "F", "^F", "G", "^G", "A", "^A", "B"];
        assert_eq!(key_of(&all), "0123456789AB");
    }
}
