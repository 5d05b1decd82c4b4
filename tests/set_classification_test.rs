// Set classification against the bundled Forte catalog

use std::collections::BTreeSet;

use pitch_analyzer_wasm::analysis::prime_form;
use pitch_analyzer_wasm::converters::{interval_vector_of_notes, lookup_pcset_table, pcset_to_abc_notes};
use pitch_analyzer_wasm::models::pitch_class::pitch_class_of;
use pitch_analyzer_wasm::{IntervalVector, PcSetTable, PitchClass, PrimeForm};

fn forte_prime(notes: &[&str]) -> Option<String> {
    lookup_pcset_table(PcSetTable::standard(), notes).map(|e| e.forte_prime_form.key())
}

fn subset(mask: u16) -> Vec<PitchClass> {
    (0..12u8).filter(|i| mask & (1 << i) != 0).filter_map(PitchClass::new).collect()
}

fn with(pf: &PrimeForm, extra: u8) -> Vec<PitchClass> {
    let mut pcs = pf.pitch_classes().to_vec();
    pcs.extend(PitchClass::new(extra));
    pcs
}

#[test]
fn test_enharmonic_spellings_share_a_pitch_class() {
    assert_eq!(pitch_class_of("^C"), PitchClass::new(1));
    assert_eq!(pitch_class_of("_D"), PitchClass::new(1));
    assert_eq!(pitch_class_of("^B"), PitchClass::new(0));
    assert_eq!(pitch_class_of("__C"), PitchClass::new(10));
}

#[test]
fn test_reference_classifications() {
    assert_eq!(forte_prime(&["C", "E", "G"]).as_deref(), Some("037"));
    assert_eq!(forte_prime(&["^C", "E", "G"]), forte_prime(&["_D", "E", "G"]));
    assert_eq!(forte_prime(&["C", "^C"]).as_deref(), Some("01"));
    assert_eq!(forte_prime(&["A", "_G", "E"]).as_deref(), Some("025"));
}

#[test]
fn test_empty_input_is_the_empty_set() {
    let entry = lookup_pcset_table::<&str>(PcSetTable::standard(), &[]).expect("empty set entry");
    assert_eq!(entry.cardinality, 0);
    assert_eq!(entry.forte_prime_form.key(), "");
    assert_eq!(entry.forte_name, None);
}

#[test]
fn test_invalid_tokens_are_ignored() {
    assert_eq!(forte_prime(&["C", "z", "|", "^", "H", "E", "G"]).as_deref(), Some("037"));
}

#[test]
fn test_z_related_tetrachords() {
    let table = PcSetTable::standard();
    let z15 = table.lookup("0146").expect("4-Z15");
    let z29 = table.lookup("0137").expect("4-Z29");
    assert_eq!(z15.forte_name.as_deref(), Some("4-Z15"));
    assert_eq!(z15.z_mate.as_ref(), Some(&z29.forte_prime_form));
    assert_eq!(z29.z_mate.as_ref(), Some(&z15.forte_prime_form));
    assert_eq!(z15.interval_vector, z29.interval_vector);
    assert_eq!(z15.interval_vector.to_string(), "111111");
}

#[test]
fn test_forte_and_rahn_forms_can_differ() {
    let entry = PcSetTable::standard().lookup("01378").expect("5-20");
    assert_eq!(entry.forte_name.as_deref(), Some("5-20"));
    assert_eq!(entry.rahn_prime_form.key(), "01568");
}

#[test]
fn test_interval_vector_of_notes() {
    let table = PcSetTable::standard();
    assert_eq!(interval_vector_of_notes(table, &["C", "E", "G"]), "001110");
    assert_eq!(interval_vector_of_notes(table, &["C", "D", "E", "^F", "^G", "^A"]), "060603");
}

#[test]
fn test_decoded_prime_forms_classify_back() {
    assert_eq!(pcset_to_abc_notes("047"), vec!["C", "E", "G"]);
    assert_eq!(pcset_to_abc_notes("0123456789AB").len(), 12);

    for entry in PcSetTable::standard().iter() {
        let notes = pcset_to_abc_notes(&entry.forte_prime_form.key());
        assert_eq!(forte_prime(&notes), Some(entry.forte_prime_form.key()));
    }
}

#[test]
fn test_catalog_is_closed_over_all_subsets() {
    let table = PcSetTable::standard();
    for mask in 0..4096u16 {
        let pcs = subset(mask);
        let entry = table
            .classify(&pcs)
            .unwrap_or_else(|| panic!("no entry for subset {:03X}", mask));
        assert_eq!(entry.cardinality as u32, mask.count_ones());
    }
}

#[test]
fn test_catalog_size_per_cardinality() {
    let mut counts = [0usize; 13];
    for entry in PcSetTable::standard().iter() {
        counts[entry.cardinality as usize] += 1;
    }
    assert_eq!(counts, [1, 1, 6, 12, 29, 38, 50, 38, 29, 12, 6, 1, 1]);
}

#[test]
fn test_catalog_records_are_consistent() {
    let table = PcSetTable::standard();
    for entry in table.iter() {
        let pcs = entry.forte_prime_form.pitch_classes();
        assert_eq!(prime_form(pcs), entry.forte_prime_form);
        assert_eq!(prime_form(entry.rahn_prime_form.pitch_classes()), entry.forte_prime_form);
        assert_eq!(entry.interval_vector, IntervalVector::of(pcs));
        assert_eq!(entry.cardinality as usize, pcs.len());
    }
}

#[test]
fn test_z_relation_is_symmetric() {
    let table = PcSetTable::standard();
    for entry in table.iter() {
        if let Some(mate) = &entry.z_mate {
            let other = table.get(mate).expect("z-mate in catalog");
            assert_ne!(other.forte_prime_form, entry.forte_prime_form);
            assert_eq!(other.z_mate.as_ref(), Some(&entry.forte_prime_form));
            assert_eq!(other.interval_vector, entry.interval_vector);
            assert!(entry.forte_name.as_deref().is_some_and(|n| n.contains('Z')));
        }
    }
}

#[test]
fn test_super_and_subsets_are_one_step_neighbors() {
    let table = PcSetTable::standard();
    for entry in table.iter() {
        let pf = &entry.forte_prime_form;
        let values: Vec<u8> = pf.pitch_classes().iter().map(|pc| pc.value()).collect();

        let expected_supers: BTreeSet<PrimeForm> = (0..12u8)
            .filter(|p| !values.contains(p))
            .map(|p| prime_form(&with(pf, p)))
            .collect();
        let expected_subs: BTreeSet<PrimeForm> = (0..pf.len())
            .map(|skip| {
                let rest: Vec<PitchClass> = pf
                    .pitch_classes()
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip)
                    .map(|(_, pc)| *pc)
                    .collect();
                prime_form(&rest)
            })
            .collect();

        let supers: BTreeSet<PrimeForm> = entry.super_sets.iter().cloned().collect();
        let subs: BTreeSet<PrimeForm> = entry.sub_sets.iter().cloned().collect();
        assert_eq!(supers, expected_supers, "super sets of {}", pf);
        assert_eq!(subs, expected_subs, "sub sets of {}", pf);
    }
}
