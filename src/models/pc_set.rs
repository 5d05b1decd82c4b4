//! Pitch-class set catalog records
//!
//! A prime form is both the canonical representative of a set class and the
//! key of the classification table: its pitch classes written as upper-case
//! hex digits, concatenated ("037", "0123456789AB", "" for the empty set).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::models::pitch_class::PitchClass;
use crate::models::serde_helpers::serialize_option_as_null;

/// Ordered pitch-class offsets from 0
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimeForm(Vec<PitchClass>);

impl PrimeForm {
    pub fn new(pitch_classes: Vec<PitchClass>) -> Self {
        PrimeForm(pitch_classes)
    }

    pub fn empty() -> Self {
        PrimeForm(Vec::new())
    }

    pub fn pitch_classes(&self) -> &[PitchClass] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Table key: upper-case hex digits, concatenated
    pub fn key(&self) -> String {
        self.0.iter().map(|pc| pc.to_hex_digit()).collect()
    }
}

impl fmt::Display for PrimeForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for PrimeForm {
    type Err = String;

    /// Accepts lower- or upper-case hex digits
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| {
                PitchClass::from_hex_digit(c)
                    .ok_or_else(|| format!("Invalid prime form digit '{}' in '{}'", c, s))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(PrimeForm)
    }
}

impl Serialize for PrimeForm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for PrimeForm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Counts of interval classes 1 through 6
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IntervalVector(pub [u8; 6]);

impl IntervalVector {
    /// Count every unordered pair of distinct pitch classes by interval class
    pub fn of(pitch_classes: &[PitchClass]) -> Self {
        let mut unique: Vec<u8> = pitch_classes.iter().map(|pc| pc.value()).collect();
        unique.sort_unstable();
        unique.dedup();

        let mut counts = [0u8; 6];
        for (i, &low) in unique.iter().enumerate() {
            for &high in &unique[i + 1..] {
                let diff = high - low;
                let class = diff.min(12 - diff);
                counts[class as usize - 1] += 1;
            }
        }
        IntervalVector(counts)
    }

    pub fn counts(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for IntervalVector {
    /// One hex digit per interval class, so the aggregate reads "CCCCC6"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for count in self.0 {
            let digit = char::from_digit(count as u32, 16).unwrap_or('?');
            write!(f, "{}", digit.to_ascii_uppercase())?;
        }
        Ok(())
    }
}

impl FromStr for IntervalVector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: Vec<u8> = s
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(|| format!("Invalid interval vector '{}'", s))?;
        let counts: [u8; 6] = digits
            .try_into()
            .map_err(|_| format!("Interval vector '{}' must have 6 digits", s))?;
        Ok(IntervalVector(counts))
    }
}

impl Serialize for IntervalVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for IntervalVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Immutable catalog record for one set class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationEntry {
    /// Forte name such as "3-11" or "6-Z29"; the empty set has none
    #[serde(serialize_with = "serialize_option_as_null")]
    pub forte_name: Option<String>,
    pub cardinality: u8,
    pub forte_prime_form: PrimeForm,
    pub rahn_prime_form: PrimeForm,
    pub interval_vector: IntervalVector,
    /// Prime form of the Z-related set class, if any
    #[serde(serialize_with = "serialize_option_as_null")]
    pub z_mate: Option<PrimeForm>,
    /// Set classes one element larger that contain this one
    pub super_sets: Vec<PrimeForm>,
    /// Set classes one element smaller contained in this one
    pub sub_sets: Vec<PrimeForm>,
}

impl ClassificationEntry {
    pub fn key(&self) -> String {
        self.forte_prime_form.key()
    }

    pub fn is_z_related(&self) -> bool {
        self.z_mate.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcs(values: &[u8]) -> Vec<PitchClass> {
        values.iter().filter_map(|&v| PitchClass::new(v)).collect()
    }

    #[test]
    fn test_prime_form_key() {
        assert_eq!(PrimeForm::new(pcs(&[0, 3, 7])).key(), "037");
        assert_eq!(PrimeForm::new(pcs(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11])).key(), "0123456789AB");
        assert_eq!(PrimeForm::empty().key(), "");
    }

    #[test]
    fn test_prime_form_parse_accepts_lowercase() {
        let upper: PrimeForm = "02468A".parse().unwrap();
        let lower: PrimeForm = "02468a".parse().unwrap();
        assert_eq!(upper, lower);
        assert!("01X".parse::<PrimeForm>().is_err());
        assert!("".parse::<PrimeForm>().unwrap().is_empty());
    }

    #[test]
    fn test_interval_vector_major_triad() {
        assert_eq!(IntervalVector::of(&pcs(&[0, 4, 7])).to_string(), "001110");
    }

    #[test]
    fn test_interval_vector_ignores_duplicates() {
        assert_eq!(IntervalVector::of(&pcs(&[0, 0, 4, 7, 7])).to_string(), "001110");
    }

    #[test]
    fn test_interval_vector_aggregate_uses_hex() {
        let all: Vec<u8> = (0..12).collect();
        assert_eq!(IntervalVector::of(&pcs(&all)).to_string(), "CCCCC6");
    }

    #[test]
    fn test_interval_vector_parse() {
        let v: IntervalVector = "224232".parse().unwrap();
        assert_eq!(v.counts(), [2, 2, 4, 2, 3, 2]);
        assert!("12345".parse::<IntervalVector>().is_err());
        assert!("12345G".parse::<IntervalVector>().is_err());
    }

    #[test]
    fn test_entry_serializes_camel_case_with_nulls() {
        let entry = ClassificationEntry {
            forte_name: None,
            cardinality: 0,
            forte_prime_form: PrimeForm::empty(),
            rahn_prime_form: PrimeForm::empty(),
            interval_vector: IntervalVector::default(),
            z_mate: None,
            super_sets: vec!["0".parse().unwrap()],
            sub_sets: vec![],
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["fortePrimeForm"], "");
        assert_eq!(json["intervalVector"], "000000");
        assert!(json["forteName"].is_null());
        assert!(json["zMate"].is_null());
        assert_eq!(json["superSets"][0], "0");
    }
}
