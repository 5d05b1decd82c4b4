//! Key signatures from ABC `K:` fields
//!
//! The number of sharps (negative for flats) comes from the circle of fifths:
//! start from the major key of the tonic letter, add or remove seven for a
//! sharpened or flattened tonic, then shift by mode.
//!
//!   K:G     → 1 sharp   (F)
//!   K:Bb    → 2 flats   (B E)
//!   K:C#m   → 4 sharps  (F C G D)
//!   K:Dmix  → 1 sharp   (F)
//!   K:none  → nothing

use std::fmt;

use crate::models::pitch_class::{Accidental, NoteLetter};

const SHARP_ORDER: [NoteLetter; 7] = [
    NoteLetter::F,
    NoteLetter::C,
    NoteLetter::G,
    NoteLetter::D,
    NoteLetter::A,
    NoteLetter::E,
    NoteLetter::B,
];

const FLAT_ORDER: [NoteLetter; 7] = [
    NoteLetter::B,
    NoteLetter::E,
    NoteLetter::A,
    NoteLetter::D,
    NoteLetter::G,
    NoteLetter::C,
    NoteLetter::F,
];

/// Church modes, as offsets in fifths from the major key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Mode {
    /// Recognize a mode word by prefix ("m", "min", "minor", "aeo", "dor", ...)
    ///
    /// Unknown or empty words (including clef and other K: attributes) are
    /// major.
    pub fn from_abc(word: &str) -> Self {
        let word = word.to_ascii_lowercase();
        if word == "m" || word.starts_with("min") || word.starts_with("aeo") {
            Mode::Aeolian
        } else if word.starts_with("dor") {
            Mode::Dorian
        } else if word.starts_with("phr") {
            Mode::Phrygian
        } else if word.starts_with("lyd") {
            Mode::Lydian
        } else if word.starts_with("mix") {
            Mode::Mixolydian
        } else if word.starts_with("loc") {
            Mode::Locrian
        } else {
            Mode::Ionian
        }
    }

    pub fn fifths_offset(self) -> i32 {
        match self {
            Mode::Ionian => 0,
            Mode::Dorian => -2,
            Mode::Phrygian => -4,
            Mode::Lydian => 1,
            Mode::Mixolydian => -1,
            Mode::Aeolian => -3,
            Mode::Locrian => -5,
        }
    }
}

fn major_sharps(tonic: NoteLetter) -> i32 {
    match tonic {
        NoteLetter::C => 0,
        NoteLetter::D => 2,
        NoteLetter::E => 4,
        NoteLetter::F => -1,
        NoteLetter::G => 1,
        NoteLetter::A => 3,
        NoteLetter::B => 5,
    }
}

/// Accidental implied by the key signature for each letter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyAccidentals([Option<Accidental>; 7]);

impl KeyAccidentals {
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from a signed count: positive = sharps, negative = flats
    pub fn from_sharps(sharps: i32) -> Self {
        let mut map = [None; 7];
        let count = sharps.unsigned_abs().min(7) as usize;
        let (order, accidental) = if sharps > 0 {
            (&SHARP_ORDER, Accidental::Sharp)
        } else {
            (&FLAT_ORDER, Accidental::Flat)
        };
        for letter in &order[..count] {
            map[letter.index()] = Some(accidental);
        }
        KeyAccidentals(map)
    }

    /// Parse the value of a `K:` field; never fails
    pub fn parse(key: &str) -> Self {
        let key = key.trim();
        if key.is_empty() || key.eq_ignore_ascii_case("none") {
            return Self::none();
        }

        let mut chars = key.chars();
        let Some(tonic) = chars.next().and_then(NoteLetter::from_char) else {
            return Self::none();
        };

        let mut rest = chars.as_str();
        let mut sharps = major_sharps(tonic);
        if let Some(r) = rest.strip_prefix('#') {
            sharps += 7;
            rest = r;
        } else if let Some(r) = rest.strip_prefix('b') {
            sharps -= 7;
            rest = r;
        }

        let mode = rest.split_whitespace().next().map(Mode::from_abc).unwrap_or(Mode::Ionian);
        Self::from_sharps(sharps + mode.fifths_offset())
    }

    pub fn get(&self, letter: NoteLetter) -> Option<Accidental> {
        self.0[letter.index()]
    }

    /// Signed number of sharps (negative for flats)
    pub fn sharps(&self) -> i32 {
        let count = self.0.iter().filter(|a| a.is_some()).count() as i32;
        if self.0.contains(&Some(Accidental::Flat)) {
            -count
        } else {
            count
        }
    }
}

impl fmt::Display for KeyAccidentals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in NoteLetter::ALL {
            if let Some(acc) = self.get(letter) {
                write!(f, "{}{}", acc, letter.as_char())?;
            }
        }
        Ok(())
    }
}
