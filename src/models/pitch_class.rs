//! Pitch classes and ABC note tokens
//!
//! An ABC note token is `{accidental}{letter}{octave marks}`:
//!   "C"    → C natural (no accidental)
//!   "^F"   → F sharp
//!   "__B," → B double flat, one octave down
//!   "=e'"  → explicit E natural, two octaves up
//!
//! Octave marks and anything after them never change the pitch class.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An equivalence class of pitches under octave and enharmonic identity (C=0 … B=11)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PitchClass(u8);

/// Sharp-only spelling used when decoding pitch classes back to ABC
const PC_TO_ABC: [&str; 12] = ["C", "^C", "D", "^D", "E", "F", "^F", "G", "^G", "A", "^A", "B"];

impl PitchClass {
    /// Wrap any semitone count into 0–11 (negative values included)
    pub fn from_semitones(semitones: i32) -> Self {
        PitchClass(semitones.rem_euclid(12) as u8)
    }

    pub fn new(value: u8) -> Option<Self> {
        (value < 12).then_some(PitchClass(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Upper-case hex digit ('0'-'9', 'A', 'B')
    pub fn to_hex_digit(self) -> char {
        char::from_digit(self.0 as u32, 16)
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('0')
    }

    /// Parse a single hex digit, case-insensitive
    pub fn from_hex_digit(c: char) -> Option<Self> {
        c.to_digit(16).and_then(|d| PitchClass::new(d as u8))
    }

    /// ABC spelling using sharps exclusively
    pub fn to_abc(self) -> &'static str {
        PC_TO_ABC[self.0 as usize]
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ABC accidental prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    DoubleSharp,
    Sharp,
    Natural,
    Flat,
    DoubleFlat,
}

impl Accidental {
    /// Semitone offset applied to the letter's natural pitch
    pub fn offset(self) -> i32 {
        match self {
            Accidental::DoubleSharp => 2,
            Accidental::Sharp => 1,
            Accidental::Natural => 0,
            Accidental::Flat => -1,
            Accidental::DoubleFlat => -2,
        }
    }

    pub fn as_abc(self) -> &'static str {
        match self {
            Accidental::DoubleSharp => "^^",
            Accidental::Sharp => "^",
            Accidental::Natural => "=",
            Accidental::Flat => "_",
            Accidental::DoubleFlat => "__",
        }
    }

    /// True for sharps and flats (single or double), false for naturals
    pub fn is_alteration(self) -> bool {
        !matches!(self, Accidental::Natural)
    }

    /// Split one recognized accidental prefix off the front of a token
    ///
    /// Double accidentals are matched before single ones, so "^^C" is a
    /// double sharp and never a sharp followed by "^C".
    pub fn split_prefix(token: &str) -> (Option<Accidental>, &str) {
        const PREFIXES: [(&str, Accidental); 5] = [
            ("^^", Accidental::DoubleSharp),
            ("__", Accidental::DoubleFlat),
            ("^", Accidental::Sharp),
            ("_", Accidental::Flat),
            ("=", Accidental::Natural),
        ];

        PREFIXES
            .iter()
            .find_map(|(prefix, acc)| token.strip_prefix(prefix).map(|rest| (Some(*acc), rest)))
            .unwrap_or((None, token))
    }
}

impl fmt::Display for Accidental {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_abc())
    }
}

/// Note letter A–G
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteLetter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteLetter {
    pub const ALL: [NoteLetter; 7] = [
        NoteLetter::C,
        NoteLetter::D,
        NoteLetter::E,
        NoteLetter::F,
        NoteLetter::G,
        NoteLetter::A,
        NoteLetter::B,
    ];

    /// Case-insensitive letter lookup
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(NoteLetter::C),
            'D' => Some(NoteLetter::D),
            'E' => Some(NoteLetter::E),
            'F' => Some(NoteLetter::F),
            'G' => Some(NoteLetter::G),
            'A' => Some(NoteLetter::A),
            'B' => Some(NoteLetter::B),
            _ => None,
        }
    }

    /// Semitone of the natural note above C
    pub fn base_semitone(self) -> i32 {
        match self {
            NoteLetter::C => 0,
            NoteLetter::D => 2,
            NoteLetter::E => 4,
            NoteLetter::F => 5,
            NoteLetter::G => 7,
            NoteLetter::A => 9,
            NoteLetter::B => 11,
        }
    }

    /// Position in C D E F G A B order, for table indexing
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_char(self) -> char {
        match self {
            NoteLetter::C => 'C',
            NoteLetter::D => 'D',
            NoteLetter::E => 'E',
            NoteLetter::F => 'F',
            NoteLetter::G => 'G',
            NoteLetter::A => 'A',
            NoteLetter::B => 'B',
        }
    }
}

/// A parsed ABC note token
///
/// The written case of the letter (octave register) and any trailing text
/// (octave marks, durations) are kept so the token can be re-emitted
/// unchanged apart from its accidental.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteToken {
    pub accidental: Option<Accidental>,
    pub letter: NoteLetter,
    /// The letter exactly as written ('c' and 'C' are different octaves)
    pub written_letter: char,
    /// Everything after the letter, usually octave marks
    pub suffix: String,
}

impl NoteToken {
    /// Parse a token; `None` when no letter follows the accidental prefix
    pub fn parse(token: &str) -> Option<Self> {
        let (accidental, rest) = Accidental::split_prefix(token);
        let mut chars = rest.chars();
        let written_letter = chars.next()?;
        let letter = NoteLetter::from_char(written_letter)?;

        Some(NoteToken {
            accidental,
            letter,
            written_letter,
            suffix: chars.as_str().to_string(),
        })
    }

    pub fn pitch_class(&self) -> PitchClass {
        let offset = self.accidental.map(Accidental::offset).unwrap_or(0);
        PitchClass::from_semitones(self.letter.base_semitone() + offset)
    }

    /// Same note with a different accidental prefix
    pub fn with_accidental(&self, accidental: Option<Accidental>) -> Self {
        NoteToken {
            accidental,
            ..self.clone()
        }
    }
}

impl fmt::Display for NoteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(acc) = self.accidental {
            f.write_str(acc.as_abc())?;
        }
        write!(f, "{}{}", self.written_letter, self.suffix)
    }
}

impl FromStr for NoteToken {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteToken::parse(s).ok_or_else(|| format!("Invalid ABC note token: '{}'", s))
    }
}

/// Pitch class of an ABC note token, or `None` for anything that is not a note
///
/// Never fails loudly: rests, bar lines, empty strings and bare accidentals
/// all resolve to `None` and are skipped by callers.
pub fn pitch_class_of(token: &str) -> Option<PitchClass> {
    NoteToken::parse(token).map(|note| note.pitch_class())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naturals() {
        assert_eq!(pitch_class_of("C").map(PitchClass::value), Some(0));
        assert_eq!(pitch_class_of("D").map(PitchClass::value), Some(2));
        assert_eq!(pitch_class_of("E").map(PitchClass::value), Some(4));
        assert_eq!(pitch_class_of("F").map(PitchClass::value), Some(5));
        assert_eq!(pitch_class_of("G").map(PitchClass::value), Some(7));
        assert_eq!(pitch_class_of("A").map(PitchClass::value), Some(9));
        assert_eq!(pitch_class_of("B").map(PitchClass::value), Some(11));
    }

    #[test]
    fn test_enharmonic_identity() {
        assert_eq!(pitch_class_of("^C"), pitch_class_of("_D"));
        assert_eq!(pitch_class_of("^C").map(PitchClass::value), Some(1));
        assert_eq!(pitch_class_of("^^C"), pitch_class_of("D"));
        assert_eq!(pitch_class_of("__D"), pitch_class_of("C"));
    }

    #[test]
    fn test_wraps_below_zero_and_above_eleven() {
        assert_eq!(pitch_class_of("_C").map(PitchClass::value), Some(11));
        assert_eq!(pitch_class_of("__C").map(PitchClass::value), Some(10));
        assert_eq!(pitch_class_of("^B").map(PitchClass::value), Some(0));
        assert_eq!(pitch_class_of("^^B").map(PitchClass::value), Some(1));
    }

    #[test]
    fn test_case_and_octave_marks_ignored() {
        assert_eq!(pitch_class_of("c"), pitch_class_of("C"));
        assert_eq!(pitch_class_of("C,,"), pitch_class_of("C"));
        assert_eq!(pitch_class_of("=e'"), pitch_class_of("E"));
        assert_eq!(pitch_class_of("_b2"), pitch_class_of("_B"));
    }

    #[test]
    fn test_invalid_tokens() {
        assert_eq!(pitch_class_of(""), None);
        assert_eq!(pitch_class_of("^"), None);
        assert_eq!(pitch_class_of("__"), None);
        assert_eq!(pitch_class_of("X"), None);
        assert_eq!(pitch_class_of("z"), None);
        assert_eq!(pitch_class_of("["), None);
        assert_eq!(pitch_class_of("|"), None);
    }

    #[test]
    fn test_hex_digits() {
        assert_eq!(PitchClass::from_semitones(10).to_hex_digit(), 'A');
        assert_eq!(PitchClass::from_semitones(11).to_hex_digit(), 'B');
        assert_eq!(PitchClass::from_hex_digit('b').map(PitchClass::value), Some(11));
        assert_eq!(PitchClass::from_hex_digit('C'), None);
        assert_eq!(PitchClass::from_hex_digit('x'), None);
    }

    #[test]
    fn test_note_token_display_roundtrip() {
        for text in ["C", "^f", "__B,", "=e'", "^^G,,"] {
            let note: NoteToken = text.parse().unwrap();
            assert_eq!(note.to_string(), text);
        }
    }

    #[test]
    fn test_with_accidental_keeps_register() {
        let note = NoteToken::parse("c'").unwrap();
        assert_eq!(note.with_accidental(Some(Accidental::Natural)).to_string(), "=c'");
    }
}
