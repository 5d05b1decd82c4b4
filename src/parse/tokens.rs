//! ABC token stream parsing and normalization
//!
//! Free text typed by the user is cut into note, rest and bracket tokens.
//! Note tokens then go through the normalization pipeline:
//!
//!   accidental context → keep last of each pitch class → accidental context
//!
//! The accidental context models the visual convention of a single measure:
//! once a letter has been raised or lowered, a later plain letter needs an
//! explicit natural.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::models::pitch_class::{pitch_class_of, Accidental, NoteToken, PitchClass};

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"(?:\^{1,2}|_{1,2}|=)?[A-Ga-g][,']*|[zZ]|[\[\]|]").unwrap();
}

/// Cut raw text into tokens; anything unrecognized is skipped
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Rewrite naturals so that accidentals never leak past their cancellation
///
/// Per letter (case-insensitive):
/// - a sharp or flat marks the letter as altered
/// - a natural cancels the alteration; it is kept when it cancels something
///   and elided otherwise
/// - a plain letter while altered gets an explicit natural and cancels
pub fn apply_accidental_context<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let (_, out) = tokens.iter().fold(
        ([false; 7], Vec::with_capacity(tokens.len())),
        |(mut altered, mut out), token| {
            let token = token.as_ref();
            let Some(note) = NoteToken::parse(token) else {
                out.push(token.to_string());
                return (altered, out);
            };

            let slot = &mut altered[note.letter.index()];
            let rewritten = match note.accidental {
                Some(acc) if acc.is_alteration() => {
                    *slot = true;
                    token.to_string()
                }
                Some(_) => {
                    let was_altered = std::mem::replace(slot, false);
                    if was_altered {
                        token.to_string()
                    } else {
                        note.with_accidental(None).to_string()
                    }
                }
                None if *slot => {
                    *slot = false;
                    note.with_accidental(Some(Accidental::Natural)).to_string()
                }
                None => token.to_string(),
            };
            out.push(rewritten);
            (altered, out)
        },
    );
    out
}

/// Keep only the last occurrence of each pitch class
///
/// Tokens without a pitch class (rests, brackets) are always kept.
pub fn deduplicate_notes<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let mut seen = [false; 12];
    let mut kept: Vec<String> = tokens
        .iter()
        .rev()
        .filter(|token| match pitch_class_of(token.as_ref()) {
            Some(pc) => !std::mem::replace(&mut seen[pc.value() as usize], true),
            None => true,
        })
        .map(|token| token.as_ref().to_string())
        .collect();
    kept.reverse();
    kept
}

/// The full normalization pipeline; idempotent
pub fn normalize_notes<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    apply_accidental_context(&deduplicate_notes(&apply_accidental_context(tokens)))
}

/// Normalized notes from a text field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedInput {
    pub notes: Vec<String>,
    /// True when normalization changed the tokens the user typed, so the
    /// text field should be rewritten from `notes`
    pub transformed: bool,
}

pub fn parse_abc_input(text: &str) -> ParsedInput {
    let raw = tokenize(text);
    let notes = normalize_notes(&raw);
    let transformed = raw != notes;
    ParsedInput { notes, transformed }
}

/// Piano-key click: remove every token of `pc` if present, else append `note`
pub fn toggle_pitch_class<S: AsRef<str>>(notes: &[S], note: &str, pc: PitchClass) -> Vec<String> {
    let present = notes.iter().any(|n| pitch_class_of(n.as_ref()) == Some(pc));

    let next: Vec<&str> = if present {
        notes
            .iter()
            .map(|n| n.as_ref())
            .filter(|n| pitch_class_of(n) != Some(pc))
            .collect()
    } else {
        notes.iter().map(|n| n.as_ref()).chain(std::iter::once(note)).collect()
    };

    normalize_notes(&next)
}

/// Pitch classes present in a token list, ascending
pub fn active_pitch_classes<S: AsRef<str>>(notes: &[S]) -> Vec<PitchClass> {
    let mut pcs: Vec<PitchClass> = notes.iter().filter_map(|n| pitch_class_of(n.as_ref())).collect();
    pcs.sort_unstable();
    pcs.dedup();
    pcs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pc(v: u8) -> PitchClass {
        PitchClass::new(v).unwrap()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("C ^D __e, =f' z | [G]"), vec!["C", "^D", "__e,", "=f'", "z", "|", "[", "G", "]"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("123 xy !?").is_empty());
    }

    #[test]
    fn test_tokenize_drops_bare_accidentals() {
        assert_eq!(tokenize("^ _ = C"), vec!["C"]);
    }

    #[test]
    fn test_natural_after_alteration_is_kept() {
        assert_eq!(apply_accidental_context(&["^F", "=F"]), vec!["^F", "=F"]);
    }

    #[test]
    fn test_redundant_natural_is_elided() {
        assert_eq!(apply_accidental_context(&["=F", "=c'"]), vec!["F", "c'"]);
    }

    #[test]
    fn test_plain_letter_after_alteration_gets_natural() {
        assert_eq!(apply_accidental_context(&["_B", "b", "B"]), vec!["_B", "=b", "B"]);
    }

    #[test]
    fn test_double_accidentals_alter() {
        assert_eq!(apply_accidental_context(&["^^C", "C"]), vec!["^^C", "=C"]);
    }

    #[test]
    fn test_non_notes_pass_through() {
        assert_eq!(apply_accidental_context(&["z", "|", "^C", "]", "C"]), vec!["z", "|", "^C", "]", "=C"]);
    }

    #[test]
    fn test_deduplicate_keeps_last() {
        assert_eq!(deduplicate_notes(&["C", "E", "c", "z", "_D", "^C"]), vec!["E", "c", "z", "^C"]);
    }

    #[test]
    fn test_normalize_reapplies_context_after_dedup() {
        assert_eq!(normalize_notes(&["^F", "F"]), vec!["^F", "=F"]);
        // The sharp that justified the natural is dropped as a duplicate of _A
        assert_eq!(normalize_notes(&["^G", "=G", "_A"]), vec!["G", "_A"]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for text in ["^F F =F", "^G =G _A G", "C ^C _D D =D", "z | ^c C, =C ]", ""] {
            let once = normalize_notes(&tokenize(text));
            assert_eq!(normalize_notes(&once), once, "input: {}", text);
        }
    }

    #[test]
    fn test_parse_abc_input_flags_transformation() {
        let typed = parse_abc_input("C E G");
        assert_eq!(typed.notes, vec!["C", "E", "G"]);
        assert!(!typed.transformed);

        let rewritten = parse_abc_input("C E C");
        assert_eq!(rewritten.notes, vec!["E", "C"]);
        assert!(rewritten.transformed);
    }

    #[test]
    fn test_toggle_adds_and_removes() {
        let notes = toggle_pitch_class(&["C", "E"], "G", pc(7));
        assert_eq!(notes, vec!["C", "E", "G"]);

        let notes = toggle_pitch_class(&notes, "^D", pc(4));
        assert_eq!(notes, vec!["C", "G"]);

        let notes = toggle_pitch_class(&["^C", "D"], "_D", pc(1));
        assert_eq!(notes, vec!["D"]);
    }

    #[test]
    fn test_active_pitch_classes() {
        let active = active_pitch_classes(&["G", "c", "_D", "^C", "z"]);
        assert_eq!(active, vec![pc(0), pc(1), pc(7)]);
    }
}
