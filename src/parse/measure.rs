//! Measure tokenization for ABC voice content
//!
//! One measure string becomes a list of note tokens with beat positions.
//! Positions count in units of the meter denominator from 0, so in 3/4 the
//! three quarter beats start at 0, 1 and 2.
//!
//! Recognized, left to right:
//! - whitespace, stray `|` and `:` (skipped)
//! - tuplets `(p`, `(p:q`, `(p:q:r`
//! - chords `[CEG]2` (one beat position for every note)
//! - rests `z`, `Z`, `x` (advance the beat, no token)
//! - notes `^c'/2`
//!
//! Inline fields `[X:...]`, decorations `!...!` `+...+`, grace notes `{...}`
//! and annotations `"..."` are removed first. Anything else is skipped.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::pitch_class::{Accidental, NoteLetter};
use crate::models::score::{Measure, TimeSignature, TimedToken};
use crate::parse::duration::{default_tuplet_q, parse_digits, parse_duration_suffix};
use crate::parse::key_signature::KeyAccidentals;

lazy_static! {
    static ref INLINE_FIELD_RE: Regex = Regex::new(r"\[[A-Z]:[^\]]*\]").unwrap();
    static ref DECORATION_RE: Regex = Regex::new(r"![^!]*!").unwrap();
    static ref PLUS_DECORATION_RE: Regex = Regex::new(r"\+[^+]*\+").unwrap();
    static ref GRACE_RE: Regex = Regex::new(r"\{[^}]*\}").unwrap();
    static ref ANNOTATION_RE: Regex = Regex::new(r#""[^"]*""#).unwrap();
    static ref TUPLET_RE: Regex = Regex::new(r"^(\d+)(?::(\d+)(?::(\d+))?)?").unwrap();
    static ref CHORD_RE: Regex = Regex::new(r"^\[([A-Ga-g_^=,'\d\s]+)\](\d*/*\d*)").unwrap();
    static ref CHORD_NOTE_RE: Regex = Regex::new(r"([_^=]*)([A-Ga-g])[,']*").unwrap();
    static ref NOTE_RE: Regex = Regex::new(r"^([_^=]*)([A-Ga-g])([,']*)(\d*/*\d*)").unwrap();
    static ref SUFFIX_RE: Regex = Regex::new(r"^\d*/*\d*").unwrap();
    static ref BAR_RE: Regex = Regex::new(r"\|[\]|:]?|:\|").unwrap();
    static ref INLINE_METER_RE: Regex = Regex::new(r"\[M:(\d+)/(\d+)\]").unwrap();
}

/// Everything a measure needs from the score header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureContext {
    /// Default note length `L:` as num/den
    pub unit_num: u64,
    pub unit_den: u64,
    /// Meter denominator of the measure being parsed
    pub meter_den: u32,
    pub key: KeyAccidentals,
    /// Resolve plain letters through the key signature and earlier
    /// accidentals in the measure; when false, tokens keep only their
    /// written accidental
    pub apply_key_signature: bool,
}

impl MeasureContext {
    /// Meter-denominator units per default note length
    pub fn beat_factor(&self) -> f64 {
        self.unit_num as f64 * self.meter_den as f64 / self.unit_den as f64
    }

    fn with_meter_den(self, meter_den: u32) -> Self {
        Self { meter_den, ..self }
    }
}

/// Written accidental prefix; runs like "^_" are not a valid accidental
fn explicit_accidental(prefix: &str) -> Option<Accidental> {
    match Accidental::split_prefix(prefix) {
        (Some(acc), "") => Some(acc),
        _ => None,
    }
}

/// Remaining notes of the current tuplet and their duration multiplier
#[derive(Debug, Default)]
struct Tuplet {
    multiplier: f64,
    remaining: u64,
}

impl Tuplet {
    /// Multiplier for the next note or rest, consuming one tuplet slot
    fn next_multiplier(&mut self) -> f64 {
        if self.remaining == 0 {
            return 1.0;
        }
        self.remaining -= 1;
        self.multiplier
    }
}

struct MeasureScanner<'a> {
    ctx: &'a MeasureContext,
    beat: f64,
    tuplet: Tuplet,
    /// Accidental in force for each letter after an explicit one in this measure
    carried: [Option<Option<Accidental>>; 7],
    tokens: Measure,
}

impl<'a> MeasureScanner<'a> {
    fn new(ctx: &'a MeasureContext) -> Self {
        Self {
            ctx,
            beat: 0.0,
            tuplet: Tuplet::default(),
            carried: [None; 7],
            tokens: Vec::new(),
        }
    }

    fn advance(&mut self, suffix: &str) {
        let multiplier = self.tuplet.next_multiplier();
        self.beat += parse_duration_suffix(suffix).as_f64() * self.ctx.beat_factor() * multiplier;
    }

    fn resolve(&mut self, prefix: &str, letter: NoteLetter) -> Option<Accidental> {
        let written = explicit_accidental(prefix);
        if !self.ctx.apply_key_signature {
            return written;
        }

        let slot = &mut self.carried[letter.index()];
        if !prefix.is_empty() {
            let resolved = written.filter(|acc| acc.is_alteration());
            *slot = Some(resolved);
            resolved
        } else if let Some(carried) = *slot {
            carried
        } else {
            self.ctx.key.get(letter)
        }
    }

    fn push_note(&mut self, prefix: &str, written_letter: &str, beat: f64) {
        let Some(letter) = written_letter.chars().next().and_then(NoteLetter::from_char) else {
            return;
        };
        let accidental = self.resolve(prefix, letter);
        let token = match accidental {
            Some(acc) => format!("{}{}", acc.as_abc(), written_letter),
            None => written_letter.to_string(),
        };
        self.tokens.push(TimedToken::new(token, beat));
    }

    /// Handle the text at the cursor; returns the number of bytes consumed
    fn step(&mut self, rest: &str) -> usize {
        let Some(c) = rest.chars().next() else {
            return 0;
        };

        match c {
            c if c.is_whitespace() || c == '|' || c == ':' => c.len_utf8(),
            '(' => {
                let Some(caps) = TUPLET_RE.captures(&rest[1..]) else {
                    return 1;
                };
                let p = parse_digits(&caps[1]).unwrap_or(0);
                if p > 0 {
                    let q = caps.get(2).and_then(|m| parse_digits(m.as_str())).unwrap_or_else(|| default_tuplet_q(p));
                    let r = caps.get(3).and_then(|m| parse_digits(m.as_str())).unwrap_or(p);
                    self.tuplet = Tuplet {
                        multiplier: q as f64 / p as f64,
                        remaining: r,
                    };
                }
                1 + caps[0].len()
            }
            '[' => {
                let Some(caps) = CHORD_RE.captures(rest) else {
                    return 1;
                };
                let beat = self.beat;
                for note in CHORD_NOTE_RE.captures_iter(&caps[1]) {
                    self.push_note(&note[1], &note[2], beat);
                }
                self.advance(&caps[2]);
                caps[0].len()
            }
            'z' | 'Z' | 'x' => {
                let suffix = SUFFIX_RE.find(&rest[1..]).map(|m| m.as_str()).unwrap_or("");
                self.advance(suffix);
                1 + suffix.len()
            }
            _ => {
                let Some(caps) = NOTE_RE.captures(rest) else {
                    return c.len_utf8();
                };
                let beat = self.beat;
                self.push_note(&caps[1], &caps[2], beat);
                self.advance(&caps[4]);
                caps[0].len()
            }
        }
    }
}

/// Remove inline fields, decorations, grace notes and annotations
fn strip_non_notes(measure: &str) -> String {
    let s = INLINE_FIELD_RE.replace_all(measure, " ");
    let s = DECORATION_RE.replace_all(&s, "");
    let s = PLUS_DECORATION_RE.replace_all(&s, "");
    let s = GRACE_RE.replace_all(&s, "");
    ANNOTATION_RE.replace_all(&s, "").into_owned()
}

/// Tokenize one measure
pub fn parse_measure(measure: &str, ctx: &MeasureContext) -> Measure {
    let s = strip_non_notes(measure);
    let mut scanner = MeasureScanner::new(ctx);

    let mut i = 0;
    while i < s.len() {
        i += scanner.step(&s[i..]).max(1);
        while !s.is_char_boundary(i) {
            i += 1;
        }
    }

    scanner.tokens
}

/// One voice cut into measures, with the meter in force for each
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoiceMeasures {
    pub measures: Vec<Measure>,
    pub meters: Vec<TimeSignature>,
}

/// Meter from an inline `[M:n/d]` field; zero or oversized denominators are ignored
fn inline_meter(segment: &str) -> Option<TimeSignature> {
    let caps = INLINE_METER_RE.captures(segment)?;
    let num = parse_digits(&caps[1]).and_then(|n| u32::try_from(n).ok())?;
    let den = parse_digits(&caps[2]).and_then(|d| u32::try_from(d).ok())?;
    (den > 0).then(|| TimeSignature::new(num, den))
}

/// Split a voice's content on bar lines and tokenize each measure
///
/// Empty segments (from `||`, a leading bar line, ...) are not measures. An
/// inline meter change applies to its own measure and every later one.
pub fn parse_voice_content(content: &str, meter: TimeSignature, ctx: &MeasureContext) -> VoiceMeasures {
    let mut current = meter;
    let mut voice = VoiceMeasures::default();

    for segment in BAR_RE.split(content).map(str::trim).filter(|s| !s.is_empty()) {
        if let Some(changed) = inline_meter(segment) {
            current = changed;
        }
        voice.meters.push(current);
        voice
            .measures
            .push(parse_measure(segment, &ctx.with_meter_den(current.m_den)));
    }

    voice
}
