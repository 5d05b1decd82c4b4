//! Structural parser for ABC transcriptions of MusicXML scores
//!
//! Expects the layout written by MusicXML→ABC converters:
//!
//! ```text
//! X:1
//! L:1/8
//! M:3/4
//! K:Bb
//! V:1 nm="Flute"
//! V:2 nm="Cello"
//! V:1
//! B2 c2 d2 | ...
//! [V:2] B,,6 | ...
//! ```
//!
//! Header fields up to `K:` set the default note length, meter and key.
//! Voices are introduced inline (`[V:id] music`) or by a `V:id` line that
//! applies to the lines below it. The parser is total: unknown lines and
//! characters are skipped, and the result always has at least one voice and
//! one measure.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::models::score::{Measure, ParsedScore, TimeSignature, Voice};
use crate::parse::duration::parse_digits;
use crate::parse::key_signature::KeyAccidentals;
use crate::parse::measure::{parse_voice_content, MeasureContext};

lazy_static! {
    static ref UNIT_LENGTH_RE: Regex = Regex::new(r"^L:\s*(\d+)/(\d+)").unwrap();
    static ref METER_RE: Regex = Regex::new(r"^M:\s*(\d+)/(\d+)").unwrap();
    static ref HEADER_FIELD_RE: Regex = Regex::new(r"^[A-Z]:").unwrap();
    static ref INLINE_VOICE_RE: Regex = Regex::new(r"^\[V:(\S+?)\](.*)").unwrap();
    static ref VOICE_LINE_RE: Regex = Regex::new(r"^V:(\S+)").unwrap();
    static ref VOICE_NAME_RE: Regex = Regex::new(r#"nm="([^"]+)""#).unwrap();
}

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreParseOptions {
    /// Resolve plain letters through the key signature and in-measure
    /// accidentals. When false, tokens carry only the accidental written on
    /// the note itself.
    pub apply_key_signature: bool,
}

impl Default for ScoreParseOptions {
    fn default() -> Self {
        Self {
            apply_key_signature: true,
        }
    }
}

/// Values from the header, with ABC defaults for missing fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreHeader {
    pub unit_num: u64,
    pub unit_den: u64,
    pub meter: TimeSignature,
    pub key: String,
}

impl Default for ScoreHeader {
    fn default() -> Self {
        Self {
            unit_num: 1,
            unit_den: 8,
            meter: TimeSignature::default(),
            key: "C".to_string(),
        }
    }
}

/// `n/d` from a header line; `None` for zero denominators or numbers that overflow
fn fraction(re: &Regex, line: &str) -> Option<(u64, u64)> {
    let caps = re.captures(line)?;
    let num = parse_digits(&caps[1])?;
    let den = parse_digits(&caps[2])?;
    (den > 0).then_some((num, den))
}

fn strip_comment(line: &str) -> &str {
    match line.find('%') {
        Some(idx) => line[..idx].trim(),
        None => line.trim(),
    }
}

/// Read header fields up to `K:` and collect the body lines after it
///
/// Without a `K:` line every line that does not look like a header field is
/// body.
pub fn scan_header(text: &str) -> (ScoreHeader, Vec<&str>) {
    let mut header = ScoreHeader::default();
    let mut body = Vec::new();
    let mut header_done = false;

    for raw in text.lines() {
        let line = raw.trim();
        if header_done {
            let stripped = strip_comment(line);
            if !stripped.is_empty() && !stripped.starts_with("w:") {
                body.push(stripped);
            }
        } else if let Some((num, den)) = fraction(&UNIT_LENGTH_RE, line) {
            header.unit_num = num;
            header.unit_den = den;
        } else if METER_RE.is_match(line) {
            let meter = fraction(&METER_RE, line)
                .and_then(|(n, d)| Some(TimeSignature::new(u32::try_from(n).ok()?, u32::try_from(d).ok()?)));
            if let Some(meter) = meter {
                header.meter = meter;
            }
        } else if let Some(key) = line.strip_prefix("K:") {
            header.key = key.trim().to_string();
            header_done = true;
        }
    }

    if !header_done {
        log::debug!("ABC score has no K: field; reading all non-header lines as music");
        body = text
            .lines()
            .map(strip_comment)
            .filter(|line| !line.is_empty() && !HEADER_FIELD_RE.is_match(line))
            .collect();
    }

    (header, body)
}

/// Voices in declaration order and the music lines of each
#[derive(Debug, Default)]
struct VoiceSections {
    voices: Vec<Voice>,
    lines: HashMap<String, Vec<String>>,
    current: Option<String>,
}

impl VoiceSections {
    fn declare(&mut self, voice: Voice) -> String {
        let id = voice.id.clone();
        self.lines.entry(id.clone()).or_default();
        if !self.voices.iter().any(|v| v.id == id) {
            self.voices.push(voice);
        }
        id
    }

    fn push_line(&mut self, line: &str) {
        let id = match &self.current {
            Some(id) => id.clone(),
            None => {
                let fallback = self.voices.first().map(|v| v.id.clone()).unwrap_or_else(|| "1".to_string());
                let id = self.declare(Voice::new(fallback));
                self.current = Some(id.clone());
                id
            }
        };
        self.lines.entry(id).or_default().push(line.to_string());
    }

    fn read(&mut self, line: &str) {
        if let Some(caps) = INLINE_VOICE_RE.captures(line) {
            let id = self.declare(Voice::new(&caps[1]));
            self.current = Some(id);
            let rest = caps[2].trim();
            if !rest.is_empty() {
                self.push_line(rest);
            }
        } else if let Some(caps) = VOICE_LINE_RE.captures(line) {
            let id = caps[1].to_string();
            let voice = match VOICE_NAME_RE.captures(line) {
                Some(name) => Voice::named(id, &name[1]),
                None => Voice::new(id),
            };
            let id = self.declare(voice);
            self.current = Some(id);
        } else {
            self.push_line(line);
        }
    }

    fn content(&self, id: &str) -> String {
        self.lines.get(id).map(|lines| lines.join(" ")).unwrap_or_default()
    }
}

/// Parse a full ABC transcription; never fails
pub fn parse_score(text: &str, options: ScoreParseOptions) -> ParsedScore {
    let (header, body) = scan_header(text);
    let key = KeyAccidentals::parse(&header.key);

    let mut sections = VoiceSections::default();
    for line in body {
        sections.read(line);
    }
    if sections.voices.is_empty() {
        sections.declare(Voice::new("1"));
    }

    let ctx = MeasureContext {
        unit_num: header.unit_num,
        unit_den: header.unit_den,
        meter_den: header.meter.m_den,
        key,
        apply_key_signature: options.apply_key_signature,
    };

    let parsed: Vec<_> = sections
        .voices
        .iter()
        .map(|voice| parse_voice_content(&sections.content(&voice.id), header.meter, &ctx))
        .collect();

    // First voice with the most measures defines the meter of each measure
    let reference = parsed
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, usize)>, (idx, voice)| match best {
            Some((_, count)) if voice.measures.len() <= count => best,
            _ => Some((idx, voice.measures.len())),
        });
    let max_count = reference.map(|(_, count)| count).unwrap_or(0);
    let measure_count = max_count.max(1);

    let mut measures: Vec<TimeSignature> = reference
        .map(|(idx, _)| parsed[idx].meters.clone())
        .unwrap_or_default();
    measures.resize(measure_count, header.meter);

    let voice_measures: BTreeMap<String, Vec<Measure>> = sections
        .voices
        .iter()
        .zip(parsed)
        .map(|(voice, mut parsed)| {
            parsed.measures.resize_with(measure_count, Vec::new);
            (voice.id.clone(), parsed.measures)
        })
        .collect();

    log::debug!(
        "Parsed ABC score: {} voice(s), {} measure(s), key '{}'",
        sections.voices.len(),
        measure_count,
        header.key
    );

    ParsedScore {
        voices: sections.voices,
        measure_count,
        measures,
        voice_measures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(score: &ParsedScore, voice: &str, measure: usize) -> Vec<String> {
        score.measures_of(voice)[measure].iter().map(|t| t.token.clone()).collect()
    }

    #[test]
    fn test_header_defaults() {
        let (header, body) = scan_header("X:1\nK:C\nCDEF|");
        assert_eq!(header.unit_num, 1);
        assert_eq!(header.unit_den, 8);
        assert_eq!(header.meter, TimeSignature::new(4, 4));
        assert_eq!(body, vec!["CDEF|"]);
    }

    #[test]
    fn test_header_fields() {
        let (header, _) = scan_header("L: 1/4\nM:3/8\nK: Bb minor\n");
        assert_eq!((header.unit_num, header.unit_den), (1, 4));
        assert_eq!(header.meter, TimeSignature::new(3, 8));
        assert_eq!(header.key, "Bb minor");
    }

    #[test]
    fn test_zero_denominators_keep_defaults() {
        let (header, _) = scan_header("L:1/0\nM:4/0\nK:C");
        assert_eq!(header.unit_den, 8);
        assert_eq!(header.meter, TimeSignature::default());
    }

    #[test]
    fn test_body_skips_comments_lyrics_and_blank_lines() {
        let (_, body) = scan_header("K:C\n% comment\nCD % trailing\n\nw: la la\nEF");
        assert_eq!(body, vec!["CD", "EF"]);
    }

    #[test]
    fn test_missing_key_field_falls_back() {
        let (_, body) = scan_header("X:1\nT:Title\nCDEF|\n%%MIDI\nGABc|");
        assert_eq!(body, vec!["CDEF|", "GABc|"]);
    }

    #[test]
    fn test_single_implicit_voice() {
        let score = parse_score("L:1/4\nK:C\nCDEF|GABc|", ScoreParseOptions::default());
        assert_eq!(score.voices, vec![Voice::new("1")]);
        assert_eq!(score.measure_count, 2);
        assert_eq!(tokens(&score, "1", 1), vec!["G", "A", "B", "c"]);
    }

    #[test]
    fn test_declared_voices_with_names() {
        let abc = "L:1/4\nK:G\nV:1 nm=\"Flute\"\nV:2\nV:1\nFGAB|\nV:2\nF,4|]\n";
        let score = parse_score(abc, ScoreParseOptions::default());
        assert_eq!(score.voices[0].label, "Flute (V:1)");
        assert_eq!(score.voices[1].label, "V:2");
        assert_eq!(tokens(&score, "1", 0), vec!["^F", "G", "A", "B"]);
        assert_eq!(tokens(&score, "2", 0), vec!["^F"]);
    }

    #[test]
    fn test_inline_voices() {
        let abc = "K:C\n[V:S] C2D2|E2F2|\n[V:A]C4|\n[V:S] G8|";
        let score = parse_score(abc, ScoreParseOptions::default());
        let ids: Vec<&str> = score.voices.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["S", "A"]);
        assert_eq!(score.measure_count, 3);
        assert_eq!(score.measures_of("A").len(), 3);
        assert!(score.measures_of("A")[2].is_empty());
    }

    #[test]
    fn test_lines_before_voice_go_to_first_declared_voice() {
        let abc = "K:C\nCDEF|\nV:2\nGABc|";
        let score = parse_score(abc, ScoreParseOptions::default());
        let ids: Vec<&str> = score.voices.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(tokens(&score, "1", 0), vec!["C", "D", "E", "F"]);
    }

    #[test]
    fn test_meters_come_from_longest_voice() {
        let abc = "L:1/4\nM:4/4\nK:C\n[V:1] CDEF|\n[V:2] CDEF|[M:3/4]CDE|CDE|";
        let score = parse_score(abc, ScoreParseOptions::default());
        assert_eq!(score.measure_count, 3);
        assert_eq!(
            score.measures,
            vec![TimeSignature::new(4, 4), TimeSignature::new(3, 4), TimeSignature::new(3, 4)]
        );
    }

    #[test]
    fn test_empty_input_has_one_voice_and_measure() {
        let score = parse_score("", ScoreParseOptions::default());
        assert_eq!(score.voices.len(), 1);
        assert_eq!(score.measure_count, 1);
        assert_eq!(score.measures, vec![TimeSignature::default()]);
        assert_eq!(score.measures_of("1").len(), 1);
        assert!(score.measures_of("1")[0].is_empty());
    }

    #[test]
    fn test_key_naive_option() {
        let abc = "L:1/4\nK:F\nB ^C C B|";
        let aware = parse_score(abc, ScoreParseOptions::default());
        let naive = parse_score(abc, ScoreParseOptions { apply_key_signature: false });
        assert_eq!(tokens(&aware, "1", 0), vec!["_B", "^C", "^C", "_B"]);
        assert_eq!(tokens(&naive, "1", 0), vec!["B", "^C", "C", "B"]);
    }

    #[test]
    fn test_options_deserialize_with_default() {
        let options: ScoreParseOptions = serde_json::from_str("{}").unwrap();
        assert!(options.apply_key_signature);
    }
}
