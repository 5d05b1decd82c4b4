//! ABC note-length suffixes and tuplet defaults
//!
//! A suffix scales the default note length `L:`:
//!
//!   ""    → 1/1      "2"   → 2/1
//!   "/"   → 1/2      "//"  → 1/4
//!   "3/2" → 3/2      "/4"  → 1/4
//!   "3/"  → 3/2
//!
//! Anything else, including a zero denominator, reads as 1/1.

/// A duration multiplier `num/den` relative to the default note length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationSuffix {
    pub num: u64,
    pub den: u64,
}

impl DurationSuffix {
    pub const UNIT: DurationSuffix = DurationSuffix { num: 1, den: 1 };

    pub fn new(num: u64, den: u64) -> Self {
        Self { num, den }
    }

    pub fn as_pair(self) -> (u64, u64) {
        (self.num, self.den)
    }

    pub fn as_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl Default for DurationSuffix {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Parse a run of ASCII digits, saturating instead of overflowing
pub(crate) fn parse_digits(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add((b - b'0') as u64)
    }))
}

pub fn parse_duration_suffix(suffix: &str) -> DurationSuffix {
    if suffix.is_empty() {
        return DurationSuffix::UNIT;
    }

    if suffix.bytes().all(|b| b == b'/') {
        let den = u32::try_from(suffix.len())
            .ok()
            .and_then(|k| 1u64.checked_shl(k))
            .unwrap_or(u64::MAX);
        return DurationSuffix::new(1, den);
    }

    if let Some(num) = parse_digits(suffix) {
        return DurationSuffix::new(num, 1);
    }

    let parsed = match suffix.split_once('/') {
        Some(("", den)) => parse_digits(den).map(|d| (1, d)),
        Some((num, "")) => parse_digits(num).map(|n| (n, 2)),
        Some((num, den)) => parse_digits(num).zip(parse_digits(den)),
        None => None,
    };

    match parsed {
        Some((num, den)) if den > 0 => DurationSuffix::new(num, den),
        _ => DurationSuffix::UNIT,
    }
}

/// Default `q` for a tuplet of `p` notes: `p` notes in the time of `q`
pub fn default_tuplet_q(p: u64) -> u64 {
    match p {
        2 => 3,
        3 => 2,
        4 => 3,
        6 => 2,
        8 => 3,
        _ => 2,
    }
}
