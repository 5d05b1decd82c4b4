//! Serde serialization helpers for ensuring consistent JSON output

use serde::{Serialize, Serializer};

/// Serialize Option<T> as null when None (don't skip the field)
pub fn serialize_option_as_null<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(v) => serializer.serialize_some(v),
        None => serializer.serialize_none(),
    }
}

/// Largest integer a JavaScript number holds exactly (`Number.MAX_SAFE_INTEGER`)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Serialize a beat position as an integer when it is whole
///
/// Stored scores written by the JavaScript host have `"beatStart": 2`,
/// not `2.0`; keep that shape so saved content diffs stay clean. Beats past
/// the safe integer range stay floats, the JSON-compatible WASM serializer
/// rejects such an `i64`.
pub fn serialize_beat<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
