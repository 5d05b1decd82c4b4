//! Plugin content: default template, schema migration and validation
//!
//! Content is owned by the host CMS and travels as a JSON object. It is kept
//! as a `serde_json::Map` here because migration must carry over values of
//! any shape (e.g. `chordMap`) and validation must report on keys that a
//! typed struct would silently drop.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

use crate::models::version::ContentVersion;

pub type Content = Map<String, Value>;

/// What the learner is shown next to the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskMode {
    None,
    AbcCode,
    Image,
}

impl TaskMode {
    pub const ALL: [TaskMode; 3] = [TaskMode::None, TaskMode::AbcCode, TaskMode::Image];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskMode::None => "none",
            TaskMode::AbcCode => "abcCode",
            TaskMode::Image => "image",
        }
    }

    pub fn from_str_exact(s: &str) -> Option<Self> {
        TaskMode::ALL.into_iter().find(|mode| mode.as_str() == s)
    }
}

impl fmt::Display for TaskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio source type stored with new content
pub const TASK_AUDIO_TYPE_NONE: &str = "none";

/// The canonical content template; its key set defines the current schema
pub fn default_content() -> Content {
    let mut content = Map::new();
    content.insert("version".into(), json!(ContentVersion::CURRENT.to_string()));
    content.insert("width".into(), json!(100));
    content.insert("taskMode".into(), json!(TaskMode::None.as_str()));
    content.insert("taskWidth".into(), json!(100));
    content.insert("taskDescription".into(), json!(""));
    content.insert("taskAbcCode".into(), json!(""));
    content.insert("taskImage".into(), json!({ "sourceUrl": "", "copyrightNotice": "" }));
    content.insert("taskAudioType".into(), json!(TASK_AUDIO_TYPE_NONE));
    content.insert("taskAudioSourceUrl".into(), json!(""));
    content.insert("chordMap".into(), Value::Null);
    content.insert("parsedScore".into(), Value::Null);
    content
}

/// Version stored in the content; absent, null or non-string reads as 0.0.0
pub fn content_version(content: &Content) -> ContentVersion {
    match content.get("version") {
        Some(Value::String(s)) => ContentVersion::parse_lenient(s),
        _ => ContentVersion::new(0, 0, 0),
    }
}

/// Bring stored content up to the current schema
///
/// Returns the input untouched (`Cow::Borrowed`) when MAJOR and MINOR match
/// the current version. Otherwise builds a new object with exactly the keys
/// of [`default_content`]: values present in the old content are kept
/// (including nulls), missing ones come from the defaults, keys unknown to
/// the template are dropped, and `version` is set to the current version.
pub fn upgrade_content(content: &Content) -> Cow<'_, Content> {
    let stored = content_version(content);
    if !stored.needs_migration_to(&ContentVersion::CURRENT) {
        return Cow::Borrowed(content);
    }

    log::info!("Migrating content from {} to {}", stored, ContentVersion::CURRENT);

    let mut upgraded: Content = default_content()
        .into_iter()
        .map(|(key, default)| {
            let value = content.get(&key).cloned().unwrap_or(default);
            (key, value)
        })
        .collect();
    upgraded.insert("version".into(), json!(ContentVersion::CURRENT.to_string()));

    Cow::Owned(upgraded)
}

/// One schema violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted path of the offending value ("" for the content itself)
    pub path: String,
    pub message: String,
}

impl Violation {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "\"{}\" {}", self.path, self.message)
        }
    }
}

/// Content failed validation; lists every violation found
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid content: {}", format_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Default)]
struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    fn fail(&mut self, path: &str, message: impl Into<String>) {
        self.violations.push(Violation::new(path, message));
    }

    /// Number in [min, max]; no string-to-number conversion
    fn number_in_range(&mut self, path: &str, value: &Value, min: f64, max: f64) {
        match value.as_f64() {
            Some(n) if n < min => self.fail(path, format!("must be greater than or equal to {}", min)),
            Some(n) if n > max => self.fail(path, format!("must be less than or equal to {}", max)),
            Some(_) => {}
            None => self.fail(path, "must be a number"),
        }
    }

    fn string(&mut self, path: &str, value: &Value) {
        if !value.is_string() {
            self.fail(path, "must be a string");
        }
    }

    fn task_mode(&mut self, path: &str, value: &Value) {
        match value.as_str() {
            Some(s) if TaskMode::from_str_exact(s).is_some() => {}
            Some(_) => {
                let allowed: Vec<&str> = TaskMode::ALL.iter().map(TaskMode::as_str).collect();
                self.fail(path, format!("must be one of [{}]", allowed.join(", ")));
            }
            None => self.fail(path, "must be a string"),
        }
    }

    fn task_image(&mut self, path: &str, value: &Value) {
        let Some(image) = value.as_object() else {
            self.fail(path, "must be of type object");
            return;
        };
        for key in ["sourceUrl", "copyrightNotice"] {
            let field_path = format!("{}.{}", path, key);
            match image.get(key) {
                Some(v) => self.string(&field_path, v),
                None => self.fail(&field_path, "is required"),
            }
        }
        for key in image.keys() {
            if key != "sourceUrl" && key != "copyrightNotice" {
                self.fail(&format!("{}.{}", path, key), "is not allowed");
            }
        }
    }
}

/// Check content against the plugin schema, collecting every violation
///
/// Unknown top-level keys are allowed; values are never coerced (a width of
/// `"50"` is a violation, not 50).
pub fn validate_content(content: &Value) -> Result<(), ValidationError> {
    let mut v = Validator::default();

    let Some(obj) = content.as_object() else {
        v.fail("", "value must be of type object");
        return Err(ValidationError { violations: v.violations });
    };

    match obj.get("width") {
        Some(width) => v.number_in_range("width", width, 0.0, 100.0),
        None => v.fail("width", "is required"),
    }
    if let Some(mode) = obj.get("taskMode") {
        v.task_mode("taskMode", mode);
    }
    if let Some(width) = obj.get("taskWidth") {
        v.number_in_range("taskWidth", width, 0.0, 100.0);
    }
    for key in ["taskDescription", "taskAbcCode"] {
        if let Some(value) = obj.get(key) {
            v.string(key, value);
        }
    }
    if let Some(image) = obj.get("taskImage") {
        v.task_image("taskImage", image);
    }

    if v.violations.is_empty() {
        Ok(())
    } else {
        log::debug!("Content validation found {} violation(s)", v.violations.len());
        Err(ValidationError { violations: v.violations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_version(version: Value) -> Content {
        let mut content = default_content();
        content.insert("version".into(), version);
        content
    }

    #[test]
    fn test_same_reference_when_version_matches() {
        let content = default_content();
        let result = upgrade_content(&content);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert!(std::ptr::eq(result.as_ref(), &content));
    }

    #[test]
    fn test_same_reference_when_only_patch_differs() {
        let content = with_version(json!("1.1.999"));
        assert!(matches!(upgrade_content(&content), Cow::Borrowed(_)));
    }

    #[test]
    fn test_migration_sets_current_version() {
        for version in [json!("0.0.0"), json!("2.1.0"), json!("1.2.0"), Value::Null] {
            let content = with_version(version);
            let result = upgrade_content(&content);
            assert!(matches!(result, Cow::Owned(_)));
            assert_eq!(result["version"], json!("1.1.1"));
        }
    }

    #[test]
    fn test_migration_when_version_absent() {
        let mut content = default_content();
        content.remove("version");
        assert_eq!(upgrade_content(&content)["version"], json!("1.1.1"));
    }

    #[test]
    fn test_migration_preserves_and_fills() {
        let mut content = with_version(json!("0.0.0"));
        content.insert("width".into(), json!(42));
        content.insert("chordMap".into(), json!({ "037": { "en": "Major" } }));
        content.remove("taskAudioType");

        let result = upgrade_content(&content);
        assert_eq!(result["width"], json!(42));
        assert_eq!(result["chordMap"]["037"]["en"], json!("Major"));
        assert_eq!(result["taskAudioType"], json!("none"));
    }

    #[test]
    fn test_migration_drops_unknown_keys() {
        let mut content = with_version(json!("0.0.0"));
        content.insert("legacyField".into(), json!("old"));

        let result = upgrade_content(&content);
        assert!(!result.contains_key("legacyField"));

        let defaults = default_content();
        let mut expected_keys: Vec<&str> = defaults.keys().map(String::as_str).collect();
        let mut actual_keys: Vec<&str> = result.keys().map(String::as_str).collect();
        expected_keys.sort_unstable();
        actual_keys.sort_unstable();
        assert_eq!(actual_keys, expected_keys);
    }

    #[test]
    fn test_migration_of_empty_content() {
        let empty = Map::new();
        let result = upgrade_content(&empty);
        let defaults = default_content();
        for (key, value) in defaults.iter().filter(|(k, _)| *k != "version") {
            assert_eq!(&result[key], value);
        }
    }

    #[test]
    fn test_default_content_is_valid() {
        assert!(validate_content(&Value::Object(default_content())).is_ok());
    }

    #[test]
    fn test_unknown_top_level_keys_allowed() {
        let mut content = default_content();
        content.insert("extraField".into(), json!("ignored"));
        assert!(validate_content(&Value::Object(content)).is_ok());
    }

    #[test]
    fn test_non_objects_rejected() {
        assert!(validate_content(&Value::Null).is_err());
        assert!(validate_content(&json!(42)).is_err());
        assert!(validate_content(&json!("string")).is_err());
    }

    #[test]
    fn test_width_rules() {
        let check = |width: Value| {
            let mut content = default_content();
            content.insert("width".into(), width);
            validate_content(&Value::Object(content))
        };
        assert!(check(json!(0)).is_ok());
        assert!(check(json!(101)).is_err());
        assert!(check(json!(-1)).is_err());
        assert!(check(json!("50")).is_err());

        let mut content = default_content();
        content.remove("width");
        assert!(validate_content(&Value::Object(content)).is_err());
    }

    #[test]
    fn test_reports_all_violations() {
        let content = json!({
            "width": "wide",
            "taskMode": "video",
            "taskImage": { "sourceUrl": 3, "caption": "" }
        });
        let err = validate_content(&content).unwrap_err();
        let paths: Vec<&str> = err.violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "width",
                "taskMode",
                "taskImage.sourceUrl",
                "taskImage.copyrightNotice",
                "taskImage.caption"
            ]
        );
        assert!(err.to_string().contains("\"taskMode\" must be one of [none, abcCode, image]"));
    }
}
