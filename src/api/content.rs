//! Plugin content migration and validation for the WASM API

use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, serialize};
use crate::models::content::{default_content, upgrade_content, validate_content, Content, Violation};
use crate::{wasm_info, wasm_warn};

#[derive(Serialize)]
struct ValidationFailure<'a> {
    message: String,
    violations: &'a [Violation],
}

/// Fresh content for a newly created plugin instance
#[wasm_bindgen(js_name = getDefaultContent)]
pub fn get_default_content() -> Result<JsValue, JsValue> {
    serialize(&default_content(), "Failed to serialize default content")
}

/// Upgrade stored content to the current schema
///
/// Content that needs no migration is returned as the very same JS object.
#[wasm_bindgen(js_name = upgradeContent)]
pub fn upgrade_content_js(content: JsValue) -> Result<JsValue, JsValue> {
    let parsed: Content = deserialize(content.clone(), "Invalid content")?;

    match upgrade_content(&parsed) {
        Cow::Borrowed(_) => Ok(content),
        Cow::Owned(upgraded) => {
            wasm_info!("upgradeContent: migrated content to the current schema");
            serialize(&upgraded, "Failed to serialize upgraded content")
        }
    }
}

/// Validate content; throws `{ message, violations }` when invalid
#[wasm_bindgen(js_name = validateContent)]
pub fn validate_content_js(content: JsValue) -> Result<(), JsValue> {
    let value: Value = deserialize(content, "Invalid content")?;

    validate_content(&value).map_err(|err| {
        wasm_warn!("validateContent: {}", err);
        let failure = ValidationFailure {
            message: err.to_string(),
            violations: &err.violations,
        };
        serialize(&failure, "Failed to serialize validation error")
            .unwrap_or_else(|js_err| js_err)
    })
}
