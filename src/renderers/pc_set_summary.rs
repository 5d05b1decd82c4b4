//! Text and HTML presentation of set classifications
//!
//! Every field has a placeholder, so partial or missing classifications
//! render without errors.

use serde::Serialize;
use thiserror::Error;

use crate::analysis::table::PcSetTable;
use crate::models::pc_set::{ClassificationEntry, PrimeForm};

const PLACEHOLDER: &str = "&ndash;";
const EMPTY_PRIME_FORM: &str = "(<i>empty</i>)";

/// Display form of a prime-form key; the empty set is "∅"
pub fn display_key(key: &str) -> &str {
    if key.is_empty() {
        "∅"
    } else {
        key
    }
}

/// Collapsible-panel title: "4-Z15 · PF [0146]"
///
/// An explicit title wins; with no usable data the title is "Set".
pub fn summary_title(title: Option<&str>, entry: Option<&ClassificationEntry>) -> String {
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        return title.to_string();
    }

    let mut parts = Vec::new();
    if let Some(name) = entry.and_then(|e| e.forte_name.as_deref()) {
        parts.push(name.to_string());
    }
    if let Some(pf) = entry.map(|e| e.forte_prime_form.key()).filter(|k| !k.is_empty()) {
        parts.push(format!("PF [{}]", pf));
    }

    if parts.is_empty() {
        "Set".to_string()
    } else {
        parts.join(" · ")
    }
}

/// Case-insensitive substring filter over prime-form keys
///
/// The empty key matches as "∅"; a blank filter keeps everything.
pub fn filter_set_keys<'a>(keys: &'a [PrimeForm], filter: &str) -> Vec<&'a PrimeForm> {
    let needle = filter.trim().to_lowercase();
    keys.iter()
        .filter(|pf| needle.is_empty() || display_key(&pf.key()).to_lowercase().contains(&needle))
        .collect()
}

/// Row labels of the HTML table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PcSetLabels {
    pub rahn_prime_form: String,
    pub forte_prime_form: String,
    pub interval_vector: String,
    pub forte_name: String,
    pub z_mate: String,
    pub super_sets: String,
    pub sub_sets: String,
}

impl PcSetLabels {
    pub fn german() -> Self {
        Self {
            rahn_prime_form: "Prime Form (Rahn):".into(),
            forte_prime_form: "Prime Form (Forte):".into(),
            interval_vector: "Intervallvektor:".into(),
            forte_name: "Name (Forte):".into(),
            z_mate: "Z-Mate:".into(),
            super_sets: "Obermengen:".into(),
            sub_sets: "Untermengen:".into(),
        }
    }

    pub fn english() -> Self {
        Self {
            rahn_prime_form: "Prime form (Rahn):".into(),
            forte_prime_form: "Prime form (Forte):".into(),
            interval_vector: "Interval vector:".into(),
            forte_name: "Name (Forte):".into(),
            z_mate: "Z-mate:".into(),
            super_sets: "Supersets:".into(),
            sub_sets: "Subsets:".into(),
        }
    }
}

impl Default for PcSetLabels {
    fn default() -> Self {
        Self::german()
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] mustache::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PcSetContext {
    labels: PcSetLabels,
    rahn_prime_form: String,
    forte_prime_form: String,
    interval_vector: String,
    forte_name: String,
    z_mate: String,
    super_sets: String,
    sub_sets: String,
}

/// "(0,&nbsp;3,&nbsp;7)", optionally prefixed with the bold Forte name
fn format_prime_form(table: &PcSetTable, pf: &PrimeForm, with_name: bool) -> String {
    if pf.is_empty() {
        return EMPTY_PRIME_FORM.to_string();
    }
    let values: Vec<String> = pf.pitch_classes().iter().map(|pc| pc.to_string()).collect();
    let name = if with_name {
        table
            .forte_name(&pf.key())
            .map(|n| format!("<b>{}</b>:&nbsp;", n))
            .unwrap_or_default()
    } else {
        String::new()
    };
    format!("{}({})", name, values.join(",&nbsp;"))
}

fn format_related(table: &PcSetTable, sets: &[PrimeForm]) -> String {
    if sets.is_empty() {
        return PLACEHOLDER.to_string();
    }
    sets.iter()
        .map(|pf| format_prime_form(table, pf, true))
        .collect::<Vec<_>>()
        .join("<br>")
}

const PC_SET_TEMPLATE: &str = include_str!("templates/pc_set.html.mustache");

/// HTML table describing one set class
pub fn render_pc_set_html(
    table: &PcSetTable,
    entry: &ClassificationEntry,
    labels: &PcSetLabels,
) -> Result<String, RenderError> {
    let context = PcSetContext {
        labels: labels.clone(),
        rahn_prime_form: format_prime_form(table, &entry.rahn_prime_form, false),
        forte_prime_form: format_prime_form(table, &entry.forte_prime_form, false),
        interval_vector: format!("[{}]", entry.interval_vector),
        forte_name: entry.forte_name.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
        z_mate: entry
            .z_mate
            .as_ref()
            .map(|pf| format_prime_form(table, pf, false))
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        super_sets: format_related(table, &entry.super_sets),
        sub_sets: format_related(table, &entry.sub_sets),
    };

    let template = mustache::compile_str(PC_SET_TEMPLATE)?;
    Ok(template.render_to_string(&context)?)
}
