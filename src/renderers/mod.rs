//! Renderers module for the Pitch Analyzer
//!
//! This module turns classification entries into display strings and HTML.

pub mod pc_set_summary;

// Re-export commonly used types
pub use pc_set_summary::{
    display_key,
    filter_set_keys,
    render_pc_set_html,
    summary_title,
    PcSetLabels,
    RenderError,
};
