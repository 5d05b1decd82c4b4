//! Models module for the Pitch Analyzer
//!
//! This module contains the data models shared by the parsers,
//! the set-theory engine and the WASM API.

pub mod pitch_class;
pub mod pc_set;
pub mod score;
pub mod version;
pub mod content;
pub mod analysis_log;
pub mod serde_helpers;

// Re-export commonly used types
pub use pitch_class::*;
pub use pc_set::*;
pub use score::*;
pub use version::ContentVersion;
pub use analysis_log::{AnalysisLog, AnalysisLogEntry, ImportError, PcSetSnapshot};
