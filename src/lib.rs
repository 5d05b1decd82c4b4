//! Pitch Analyzer WASM Module
//!
//! Post-tonal set analysis for pitch collections written in ABC notation:
//! note-token normalization, prime forms, Forte catalog lookup and a
//! structural parser for ABC transcriptions of MusicXML scores.

pub mod models;
pub mod parse;
pub mod analysis;
pub mod converters;
pub mod renderers;
pub mod api;

// Re-export commonly used types
pub use models::pitch_class::*;
pub use models::pc_set::*;
pub use models::score::*;
pub use analysis::PcSetTable;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Keeps an already installed logger
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!(
        "Pitch Analyzer WASM module initialized ({} set classes)",
        PcSetTable::standard().len()
    );
}
