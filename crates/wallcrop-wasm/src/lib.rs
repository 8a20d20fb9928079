//! Wallcrop WASM - WebAssembly bindings for the wallcrop pipeline
//!
//! This crate exposes wallcrop-core to a browser host. The host owns the
//! crop UI; it hands the encoded source and the chosen rectangle to these
//! bindings, typically from a Web Worker, and gets the finished image back.
//!
//! # Module Structure
//!
//! - `crop` - Cropping, header probing and format helpers
//! - `types` - WASM-compatible wrapper types for results
//! - `logger` - Console backend for the core's `log` output
//!
//! # Usage
//!
//! ```typescript
//! import init, { crop_image, set_log_level } from '@wallcrop/wasm';
//!
//! await init();
//! set_log_level('debug');
//!
//! const jpeg = crop_image(bytes, { crop: { left: 0, top: 0, right: 1080, bottom: 1920 } });
//! ```

use wasm_bindgen::prelude::*;

mod crop;
mod logger;
mod types;

// Re-export public types
pub use crop::{crop_image, crop_image_retained, file_extension, probe_bounds};
pub use types::{JsCropResult, JsImageBounds, JsRaster};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Warn);
}

/// Change how much pipeline logging reaches the console.
///
/// Accepts `off`, `error`, `warn`, `info`, `debug` or `trace`; anything else
/// means `warn`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    logger::install(logger::parse_level(level));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    wallcrop_core::VERSION.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
