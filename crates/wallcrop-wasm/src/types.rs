//! WASM-compatible wrapper types for pipeline results.
//!
//! This module provides JavaScript-friendly types that wrap the core wallcrop
//! types, handling the conversion between Rust and JavaScript data representations.

use wallcrop_core::{CropOutcome, EncodedImage, ImageBounds, Raster};
use wasm_bindgen::prelude::*;

/// An RGBA pixel buffer for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`, ready for `new ImageData(...)`.
#[wasm_bindgen]
pub struct JsRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRaster {
    /// Image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl From<Raster> for JsRaster {
    fn from(raster: Raster) -> Self {
        Self {
            width: raster.width,
            height: raster.height,
            pixels: raster.pixels,
        }
    }
}

/// Source dimensions read from the image header.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsImageBounds {
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsImageBounds {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl From<ImageBounds> for JsImageBounds {
    fn from(bounds: ImageBounds) -> Self {
        Self {
            width: bounds.width,
            height: bounds.height,
        }
    }
}

/// Encoded output plus the uncompressed buffer it was made from.
#[wasm_bindgen]
pub struct JsCropResult {
    bytes: Vec<u8>,
    extension: &'static str,
    mime_type: &'static str,
    width: u32,
    height: u32,
    retained: Option<Raster>,
}

#[wasm_bindgen]
impl JsCropResult {
    /// Encoded image bytes as Uint8Array (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// File extension of the encoded bytes ("jpg" or "png")
    #[wasm_bindgen(getter)]
    pub fn extension(&self) -> String {
        self.extension.to_string()
    }

    /// MIME type for building a Blob
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.mime_type.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Take the uncompressed output buffer. Returns undefined after the
    /// first call.
    pub fn take_raster(&mut self) -> Option<JsRaster> {
        self.retained.take().map(JsRaster::from)
    }
}

impl JsCropResult {
    fn from_encoded(encoded: EncodedImage, retained: Option<Raster>) -> Self {
        Self {
            extension: encoded.format.extension(),
            mime_type: encoded.format.mime_type(),
            width: encoded.width,
            height: encoded.height,
            bytes: encoded.bytes,
            retained,
        }
    }

    /// Build from a pipeline outcome. Returns `None` for pass-through
    /// outcomes, which carry no encoded image.
    pub(crate) fn from_outcome(outcome: CropOutcome) -> Option<Self> {
        match outcome {
            CropOutcome::Cropped {
                encoded, retained, ..
            } => Some(Self::from_encoded(encoded, retained)),
            CropOutcome::PassedThrough { .. } => None,
        }
    }
}
