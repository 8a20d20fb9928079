//! Crop pipeline WASM bindings.
//!
//! The host page lets the user pick a rectangle, then calls into this module
//! from a Web Worker with the encoded source bytes and a request object.
//!
//! # Example
//!
//! ```typescript
//! import { crop_image, file_extension } from '@wallcrop/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const out = crop_image(bytes, {
//!   crop: { left: 120, top: 40, right: 1200, bottom: 1960 },
//!   rotation: 90,
//!   outputWidth: 1080,
//!   outputHeight: 1920,
//!   outputFormat: 'png',
//! });
//! const blob = new Blob([out], { type: `image/${file_extension('png')}` });
//! ```

use std::io::Cursor;

use wallcrop_core::decode::probe_bounds as probe_header;
use wallcrop_core::{crop_bytes, get_file_extension, CropError, CropOutcome, CropRequest, ImageBounds};
use wasm_bindgen::prelude::*;

use crate::types::{JsCropResult, JsImageBounds};

/// Crop, rotate, scale and encode `bytes`.
///
/// # Arguments
///
/// * `bytes` - Encoded JPEG or PNG source
/// * `request` - Plain object with `crop`, `rotation`, `outputWidth`,
///   `outputHeight`, `outputFormat` and `compressionQuality`; missing fields
///   take their defaults
///
/// # Returns
///
/// The encoded output as a `Uint8Array`.
///
/// # Errors
///
/// Throws a string prefixed with the error kind, e.g.
/// `"InvalidCropBounds: ..."`.
#[wasm_bindgen]
pub fn crop_image(bytes: &[u8], request: JsValue) -> Result<Vec<u8>, JsValue> {
    let request = parse_request(request)?;
    let outcome = run_crop(bytes, &request).map_err(to_js_error)?;
    Ok(outcome.into_encoded().map(|e| e.bytes).unwrap_or_default())
}

/// Like [`crop_image`], but also returns the uncompressed RGBA output.
#[wasm_bindgen]
pub fn crop_image_retained(bytes: &[u8], request: JsValue) -> Result<JsCropResult, JsValue> {
    let mut request = parse_request(request)?;
    request.retain_output_buffer = true;
    let outcome = run_crop(bytes, &request).map_err(to_js_error)?;
    JsCropResult::from_outcome(outcome)
        .ok_or_else(|| JsValue::from_str("pipeline produced no encoded image"))
}

/// Read the source dimensions from the header only.
#[wasm_bindgen]
pub fn probe_bounds(bytes: &[u8]) -> Result<JsImageBounds, JsValue> {
    read_bounds(bytes)
        .map(JsImageBounds::from)
        .map_err(to_js_error)
}

/// Canonical extension for a requested format ("png" or "jpg").
#[wasm_bindgen]
pub fn file_extension(format: Option<String>) -> String {
    get_file_extension(format.as_deref()).to_string()
}

fn parse_request(value: JsValue) -> Result<CropRequest, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid crop request: {}", e)))
}

fn to_js_error(err: CropError) -> JsValue {
    JsValue::from_str(&format!("{}: {}", err.kind().as_str(), err))
}

/// Pipeline entry shared by the bindings. There is no background sink in
/// the browser, so the shortcut and delivery flags are cleared.
pub(crate) fn run_crop(bytes: &[u8], request: &CropRequest) -> Result<CropOutcome, CropError> {
    let request = CropRequest {
        skip_crop: false,
        ..request.clone()
    };
    crop_bytes(bytes, &request)
}

pub(crate) fn read_bounds(bytes: &[u8]) -> Result<ImageBounds, CropError> {
    probe_header(Box::new(Cursor::new(bytes.to_vec()))).map_err(CropError::from)
}
