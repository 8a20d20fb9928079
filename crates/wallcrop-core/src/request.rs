//! Per-call and per-pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::encode::{OutputFormat, DEFAULT_COMPRESS_QUALITY};
use crate::geometry::RectF;

/// One crop job.
///
/// Deserializes from a partial object: every missing field takes its
/// default, so `{"crop": {...}}` is a valid request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropRequest {
    /// Crop rectangle in pixels of the displayed (rotated) image
    pub crop: RectF,
    /// Clockwise rotation in degrees, normalized into 0..360
    pub rotation: i32,
    /// Output width in pixels (0 = derive from the region)
    pub output_width: u32,
    /// Output height in pixels (0 = derive from the region)
    pub output_height: u32,
    /// Requested format tag, case-insensitive (`None` = jpg)
    pub output_format: Option<String>,
    /// JPEG quality (1-100)
    pub compression_quality: u8,
    /// Deliver the encoded bytes to the background sink
    pub apply_as_background: bool,
    /// Return the uncompressed output buffer too
    pub retain_output_buffer: bool,
    /// Hand the source bytes to the sink untouched
    pub skip_crop: bool,
}

impl Default for CropRequest {
    fn default() -> Self {
        Self {
            crop: RectF::default(),
            rotation: 0,
            output_width: 0,
            output_height: 0,
            output_format: None,
            compression_quality: DEFAULT_COMPRESS_QUALITY,
            apply_as_background: false,
            retain_output_buffer: false,
            skip_crop: false,
        }
    }
}

impl CropRequest {
    pub fn new(crop: RectF) -> Self {
        Self {
            crop,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, degrees: i32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_output_size(mut self, width: u32, height: u32) -> Self {
        self.output_width = width;
        self.output_height = height;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = Some(format.into());
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.compression_quality = quality;
        self
    }

    pub fn apply_as_background(mut self, apply: bool) -> Self {
        self.apply_as_background = apply;
        self
    }

    pub fn retain_output_buffer(mut self, retain: bool) -> Self {
        self.retain_output_buffer = retain;
        self
    }

    pub fn skip_crop(mut self, skip: bool) -> Self {
        self.skip_crop = skip;
        self
    }

    /// Rotation folded into `0..360`, so -90 behaves like 270.
    pub fn normalized_rotation(&self) -> i32 {
        self.rotation.rem_euclid(360)
    }

    pub fn format(&self) -> OutputFormat {
        OutputFormat::for_request(self.output_format.as_deref())
    }
}

/// Settings shared by every request a pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineOptions {
    /// Try the row-streaming region decoder before a full decode
    pub region_decoding: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            region_decoding: true,
        }
    }
}
