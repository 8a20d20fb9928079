//! Wallcrop Core - background image crop pipeline
//!
//! This crate turns a user-chosen rectangle of a source image into a
//! compressed, correctly rotated and scaled background image. Large sources
//! are decoded region by region where the format allows it, with a full
//! decode as the fallback.
//!
//! # Modules
//!
//! - [`geometry`]: rectangles and affine matrices
//! - [`decode`]: header probing, region decoding, full decoding, downsampling
//! - [`transform`]: crop resolution, in-memory crop, compositing
//! - [`encode`]: output format selection and JPEG/PNG encoding
//! - [`pipeline`]: the end-to-end [`CropPipeline`]
//! - [`task`]: running a request on a worker thread

pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod request;
pub mod sink;
pub mod source;
pub mod task;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_images;

pub use decode::{DecodePath, DecodedRegion, ImageBounds, Raster};
pub use encode::{get_file_extension, EncodedImage, OutputFormat, DEFAULT_COMPRESS_QUALITY};
pub use error::{CropError, ErrorKind};
pub use geometry::{Affine, Rect, RectF};
pub use pipeline::{CropOutcome, CropPipeline};
pub use request::{CropRequest, PipelineOptions};
pub use sink::{FileSink, MemorySink, WallpaperSink};
pub use source::{LocalSourceResolver, SourceRef, SourceResolver, SourceStream};
pub use task::{CropTask, CropTaskHandle};

/// Crate version, as reported to bindings.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crop in-memory image bytes without a sink.
///
/// Convenience for hosts that already hold the encoded source, such as the
/// WebAssembly bindings.
///
/// # Errors
///
/// Same as [`CropPipeline::run`]; `apply_as_background` is ignored.
pub fn crop_bytes(bytes: &[u8], request: &CropRequest) -> Result<CropOutcome, CropError> {
    let request = CropRequest {
        apply_as_background: false,
        ..request.clone()
    };
    CropPipeline::new(LocalSourceResolver::new()).run(
        &SourceRef::bytes(bytes),
        &request,
        &mut MemorySink::new(),
    )
}
