//! Header probing and whole-image decoding through the `image` crate.
//!
//! Both functions consume the stream they are given. Callers reopen the
//! source before each call.

use std::io::BufReader;

use image::ImageReader;

use super::downsample::downsample;
use super::{DecodeError, ImageBounds, Raster};
use crate::source::SourceStream;

/// Read the image dimensions from the header without decoding pixels.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format is not recognized and
/// `DecodeError::CorruptedFile` if the header cannot be parsed or reports a
/// zero dimension.
pub fn probe_bounds(stream: SourceStream) -> Result<ImageBounds, DecodeError> {
    let reader = ImageReader::new(BufReader::new(stream))
        .with_guessed_format()
        .map_err(DecodeError::from)?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if width == 0 || height == 0 {
        return Err(DecodeError::CorruptedFile(format!(
            "header reports a {}x{} image",
            width, height
        )));
    }

    Ok(ImageBounds::new(width, height))
}

/// Decode the entire image, then downsample it by `sample_size`.
///
/// This materializes the full-resolution image and is only used when a
/// region decoder is unavailable.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format is not recognized.
/// Returns `DecodeError::CorruptedFile` if the image data is corrupted.
pub fn decode_full(stream: SourceStream, sample_size: u32) -> Result<Raster, DecodeError> {
    let reader = ImageReader::new(BufReader::new(stream))
        .with_guessed_format()
        .map_err(DecodeError::from)?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let full = Raster::from_rgba_image(img.into_rgba8());
    if full.is_empty() {
        return Err(DecodeError::CorruptedFile("decoded an empty image".to_string()));
    }

    Ok(downsample(full, sample_size))
}
