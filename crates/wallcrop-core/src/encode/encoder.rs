//! Compress an output buffer.
//!
//! Uses the `image` crate's JPEG and PNG encoders. JPEG has no alpha
//! channel, so transparent pixels (the corners uncovered by a rotation) are
//! composited over black first.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use thiserror::Error;

use super::OutputFormat;
use crate::decode::Raster;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec rejected the image
    #[error("{0} encoding failed: {1}")]
    EncodingFailed(OutputFormat, String),
}

/// A compressed image ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

/// Encode an RGBA raster.
///
/// # Arguments
///
/// * `raster` - Output buffer to compress
/// * `format` - Target format
/// * `quality` - JPEG quality (1-100, clamped); ignored for PNG
///
/// # Errors
///
/// Returns an error for empty or inconsistent rasters and codec failures.
pub fn encode_raster(
    raster: &Raster,
    format: OutputFormat,
    quality: u8,
) -> Result<EncodedImage, EncodeError> {
    let (width, height) = (raster.width, raster.height);
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * Raster::CHANNELS;
    if raster.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: raster.pixels.len(),
        });
    }

    let mut bytes = Vec::new();
    let result = match format {
        OutputFormat::Jpeg => {
            let rgb = flatten_to_rgb(&raster.pixels);
            JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)).write_image(
                &rgb,
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
        OutputFormat::Png => PngEncoder::new(&mut bytes).write_image(
            &raster.pixels,
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
    };
    result.map_err(|e| EncodeError::EncodingFailed(format, e.to_string()))?;

    Ok(EncodedImage {
        bytes,
        format,
        width,
        height,
    })
}

/// Drop alpha by compositing over black.
fn flatten_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let alpha = u16::from(px[3]);
        for &c in &px[..3] {
            rgb.push(((u16::from(c) * alpha + 127) / 255) as u8);
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_images::pattern_raster;

    #[test]
    fn test_encode_jpeg_markers() {
        let encoded = encode_raster(&pattern_raster(32, 16), OutputFormat::Jpeg, 90).unwrap();

        // SOI and EOI markers
        assert_eq!(&encoded.bytes[0..2], &[0xFF, 0xD8]);
        let len = encoded.bytes.len();
        assert_eq!(&encoded.bytes[len - 2..], &[0xFF, 0xD9]);
        assert_eq!((encoded.width, encoded.height), (32, 16));
        assert_eq!(encoded.format, OutputFormat::Jpeg);
    }

    #[test]
    fn test_encode_png_is_lossless() {
        let raster = pattern_raster(9, 7);
        let encoded = encode_raster(&raster, OutputFormat::Png, 90).unwrap();
        assert_eq!(&encoded.bytes[1..4], b"PNG");

        let decoded = image::load_from_memory(&encoded.bytes).unwrap().into_rgba8();
        assert_eq!(Raster::from_rgba_image(decoded), raster);
    }

    #[test]
    fn test_png_keeps_transparency() {
        let raster = Raster::transparent(3, 3);
        let encoded = encode_raster(&raster, OutputFormat::Png, 90).unwrap();
        let decoded = image::load_from_memory(&encoded.bytes).unwrap().into_rgba8();
        assert!(decoded.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_quality_clamping() {
        let raster = pattern_raster(10, 10);
        assert!(encode_raster(&raster, OutputFormat::Jpeg, 0).is_ok());
        assert!(encode_raster(&raster, OutputFormat::Jpeg, 255).is_ok());
    }

    #[test]
    fn test_quality_affects_size() {
        let raster = pattern_raster(64, 64);
        let low = encode_raster(&raster, OutputFormat::Jpeg, 10).unwrap();
        let high = encode_raster(&raster, OutputFormat::Jpeg, 100).unwrap();
        assert!(high.bytes.len() > low.bytes.len());
    }

    #[test]
    fn test_zero_dimensions() {
        let raster = Raster::new(0, 5, Vec::new());
        assert!(matches!(
            encode_raster(&raster, OutputFormat::Png, 90),
            Err(EncodeError::InvalidDimensions { width: 0, height: 5 })
        ));
    }

    #[test]
    fn test_inconsistent_pixels() {
        let raster = Raster {
            width: 2,
            height: 2,
            pixels: vec![0; 12],
        };
        assert!(matches!(
            encode_raster(&raster, OutputFormat::Jpeg, 90),
            Err(EncodeError::InvalidPixelData {
                expected: 16,
                actual: 12
            })
        ));
    }

    #[test]
    fn test_flatten_over_black() {
        let rgb = flatten_to_rgb(&[200, 100, 50, 255, 200, 100, 50, 0, 255, 255, 255, 128]);
        assert_eq!(rgb, vec![200, 100, 50, 0, 0, 0, 128, 128, 128]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::test_images::pattern_raster;
    use proptest::prelude::*;

    proptest! {
        /// Property: Same input always produces same output (deterministic).
        #[test]
        fn prop_deterministic_output(
            (width, height) in (1u32..=20, 1u32..=20),
            quality in 1u8..=100,
            png in any::<bool>(),
        ) {
            let format = if png { OutputFormat::Png } else { OutputFormat::Jpeg };
            let raster = pattern_raster(width, height);
            let a = encode_raster(&raster, format, quality).unwrap();
            let b = encode_raster(&raster, format, quality).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Property: Encoded output decodes back to the same dimensions.
        #[test]
        fn prop_dimensions_survive(
            (width, height) in (1u32..=40, 1u32..=40),
            png in any::<bool>(),
        ) {
            let format = if png { OutputFormat::Png } else { OutputFormat::Jpeg };
            let encoded = encode_raster(&pattern_raster(width, height), format, 90).unwrap();
            let decoded = image::load_from_memory(&encoded.bytes).unwrap();
            prop_assert_eq!((decoded.width(), decoded.height()), (width, height));
        }
    }
}
