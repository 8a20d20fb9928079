//! Region-limited decoding.
//!
//! A region decoder produces pixels for one rectangle of the source without
//! materializing the rest of the image. PNG supports this by streaming rows:
//! rows above the rectangle are decoded and dropped, columns outside it are
//! never copied, and decoding stops at the rectangle's bottom edge. Peak
//! memory is one source row plus the (downsampled) output.
//!
//! JPEG and interlaced PNG cannot be decoded row by row here; opening a
//! region decoder for them fails with `DecodeError::RegionUnsupported` and the
//! pipeline falls back to a full decode.

use std::io::{BufReader, Read, Seek, SeekFrom};

use png::{BitDepth, ColorType, Transformations};

use super::downsample::BoxDownsampler;
use super::{DecodeError, ImageBounds, Raster};
use crate::geometry::Rect;
use crate::source::SourceStream;

/// Decoder that can produce a single rectangle of an encoded image.
pub trait RegionDecoder {
    /// Dimensions of the full source image.
    fn bounds(&self) -> ImageBounds;

    /// Decode `rect` (clipped to the image), downsampled by `sample_size`.
    ///
    /// Consumes the decoder: the underlying stream is read forward only.
    fn decode_region(self: Box<Self>, rect: Rect, sample_size: u32) -> Result<Raster, DecodeError>;
}

/// Sniff the stream and open a region decoder for it.
///
/// # Errors
///
/// `DecodeError::RegionUnsupported` for formats without a region decoder,
/// `DecodeError::InvalidFormat` for unrecognized data, and
/// `DecodeError::CorruptedFile` if the PNG header cannot be parsed.
pub fn open_region_decoder(mut stream: SourceStream) -> Result<Box<dyn RegionDecoder>, DecodeError> {
    let mut header = Vec::with_capacity(16);
    (&mut stream).take(16).read_to_end(&mut header)?;
    stream.seek(SeekFrom::Start(0))?;

    match image::guess_format(&header) {
        Ok(image::ImageFormat::Png) => Ok(Box::new(PngRegionDecoder::new(stream)?)),
        Ok(other) => Err(DecodeError::RegionUnsupported(format!("{:?}", other))),
        Err(_) => Err(DecodeError::InvalidFormat),
    }
}

/// Row-streaming PNG region decoder.
pub struct PngRegionDecoder {
    reader: png::Reader<BufReader<SourceStream>>,
    bounds: ImageBounds,
    color: ColorType,
}

impl PngRegionDecoder {
    pub fn new(stream: SourceStream) -> Result<Self, DecodeError> {
        let mut decoder = png::Decoder::new(BufReader::new(stream));
        // Palette, low bit depth and tRNS expand to 8-bit gray/RGB(A).
        decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
        let reader = decoder
            .read_info()
            .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

        let info = reader.info();
        if info.interlaced {
            return Err(DecodeError::RegionUnsupported("interlaced PNG".to_string()));
        }
        let bounds = ImageBounds::new(info.width, info.height);

        let color = match reader.output_color_type() {
            (
                ct @ (ColorType::Grayscale
                | ColorType::GrayscaleAlpha
                | ColorType::Rgb
                | ColorType::Rgba),
                BitDepth::Eight,
            ) => ct,
            (ct, depth) => {
                return Err(DecodeError::RegionUnsupported(format!(
                    "PNG output {:?} at {:?}",
                    ct, depth
                )))
            }
        };

        Ok(Self {
            reader,
            bounds,
            color,
        })
    }
}

impl RegionDecoder for PngRegionDecoder {
    fn bounds(&self) -> ImageBounds {
        self.bounds
    }

    fn decode_region(mut self: Box<Self>, rect: Rect, sample_size: u32) -> Result<Raster, DecodeError> {
        let image_rect = Rect::from_size(self.bounds.width, self.bounds.height);
        let clip = rect
            .intersect(&image_rect)
            .ok_or(DecodeError::RegionOutOfBounds {
                left: rect.left,
                top: rect.top,
                right: rect.right,
                bottom: rect.bottom,
                width: self.bounds.width,
                height: self.bounds.height,
            })?;

        let (left, right) = (clip.left as usize, clip.right as usize);
        let (top, bottom) = (clip.top as u32, clip.bottom as u32);
        let mut sampler = BoxDownsampler::new(clip.width() as u32, sample_size);
        let mut scratch = Vec::with_capacity(clip.width() as usize * Raster::CHANNELS);
        let color = self.color;

        for y in 0..bottom {
            let row = self
                .reader
                .next_row()
                .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?
                .ok_or_else(|| DecodeError::CorruptedFile(format!("PNG missing row {}", y)))?;
            if y < top {
                continue;
            }
            scratch.clear();
            expand_to_rgba(color, row.data(), left, right, &mut scratch);
            sampler.push_row(&scratch);
        }

        Ok(sampler.finish())
    }
}

/// Copy columns `left..right` of an 8-bit PNG row into RGBA.
fn expand_to_rgba(color: ColorType, data: &[u8], left: usize, right: usize, out: &mut Vec<u8>) {
    match color {
        ColorType::Grayscale => {
            for &v in &data[left..right] {
                out.extend_from_slice(&[v, v, v, 255]);
            }
        }
        ColorType::GrayscaleAlpha => {
            for px in data[left * 2..right * 2].chunks_exact(2) {
                out.extend_from_slice(&[px[0], px[0], px[0], px[1]]);
            }
        }
        ColorType::Rgb => {
            for px in data[left * 3..right * 3].chunks_exact(3) {
                out.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
        }
        ColorType::Rgba => out.extend_from_slice(&data[left * 4..right * 4]),
        // Indexed output is expanded away by Transformations::EXPAND.
        ColorType::Indexed => {}
    }
}
