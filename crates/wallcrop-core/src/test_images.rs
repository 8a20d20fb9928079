//! Synthetic test images shared by unit tests.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::decode::Raster;

/// Opaque image where every pixel's color encodes its position.
pub fn pattern_raster(width: u32, height: u32) -> Raster {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push((x % 256) as u8);
            pixels.push((y % 256) as u8);
            pixels.push(((x * 7 + y * 13) % 256) as u8);
            pixels.push(255);
        }
    }
    Raster::new(width, height, pixels)
}

pub fn encode_png(raster: &Raster) -> Vec<u8> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(&raster.pixels, raster.width, raster.height, ExtendedColorType::Rgba8)
        .unwrap();
    out
}

/// RGBA PNG of [`pattern_raster`].
pub fn checkerboard_png(width: u32, height: u32) -> Vec<u8> {
    encode_png(&pattern_raster(width, height))
}

/// Smooth RGB gradient, JPEG encoded at high quality.
pub fn gradient_jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            rgb.push((x * 255 / width.max(1)) as u8);
            rgb.push((y * 255 / height.max(1)) as u8);
            rgb.push(128);
        }
    }
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, 95)
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// Encode raw samples with the `png` crate to get color types and bit
/// depths the `image` encoder does not write.
pub fn raw_png(
    width: u32,
    height: u32,
    color: png::ColorType,
    depth: png::BitDepth,
    palette: Option<Vec<u8>>,
    data: &[u8],
) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(depth);
        if let Some(palette) = palette {
            encoder.set_palette(palette);
        }
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }
    out
}
