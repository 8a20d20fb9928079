//! In-memory cropping for the fallback decode path.
//!
//! The region path never needs this: its decoder only emits the crop. When
//! the whole image had to be decoded, the crop rectangle is cut out here.

use crate::decode::Raster;
use crate::geometry::Rect;

/// Copy the pixels of `rect` out of `image`.
///
/// The rectangle is clipped to the image bounds first.
///
/// # Returns
///
/// `None` if the rectangle does not overlap the image.
pub fn crop_raster(image: &Raster, rect: Rect) -> Option<Raster> {
    let clip = rect.intersect(&Rect::from_size(image.width, image.height))?;

    // Fast path: full crop returns a clone
    if clip == Rect::from_size(image.width, image.height) {
        return Some(image.clone());
    }

    let out_width = clip.width() as u32;
    let out_height = clip.height() as u32;
    let row_bytes = out_width as usize * Raster::CHANNELS;
    let mut output = Vec::with_capacity(row_bytes * out_height as usize);

    // Copy pixel data row by row for efficiency
    for y in clip.top..clip.bottom {
        let row = image.row(y as u32);
        let start = clip.left as usize * Raster::CHANNELS;
        output.extend_from_slice(&row[start..start + row_bytes]);
    }

    Some(Raster::new(out_width, out_height, output))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
