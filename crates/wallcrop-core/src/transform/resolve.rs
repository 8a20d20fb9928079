//! Map a crop drawn on the rotated (displayed) image back to source pixels.
//!
//! The crop is applied in source space and the rotation only happens during
//! compositing, so pixels are never rotated twice. For a rotation `r`:
//!
//! ```text
//! extent = |rotate(r) * (w, h)|           rotated image size
//! crop'  = crop - extent / 2              center on the rotation origin
//! crop'' = bbox(rotate(-r) * crop')       undo the rotation
//! native = crop'' + (w, h) / 2            back to source pixel space
//! ```

use crate::decode::ImageBounds;
use crate::error::CropError;
use crate::geometry::{Affine, Rect, RectF};

/// Largest edge magnitude a crop may have; any pixel width between two such
/// edges fits in an `i32`.
const MAX_EDGE: f64 = 536_870_912.0;

/// Axis-aligned size of a `width x height` box after rotating it.
///
/// Rotates the vector `(width, height)` and takes absolute values, which is
/// exact for quarter turns.
pub fn rotated_extent(width: f64, height: f64, rotation: i32) -> (f64, f64) {
    let (x, y) = Affine::rotate(f64::from(rotation)).map_vector(width, height);
    (x.abs(), y.abs())
}

/// Compute the crop rectangle in the source's native coordinate space.
///
/// `bounds` is only called when `rotation > 0`; it should probe the source
/// header on a fresh stream.
///
/// # Errors
///
/// Propagates the error from `bounds`, and returns
/// `CropError::InvalidCropBounds` if an edge is not finite, lies too far from
/// the origin to address a pixel, or the rounded rectangle has no area.
pub fn resolve_native_crop<F>(crop: RectF, rotation: i32, bounds: F) -> Result<Rect, CropError>
where
    F: FnOnce() -> Result<ImageBounds, CropError>,
{
    let mut crop = crop;

    if rotation > 0 {
        crop = checked_round_out(&crop)?.to_rect_f();

        let ImageBounds { width, height } = bounds()?;
        let (w, h) = (f64::from(width), f64::from(height));
        let (rotated_w, rotated_h) = rotated_extent(w, h, rotation);

        let centered = crop.offset(-rotated_w / 2.0, -rotated_h / 2.0);
        let unrotated = Affine::rotate(-f64::from(rotation)).map_rect(&centered);
        crop = unrotated.offset(w / 2.0, h / 2.0);
    }

    let rounded = checked_round_out(&crop)?;
    if rounded.width() <= 0 || rounded.height() <= 0 {
        return Err(CropError::invalid_bounds(rounded));
    }

    Ok(rounded)
}

fn checked_round_out(crop: &RectF) -> Result<Rect, CropError> {
    let rounded = crop.round_out();
    let edges = [crop.left, crop.top, crop.right, crop.bottom];
    if edges.iter().any(|e| !e.is_finite() || e.abs() > MAX_EDGE) {
        return Err(CropError::invalid_bounds(rounded));
    }
    Ok(rounded)
}
