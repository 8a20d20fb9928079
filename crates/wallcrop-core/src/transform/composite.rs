//! Rotate and scale a decoded region into the output buffer.
//!
//! # Algorithm
//!
//! The forward transform maps region pixels onto the output. With a
//! rotation it is built in this fixed order:
//!
//! ```text
//! translate(-w/2, -h/2)        region center to origin
//! rotate(r)                    clockwise on screen
//! translate(rw/2, rh/2)        into the rotated extent (rw, rh)
//! fill(extent -> output)       independent X/Y scale
//! ```
//!
//! Fitting the unrotated box straight into the output would scale the wrong
//! axes. Rasterization uses inverse mapping: every output pixel center is
//! taken back through the inverted transform and the region is sampled
//! bilinearly there.

use crate::decode::Raster;
use crate::geometry::{Affine, RectF};

use super::resolve::rotated_extent;

/// Output size and forward transform for one compositing pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition {
    pub width: u32,
    pub height: u32,
    /// Maps region coordinates to output coordinates.
    pub transform: Affine,
}

/// Work out how a `region_width x region_height` region becomes the output.
///
/// An output size of 0 in either dimension means "derive it": with a
/// rotation the output is the region's rotated extent.
///
/// # Returns
///
/// `None` when nothing needs compositing (no rotation and no explicit output
/// size), in which case the region itself is the output.
pub fn plan_composition(
    region_width: u32,
    region_height: u32,
    rotation: i32,
    output_width: u32,
    output_height: u32,
) -> Option<Composition> {
    let explicit_size = output_width > 0 && output_height > 0;
    if !explicit_size && rotation <= 0 {
        return None;
    }

    let (w, h) = (f64::from(region_width), f64::from(region_height));
    let (rotated_w, rotated_h) = rotated_extent(w, h, rotation);

    let (width, height) = if explicit_size {
        (output_width, output_height)
    } else {
        (rotated_w.round() as u32, rotated_h.round() as u32)
    };

    let extent = RectF::new(0.0, 0.0, rotated_w, rotated_h);
    let output = RectF::new(0.0, 0.0, f64::from(width), f64::from(height));
    // A collapsed extent gets a singular plan, which `composite` rejects.
    let fit = Affine::rect_to_rect_fill(extent, output).unwrap_or(Affine::scale(0.0, 0.0));

    let transform = if rotation == 0 {
        fit
    } else {
        Affine::translate(-w / 2.0, -h / 2.0)
            .then(&Affine::rotate(f64::from(rotation)))
            .then(&Affine::translate(rotated_w / 2.0, rotated_h / 2.0))
            .then(&fit)
    };

    Some(Composition {
        width,
        height,
        transform,
    })
}

/// Rasterize `region` through `plan` into a fresh output buffer.
///
/// Output pixels whose centers fall outside the region stay transparent.
///
/// # Returns
///
/// `None` if the transform cannot be inverted (zero-sized output).
pub fn composite(region: &Raster, plan: &Composition) -> Option<Raster> {
    let inverse = plan.transform.invert()?;
    let mut output = Raster::transparent(plan.width, plan.height);
    if region.is_empty() {
        return Some(output);
    }

    let (src_w, src_h) = (f64::from(region.width), f64::from(region.height));
    for dst_y in 0..plan.height {
        for dst_x in 0..plan.width {
            let (sx, sy) = inverse.map_point(f64::from(dst_x) + 0.5, f64::from(dst_y) + 0.5);
            if sx < 0.0 || sy < 0.0 || sx >= src_w || sy >= src_h {
                continue;
            }

            let pixel = sample_bilinear(region, sx, sy);
            let idx = (dst_y as usize * plan.width as usize + dst_x as usize) * Raster::CHANNELS;
            output.pixels[idx..idx + Raster::CHANNELS].copy_from_slice(&pixel);
        }
    }

    Some(output)
}

/// Sample a pixel using bilinear interpolation.
///
/// `(x, y)` is a continuous position inside the region; pixel centers sit at
/// half-integer coordinates. Neighbours past the edge are clamped.
fn sample_bilinear(image: &Raster, x: f64, y: f64) -> [u8; 4] {
    let u = x - 0.5;
    let v = y - 0.5;
    let x0f = u.floor();
    let y0f = v.floor();

    // Fractional distances
    let fx = u - x0f;
    let fy = v - y0f;

    let max_x = i64::from(image.width) - 1;
    let max_y = i64::from(image.height) - 1;
    let x0 = (x0f as i64).clamp(0, max_x) as u32;
    let x1 = (x0f as i64 + 1).clamp(0, max_x) as u32;
    let y0 = (y0f as i64).clamp(0, max_y) as u32;
    let y1 = (y0f as i64 + 1).clamp(0, max_y) as u32;

    let p00 = image.pixel(x0, y0);
    let p10 = image.pixel(x1, y0);
    let p01 = image.pixel(x0, y1);
    let p11 = image.pixel(x1, y1);

    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = f64::from(p00[i]) * (1.0 - fx) * (1.0 - fy)
            + f64::from(p10[i]) * fx * (1.0 - fy)
            + f64::from(p01[i]) * (1.0 - fx) * fy
            + f64::from(p11[i]) * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_images::pattern_raster;

    #[test]
    fn test_no_size_no_rotation_skips() {
        assert!(plan_composition(100, 200, 0, 0, 0).is_none());
        assert!(plan_composition(100, 200, 0, 50, 0).is_none());
    }

    #[test]
    fn test_derived_size_swaps_for_quarter_turn() {
        let plan = plan_composition(100, 200, 90, 0, 0).unwrap();
        assert_eq!((plan.width, plan.height), (200, 100));

        let plan = plan_composition(100, 200, 180, 0, 0).unwrap();
        assert_eq!((plan.width, plan.height), (100, 200));
    }

    #[test]
    fn test_derived_size_uses_rotated_vector() {
        // |rotate(60) * (100, 50)| = (|50 - 43.3|, |86.6 + 25|)
        let plan = plan_composition(100, 50, 60, 0, 0).unwrap();
        assert_eq!((plan.width, plan.height), (7, 112));
    }

    #[test]
    fn test_square_at_45_degrees_with_derived_size_cannot_composite() {
        // The rotated (10, 10) vector has an x component of (almost) zero.
        let plan = plan_composition(10, 10, 45, 0, 0).unwrap();
        assert_eq!(plan.width, 0);
        assert!(composite(&pattern_raster(10, 10), &plan).is_none());
    }

    #[test]
    fn test_square_at_45_degrees_with_explicit_size_is_squeezed() {
        // A near-zero but non-zero extent still inverts, so an explicit size
        // is honored even though the region collapses to a sliver.
        let plan = plan_composition(10, 10, 45, 30, 20).unwrap();
        assert_eq!((plan.width, plan.height), (30, 20));
        let out = composite(&pattern_raster(10, 10), &plan).unwrap();
        assert_eq!((out.width, out.height), (30, 20));
    }

    #[test]
    fn test_explicit_size_wins() {
        let plan = plan_composition(100, 200, 90, 40, 20).unwrap();
        assert_eq!((plan.width, plan.height), (40, 20));
        // Region top-left goes to the output's top-right corner.
        let (x, y) = plan.transform.map_point(0.0, 0.0);
        assert!((x - 40.0).abs() < 1e-9 && y.abs() < 1e-9);
    }

    #[test]
    fn test_identity_composite() {
        let img = pattern_raster(12, 9);
        let plan = plan_composition(12, 9, 0, 12, 9).unwrap();
        assert_eq!(composite(&img, &plan).unwrap(), img);
    }

    #[test]
    fn test_rotate_90_moves_pixels_clockwise() {
        let img = pattern_raster(4, 3);
        let plan = plan_composition(4, 3, 90, 0, 0).unwrap();
        let out = composite(&img, &plan).unwrap();

        assert_eq!((out.width, out.height), (3, 4));
        // Source (x, y) lands at (h - 1 - y, x).
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(out.pixel(2 - y, x), img.pixel(x, y));
            }
        }
    }

    #[test]
    fn test_rotate_180_and_270() {
        let img = pattern_raster(5, 2);

        let out = composite(&img, &plan_composition(5, 2, 180, 0, 0).unwrap()).unwrap();
        assert_eq!(out.pixel(4, 1), img.pixel(0, 0));
        assert_eq!(out.pixel(0, 0), img.pixel(4, 1));

        let out = composite(&img, &plan_composition(5, 2, 270, 0, 0).unwrap()).unwrap();
        assert_eq!((out.width, out.height), (2, 5));
        // Counter-clockwise quarter: source (x, y) lands at (y, w - 1 - x).
        assert_eq!(out.pixel(0, 4), img.pixel(0, 0));
        assert_eq!(out.pixel(1, 0), img.pixel(4, 1));
    }

    #[test]
    fn test_downscale_by_two_interpolates() {
        // 2x1 black/white pair shrinks to one mid-gray pixel.
        let img = Raster::new(2, 1, vec![0, 0, 0, 255, 200, 200, 200, 255]);
        let plan = plan_composition(2, 1, 0, 1, 1).unwrap();
        let out = composite(&img, &plan).unwrap();
        assert_eq!(out.pixel(0, 0), [100, 100, 100, 255]);
    }

    #[test]
    fn test_upscale_keeps_flat_color() {
        let img = Raster::new(1, 1, vec![10, 20, 30, 255]);
        let plan = plan_composition(1, 1, 0, 3, 2).unwrap();
        let out = composite(&img, &plan).unwrap();
        assert!(out.pixels.chunks(4).all(|p| p == [10, 20, 30, 255]));
    }

    #[test]
    fn test_uncovered_output_stays_transparent() {
        // Explicit output with a different aspect: every pixel is covered.
        let img = Raster::new(2, 2, [255u8; 4].repeat(4));
        let plan = plan_composition(2, 2, 90, 4, 2).unwrap();
        let out = composite(&img, &plan).unwrap();
        assert!(out.pixels.chunks(4).all(|p| p == [255, 255, 255, 255]));

        // Shifting the transform moves part of the output off the region.
        let shifted = Composition {
            transform: plan.transform.then(&Affine::translate(1.0, 0.0)),
            ..plan
        };
        let out = composite(&img, &shifted).unwrap();
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(out.pixel(1, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_singular_transform_fails() {
        let img = pattern_raster(2, 2);
        let plan = Composition {
            width: 2,
            height: 2,
            transform: Affine::scale(0.0, 1.0),
        };
        assert!(composite(&img, &plan).is_none());
    }

    #[test]
    fn test_sample_bilinear_at_centers_is_exact() {
        let img = pattern_raster(3, 3);
        assert_eq!(sample_bilinear(&img, 1.5, 2.5), img.pixel(1, 2));
        assert_eq!(sample_bilinear(&img, 0.0, 0.0), img.pixel(0, 0));
    }
}
