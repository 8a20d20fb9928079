//! Integer downsampling shared by the region and full-image decode paths.
//!
//! Pixels are averaged in `factor x factor` blocks anchored at the top-left
//! of whatever is fed in. Trailing blocks that hang over the right or bottom
//! edge average only the pixels they cover, so the output is
//! `ceil(width / factor) x ceil(height / factor)` and no source pixel is lost.
//!
//! Both decode paths feed rows through the same [`BoxDownsampler`]; when the
//! crop's left/top edges are multiples of the factor the two paths produce
//! identical pixels.

use super::Raster;

/// Compute how much a crop can be downsampled while decoding.
///
/// Returns `floor(min(crop_w / out_w, crop_h / out_h))`. A derived output size
/// (either dimension 0) or an upscaling request yields 1, meaning no
/// downsampling.
pub fn downsample_factor(crop_width: i32, crop_height: i32, out_width: u32, out_height: u32) -> u32 {
    if out_width == 0 || out_height == 0 || crop_width <= 0 || crop_height <= 0 {
        return 1;
    }
    let fx = crop_width as u32 / out_width;
    let fy = crop_height as u32 / out_height;
    fx.min(fy).max(1)
}

/// Output length along one axis for a given factor.
#[inline]
pub fn downsampled_len(len: u32, factor: u32) -> u32 {
    len.div_ceil(factor.max(1))
}

/// Streaming box filter: push RGBA rows in, get a downsampled raster out.
pub struct BoxDownsampler {
    factor: u32,
    src_width: u32,
    out_width: u32,
    /// Per output column channel sums for the block row being accumulated.
    sums: Vec<u64>,
    rows_in_block: u32,
    out_rows: u32,
    pixels: Vec<u8>,
}

impl BoxDownsampler {
    pub fn new(src_width: u32, factor: u32) -> Self {
        let factor = factor.max(1);
        let out_width = downsampled_len(src_width, factor);
        Self {
            factor,
            src_width,
            out_width,
            sums: vec![0; out_width as usize * Raster::CHANNELS],
            rows_in_block: 0,
            out_rows: 0,
            pixels: Vec::new(),
        }
    }

    /// Add one source row of `src_width` RGBA pixels.
    pub fn push_row(&mut self, row: &[u8]) {
        debug_assert_eq!(row.len(), self.src_width as usize * Raster::CHANNELS);

        if self.factor == 1 {
            self.pixels.extend_from_slice(row);
            self.out_rows += 1;
            return;
        }

        let factor = self.factor as usize;
        for (x, px) in row.chunks_exact(Raster::CHANNELS).enumerate() {
            let base = (x / factor) * Raster::CHANNELS;
            for (c, &v) in px.iter().enumerate() {
                self.sums[base + c] += u64::from(v);
            }
        }

        self.rows_in_block += 1;
        if self.rows_in_block == self.factor {
            self.flush_block_row();
        }
    }

    fn flush_block_row(&mut self) {
        let factor = self.factor as usize;
        let src_width = self.src_width as usize;
        for bx in 0..self.out_width as usize {
            let cols = (src_width - bx * factor).min(factor) as u64;
            let count = cols * u64::from(self.rows_in_block);
            for c in 0..Raster::CHANNELS {
                let sum = &mut self.sums[bx * Raster::CHANNELS + c];
                self.pixels.push(((*sum + count / 2) / count) as u8);
                *sum = 0;
            }
        }
        self.rows_in_block = 0;
        self.out_rows += 1;
    }

    pub fn finish(mut self) -> Raster {
        if self.rows_in_block > 0 {
            self.flush_block_row();
        }
        Raster::new(self.out_width, self.out_rows, self.pixels)
    }
}

/// Downsample a fully decoded raster by an integer factor.
pub fn downsample(raster: Raster, factor: u32) -> Raster {
    if factor <= 1 {
        return raster;
    }
    let mut sampler = BoxDownsampler::new(raster.width, factor);
    for y in 0..raster.height {
        sampler.push_row(raster.row(y));
    }
    sampler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_raster(width: u32, height: u32, value: impl Fn(u32, u32) -> u8) -> Raster {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = value(x, y);
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Raster::new(width, height, pixels)
    }

    #[test]
    fn test_factor_downscale() {
        assert_eq!(downsample_factor(4000, 3000, 1000, 500), 4);
        assert_eq!(downsample_factor(4000, 3000, 1000, 1000), 3);
    }

    #[test]
    fn test_factor_upscale_is_one() {
        assert_eq!(downsample_factor(100, 100, 400, 400), 1);
        assert_eq!(downsample_factor(399, 1000, 400, 400), 1);
    }

    #[test]
    fn test_factor_derived_output_is_one() {
        assert_eq!(downsample_factor(4000, 3000, 0, 0), 1);
        assert_eq!(downsample_factor(4000, 3000, 100, 0), 1);
    }

    #[test]
    fn test_factor_one_is_identity() {
        let img = gray_raster(7, 5, |x, y| (x * 10 + y) as u8);
        assert_eq!(downsample(img.clone(), 1), img);
    }

    #[test]
    fn test_exact_blocks_average() {
        // 4x2 with two 2x2 blocks: [0, 10 / 20, 30] and [100, 100 / 100, 100]
        let img = gray_raster(4, 2, |x, y| match (x / 2, x % 2, y) {
            (0, 0, 0) => 0,
            (0, 1, 0) => 10,
            (0, 0, 1) => 20,
            (0, 1, 1) => 30,
            _ => 100,
        });
        let out = downsample(img, 2);
        assert_eq!((out.width, out.height), (2, 1));
        assert_eq!(out.pixel(0, 0), [15, 15, 15, 255]);
        assert_eq!(out.pixel(1, 0), [100, 100, 100, 255]);
    }

    #[test]
    fn test_partial_trailing_blocks() {
        let img = gray_raster(5, 3, |x, _| if x == 4 { 200 } else { 0 });
        let out = downsample(img, 2);
        assert_eq!((out.width, out.height), (3, 2));
        // Last column block is 1 pixel wide and keeps its value.
        assert_eq!(out.pixel(2, 0), [200, 200, 200, 255]);
        assert_eq!(out.pixel(2, 1), [200, 200, 200, 255]);
        assert_eq!(out.pixel(0, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn test_streaming_matches_batch() {
        let img = gray_raster(9, 7, |x, y| (x * 13 + y * 7) as u8);
        let mut sampler = BoxDownsampler::new(9, 3);
        for y in 0..7 {
            sampler.push_row(img.row(y));
        }
        assert_eq!(sampler.finish(), downsample(img, 3));
    }

    #[test]
    fn test_downsampled_len() {
        assert_eq!(downsampled_len(10, 3), 4);
        assert_eq!(downsampled_len(9, 3), 3);
        assert_eq!(downsampled_len(9, 0), 9);
    }
}
