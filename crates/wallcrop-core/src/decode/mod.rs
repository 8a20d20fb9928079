//! Decoding for the crop pipeline.
//!
//! This module provides functionality for:
//! - Probing image dimensions from the header only
//! - Decoding a single rectangle of a PNG by streaming rows (region path)
//! - Decoding a whole JPEG or PNG (fallback path)
//! - Integer box downsampling shared by both paths
//!
//! # Memory Strategy
//!
//! Source images can be far larger than the requested output (a camera photo
//! cropped down to a screen-sized background). Decoding uses two tiers:
//! - **Region path**: only the crop rectangle is kept, downsampled while rows
//!   stream in, so memory is bounded by the output
//! - **Fallback path**: the whole image is decoded, downsampled and cropped in
//!   memory; used when no region decoder exists for the format
//!
//! Every entry point consumes the stream it is given. Reopen the source
//! before each call.

mod downsample;
mod full;
mod region;
mod types;

pub use downsample::{downsample, downsample_factor, downsampled_len, BoxDownsampler};
pub use full::{decode_full, probe_bounds};
pub use region::{open_region_decoder, PngRegionDecoder, RegionDecoder};
pub use types::{DecodeError, DecodePath, DecodedRegion, ImageBounds, Raster};
