//! Output encoding for the crop pipeline.
//!
//! This module provides functionality for:
//! - Choosing the output format from a request's format tag
//! - Encoding the composited buffer to JPEG (configurable quality) or PNG
//!
//! # Examples
//!
//! ```ignore
//! use wallcrop_core::encode::{encode_raster, OutputFormat};
//!
//! let encoded = encode_raster(&raster, OutputFormat::for_request(Some("png")), 90)?;
//! println!("Encoded {} bytes as {}", encoded.bytes.len(), encoded.format);
//! ```

mod encoder;
mod format;

pub use encoder::{encode_raster, EncodeError, EncodedImage};
pub use format::{get_file_extension, OutputFormat, DEFAULT_COMPRESS_QUALITY};
