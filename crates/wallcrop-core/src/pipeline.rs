//! The crop pipeline.
//!
//! One call to [`CropPipeline::run`] takes a request through these states:
//!
//! ```text
//! Init -> StreamAcquired -> NoCropShortcut ------------------------> Delivered
//!                        \-> BoundsResolved -> RegionDecoded
//!                              -> Composited -> Encoded -> (Delivered | done)
//! ```
//!
//! Any state can end in a failure, which is returned and logged. The
//! pipeline keeps no state between calls.

use std::io::Cursor;

use crate::decode::{
    decode_full, downsample_factor, open_region_decoder, probe_bounds, DecodePath, DecodedRegion,
    Raster,
};
use crate::encode::{encode_raster, EncodedImage};
use crate::error::CropError;
use crate::geometry::Rect;
use crate::request::{CropRequest, PipelineOptions};
use crate::sink::WallpaperSink;
use crate::source::{SourceRef, SourceResolver, SourceStream};
use crate::transform::{composite, crop_raster, plan_composition, resolve_native_crop};

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CropOutcome {
    /// The source was cropped and re-encoded.
    Cropped {
        encoded: EncodedImage,
        /// Uncompressed output, when the request asked to keep it
        retained: Option<Raster>,
        /// Whether the encoded bytes were handed to the sink
        delivered: bool,
    },
    /// The source bytes went to the sink unchanged.
    PassedThrough { bytes_written: u64 },
}

impl CropOutcome {
    pub fn encoded(&self) -> Option<&EncodedImage> {
        match self {
            CropOutcome::Cropped { encoded, .. } => Some(encoded),
            CropOutcome::PassedThrough { .. } => None,
        }
    }

    pub fn retained(&self) -> Option<&Raster> {
        match self {
            CropOutcome::Cropped { retained, .. } => retained.as_ref(),
            CropOutcome::PassedThrough { .. } => None,
        }
    }

    pub fn into_encoded(self) -> Option<EncodedImage> {
        match self {
            CropOutcome::Cropped { encoded, .. } => Some(encoded),
            CropOutcome::PassedThrough { .. } => None,
        }
    }

    pub fn delivered(&self) -> bool {
        match self {
            CropOutcome::Cropped { delivered, .. } => *delivered,
            CropOutcome::PassedThrough { .. } => true,
        }
    }
}

/// Crops, rotates, scales and encodes source images.
#[derive(Debug, Clone, Default)]
pub struct CropPipeline<R> {
    resolver: R,
    options: PipelineOptions,
}

impl<R: SourceResolver> CropPipeline<R> {
    pub fn new(resolver: R) -> Self {
        Self::with_options(resolver, PipelineOptions::default())
    }

    pub fn with_options(resolver: R, options: PipelineOptions) -> Self {
        Self { resolver, options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Run one request against `source`.
    ///
    /// The sink is only written when `request.apply_as_background` is set.
    ///
    /// # Errors
    ///
    /// Every failure is terminal for this request; see [`CropError`].
    pub fn run(
        &self,
        source: &SourceRef,
        request: &CropRequest,
        sink: &mut dyn WallpaperSink,
    ) -> Result<CropOutcome, CropError> {
        let result = self.run_request(source, request, sink);
        if let Err(err) = &result {
            log::warn!("Crop of {} failed [{}]: {}", source, err.kind().as_str(), err);
        }
        result
    }

    fn run_request(
        &self,
        source: &SourceRef,
        request: &CropRequest,
        sink: &mut dyn WallpaperSink,
    ) -> Result<CropOutcome, CropError> {
        let rotation = request.normalized_rotation();
        let mut stream = Some(self.open(source)?);
        log::trace!("Opened {}", source);

        if request.skip_crop && request.apply_as_background {
            let mut raw = self.take_or_open(&mut stream, source)?;
            let bytes_written = sink.accept(&mut raw).map_err(CropError::SinkWriteFailure)?;
            log::debug!("Passed {} bytes of {} through uncropped", bytes_written, source);
            return Ok(CropOutcome::PassedThrough { bytes_written });
        }

        let crop = resolve_native_crop(request.crop, rotation, || {
            let probe = self.take_or_open(&mut stream, source)?;
            probe_bounds(probe).map_err(CropError::from)
        })?;
        log::debug!(
            "Resolved crop {:?} (rotation {}) to native {:?}",
            request.crop,
            rotation,
            crop
        );

        let factor = downsample_factor(
            crop.width(),
            crop.height(),
            request.output_width,
            request.output_height,
        );
        let region = self.decode_region(source, stream, crop, factor)?;
        log::debug!(
            "Decoded {}x{} region via {:?} at 1/{}",
            region.raster.width,
            region.raster.height,
            region.path,
            region.sample_size
        );

        let output = match plan_composition(
            region.raster.width,
            region.raster.height,
            rotation,
            request.output_width,
            request.output_height,
        ) {
            Some(plan) => composite(&region.raster, &plan).ok_or_else(|| {
                CropError::EncodeFailure(format!(
                    "cannot map a {}x{} region into {}x{}",
                    region.raster.width, region.raster.height, plan.width, plan.height
                ))
            })?,
            None => region.raster,
        };
        log::trace!("Composited output {}x{}", output.width, output.height);

        let encoded = encode_raster(&output, request.format(), request.compression_quality)?;
        log::debug!(
            "Encoded {}x{} {} ({} bytes)",
            encoded.width,
            encoded.height,
            encoded.format,
            encoded.bytes.len()
        );

        let mut delivered = false;
        if request.apply_as_background {
            sink.accept(&mut Cursor::new(&encoded.bytes))
                .map_err(CropError::SinkWriteFailure)?;
            delivered = true;
            log::debug!("Delivered background image from {}", source);
        }

        Ok(CropOutcome::Cropped {
            encoded,
            retained: request.retain_output_buffer.then_some(output),
            delivered,
        })
    }

    /// Region decode first, full decode as the fallback.
    fn decode_region(
        &self,
        source: &SourceRef,
        mut stream: Option<SourceStream>,
        crop: Rect,
        factor: u32,
    ) -> Result<DecodedRegion, CropError> {
        if self.options.region_decoding {
            let region_stream = self.take_or_open(&mut stream, source)?;
            let decoded = open_region_decoder(region_stream)
                .and_then(|decoder| decoder.decode_region(crop, factor));
            match decoded {
                Ok(raster) => {
                    return Ok(DecodedRegion {
                        raster,
                        sample_size: factor,
                        path: DecodePath::Region,
                    })
                }
                Err(err) => log::debug!(
                    "Region decode of {} unavailable ({}), decoding full image",
                    source,
                    err
                ),
            }
        }

        let full_stream = self.take_or_open(&mut stream, source)?;
        let image = decode_full(full_stream, factor)?;
        let scaled = crop.to_rect_f().scale_down(factor).round_out();
        let raster = crop_raster(&image, scaled).ok_or_else(|| {
            CropError::DecodeFailure(format!(
                "crop {},{} - {},{} lies outside the {}x{} image",
                crop.left, crop.top, crop.right, crop.bottom, image.width, image.height
            ))
        })?;

        Ok(DecodedRegion {
            raster,
            sample_size: factor,
            path: DecodePath::FullImage,
        })
    }

    fn open(&self, source: &SourceRef) -> Result<SourceStream, CropError> {
        self.resolver.open(source).map_err(CropError::SourceUnavailable)
    }

    /// Use the stream opened at the start if it is still unused, otherwise
    /// open a fresh one. Each decode step consumes its stream.
    fn take_or_open(
        &self,
        slot: &mut Option<SourceStream>,
        source: &SourceRef,
    ) -> Result<SourceStream, CropError> {
        match slot.take() {
            Some(stream) => Ok(stream),
            None => self.open(source),
        }
    }
}
