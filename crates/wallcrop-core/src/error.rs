//! Pipeline-level errors.
//!
//! Every failure is terminal for the one request that hit it. Nothing here
//! is retried internally; callers resubmit a fresh request if they want to.

use std::io;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::geometry::Rect;

/// Why a crop request failed.
#[derive(Debug, Error)]
pub enum CropError {
    /// The source stream could not be opened.
    #[error("Cannot open source image: {0}")]
    SourceUnavailable(#[source] io::Error),

    /// The crop rounds to a rectangle with no area.
    #[error("Crop has bad bounds {left},{top} - {right},{bottom} for the full size image")]
    InvalidCropBounds {
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    },

    /// Neither region decoding nor full decoding produced pixels.
    #[error("Cannot decode source image: {0}")]
    DecodeFailure(String),

    /// The output buffer could not be compressed.
    #[error("Cannot compress output image: {0}")]
    EncodeFailure(String),

    /// The output sink rejected the bytes.
    #[error("Cannot write output image: {0}")]
    SinkWriteFailure(#[source] io::Error),

    /// The worker running the request panicked.
    #[error("Crop worker panicked: {0}")]
    Panicked(String),

    /// No worker thread could be started for the request.
    #[error("Cannot start crop worker: {0}")]
    WorkerUnavailable(#[source] io::Error),
}

/// Stable, payload-free tag for a [`CropError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SourceUnavailable,
    InvalidCropBounds,
    DecodeFailure,
    EncodeFailure,
    SinkWriteFailure,
    Panicked,
    WorkerUnavailable,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::SourceUnavailable => "SourceUnavailable",
            ErrorKind::InvalidCropBounds => "InvalidCropBounds",
            ErrorKind::DecodeFailure => "DecodeFailure",
            ErrorKind::EncodeFailure => "EncodeFailure",
            ErrorKind::SinkWriteFailure => "SinkWriteFailure",
            ErrorKind::Panicked => "Panicked",
            ErrorKind::WorkerUnavailable => "WorkerUnavailable",
        }
    }
}

impl CropError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CropError::SourceUnavailable(_) => ErrorKind::SourceUnavailable,
            CropError::InvalidCropBounds { .. } => ErrorKind::InvalidCropBounds,
            CropError::DecodeFailure(_) => ErrorKind::DecodeFailure,
            CropError::EncodeFailure(_) => ErrorKind::EncodeFailure,
            CropError::SinkWriteFailure(_) => ErrorKind::SinkWriteFailure,
            CropError::Panicked(_) => ErrorKind::Panicked,
            CropError::WorkerUnavailable(_) => ErrorKind::WorkerUnavailable,
        }
    }

    pub(crate) fn invalid_bounds(rect: Rect) -> Self {
        CropError::InvalidCropBounds {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        }
    }
}

impl From<DecodeError> for CropError {
    fn from(err: DecodeError) -> Self {
        CropError::DecodeFailure(err.to_string())
    }
}

impl From<EncodeError> for CropError {
    fn from(err: EncodeError) -> Self {
        CropError::EncodeFailure(err.to_string())
    }
}
