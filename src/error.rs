//! Error types for metmasker.
//!
//! Decoding and classification failures are kept in separate closed enums so
//! library callers can match on exactly what went wrong. [`MaskerError`] wraps
//! both, attaching the file that caused the failure, for the file-level
//! pipeline and the command-line tool.

use std::path::PathBuf;
use thiserror::Error;

use crate::raster::{Geometry, PixelLayout};

/// Which part of a PNG stream was being read when decoding failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStage {
    /// Chunks up to and including IHDR
    Header,
    /// Compressed image data
    Pixels,
}

impl std::fmt::Display for ReadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadStage::Header => f.write_str("header"),
            ReadStage::Pixels => f.write_str("pixel data"),
        }
    }
}

/// Failures turning a file into a [`Raster`](crate::raster::Raster).
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The file is missing or unreadable
    #[error("Error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file does not start with the PNG signature
    #[error("File at {} was not of type PNG", .path.display())]
    NotRecognizedFormat { path: PathBuf },

    /// Declared width, height or bit depth differs from the expected geometry
    #[error(
        "Image has incorrect size/bit-depth: {} is {width}x{height}@{bit_depth}bit, expected {expected}",
        .path.display()
    )]
    GeometryMismatch {
        path: PathBuf,
        expected: Geometry,
        width: usize,
        height: usize,
        bit_depth: u8,
    },

    /// The PNG color type is not one of gray, gray+alpha, RGB or RGBA
    #[error("Image has unrecognized color type {color_type}: {}", .path.display())]
    UnsupportedColorType { path: PathBuf, color_type: u8 },

    /// The pixel buffer could not be reserved
    #[error("Memory error allocating {bytes} bytes while processing {}", .path.display())]
    AllocationFailure { path: PathBuf, bytes: usize },

    /// The PNG stream was corrupt or truncated
    #[error("Error reading {stage} of {}: {source}", .path.display())]
    MidReadFailure {
        path: PathBuf,
        stage: ReadStage,
        #[source]
        source: png::DecodingError,
    },
}

impl DecodeError {
    /// The file this error refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            DecodeError::Io { path, .. }
            | DecodeError::NotRecognizedFormat { path }
            | DecodeError::GeometryMismatch { path, .. }
            | DecodeError::UnsupportedColorType { path, .. }
            | DecodeError::AllocationFailure { path, .. }
            | DecodeError::MidReadFailure { path, .. } => path,
        }
    }
}

/// Failures classifying or aggregating decoded rasters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifyError {
    /// At least one pixel is outside the met color palette
    #[error(
        "Image has unrecognized met-office color {pixel:?} at ({x}, {y}); {count} pixel(s) not in palette"
    )]
    UnrecognizedColor {
        /// Column of the first offending pixel in scan order
        x: usize,
        /// Row of the first offending pixel in scan order
        y: usize,
        /// RGBA bytes of the first offending pixel
        pixel: [u8; 4],
        /// Total number of offending pixels
        count: usize,
    },

    /// The raster has the wrong pixel layout for this operation
    #[error("Image has unsupported color type: expected {expected}, found {found}")]
    UnsupportedColorType {
        expected: PixelLayout,
        found: PixelLayout,
    },

    /// The data raster and the mask differ in size
    #[error("Image is {raster} but mask is {mask}")]
    GeometryMismatch { raster: Geometry, mask: Geometry },
}

/// The main error type for file-level metmasker operations.
#[derive(Error, Debug)]
pub enum MaskerError {
    /// Decoding an input file failed
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Classification or aggregation of a decoded file failed
    #[error("{source} in {}", .path.display())]
    Classify {
        path: PathBuf,
        #[source]
        source: ClassifyError,
    },

    /// Writing an output file failed
    #[error("Error writing to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO errors outside of raster decoding
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MaskerError {
    /// Attach the offending file to a classification error
    pub fn classify(path: impl Into<PathBuf>, source: ClassifyError) -> Self {
        MaskerError::Classify {
            path: path.into(),
            source,
        }
    }
}

/// Convenience type alias for Results with MaskerError
pub type Result<T> = std::result::Result<T, MaskerError>;
