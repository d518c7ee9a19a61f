//! PNG decoding and encoding.
//!
//! Decoding validates the header against the expected [`Geometry`] before any
//! pixel data is inflated, so a mismatched file is rejected without
//! allocating a frame buffer. Rasters are only handed out fully populated.

use std::io::Cursor;
use std::path::Path;

use crate::error::{DecodeError, MaskerError, ReadStage, Result};
use crate::raster::{Geometry, PixelLayout, Raster};

/// The eight bytes every PNG file starts with
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Read and decode a PNG file.
pub fn decode(path: &Path, geometry: &Geometry) -> std::result::Result<Raster, DecodeError> {
    let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_bytes(&bytes, geometry, path)
}

/// Decode an in-memory PNG stream. `path` is only used to label errors.
pub fn decode_bytes(
    bytes: &[u8],
    geometry: &Geometry,
    path: &Path,
) -> std::result::Result<Raster, DecodeError> {
    if !bytes.starts_with(&PNG_SIGNATURE) {
        return Err(DecodeError::NotRecognizedFormat {
            path: path.to_path_buf(),
        });
    }

    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder
        .read_info()
        .map_err(|source| DecodeError::MidReadFailure {
            path: path.to_path_buf(),
            stage: ReadStage::Header,
            source,
        })?;

    let (width, height, bit_depth, color_type) = {
        let info = reader.info();
        (
            info.width as usize,
            info.height as usize,
            info.bit_depth as u8,
            info.color_type,
        )
    };

    if width != geometry.width || height != geometry.height || bit_depth != geometry.bit_depth {
        return Err(DecodeError::GeometryMismatch {
            path: path.to_path_buf(),
            expected: *geometry,
            width,
            height,
            bit_depth,
        });
    }

    let layout = PixelLayout::from_color_type_tag(color_type as u8).ok_or_else(|| {
        DecodeError::UnsupportedColorType {
            path: path.to_path_buf(),
            color_type: color_type as u8,
        }
    })?;

    let frame_bytes = geometry.frame_bytes(layout);
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(frame_bytes)
        .map_err(|_| DecodeError::AllocationFailure {
            path: path.to_path_buf(),
            bytes: frame_bytes,
        })?;
    pixels.resize(frame_bytes, 0);

    reader
        .next_frame(&mut pixels)
        .map_err(|source| DecodeError::MidReadFailure {
            path: path.to_path_buf(),
            stage: ReadStage::Pixels,
            source,
        })?;

    Raster::from_raw(*geometry, layout, pixels).ok_or_else(|| DecodeError::AllocationFailure {
        path: path.to_path_buf(),
        bytes: frame_bytes,
    })
}

/// Write a raster as an 8-bit PNG with the color type matching its layout.
pub fn encode(raster: &Raster, path: &Path) -> Result<()> {
    let color = match raster.layout() {
        PixelLayout::Gray => image::ColorType::L8,
        PixelLayout::GrayAlpha => image::ColorType::La8,
        PixelLayout::Rgb => image::ColorType::Rgb8,
        PixelLayout::Rgba => image::ColorType::Rgba8,
    };

    image::save_buffer_with_format(
        path,
        raster.as_bytes(),
        raster.width() as u32,
        raster.height() as u32,
        color,
        image::ImageFormat::Png,
    )
    .map_err(|source| MaskerError::Write {
        path: path.to_path_buf(),
        source,
    })
}
