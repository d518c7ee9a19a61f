//! Masked reductions and dense products over decoded rasters.
//!
//! Scalar totals only visit the mask's bounding box; grid and tensor products
//! cover the whole frame. Every function checks the raster's pixel layout and
//! that mask and raster share a size before touching any pixel.

use ndarray::{Array2, Array3};

use crate::classifier::{self, CHANNEL_COUNT, MM_PER_GRAY_LEVEL};
use crate::error::ClassifyError;
use crate::mask::Mask;
use crate::raster::{PixelLayout, Raster};

fn require_layout(raster: &Raster, expected: PixelLayout) -> Result<(), ClassifyError> {
    if raster.layout() != expected {
        return Err(ClassifyError::UnsupportedColorType {
            expected,
            found: raster.layout(),
        });
    }
    Ok(())
}

fn require_same_size(mask: &Mask, raster: &Raster) -> Result<(), ClassifyError> {
    let (m, r) = (mask.geometry(), raster.geometry());
    if m.width != r.width || m.height != r.height {
        return Err(ClassifyError::GeometryMismatch { raster: r, mask: m });
    }
    Ok(())
}

/// Tracks palette misses during a full scan.
#[derive(Debug, Default)]
pub(crate) struct Misses {
    first: Option<(usize, usize, [u8; 4])>,
    count: usize,
}

impl Misses {
    pub(crate) fn record(&mut self, x: usize, y: usize, pixel: [u8; 4]) {
        self.first.get_or_insert((x, y, pixel));
        self.count += 1;
    }

    /// `Ok(value)` if nothing was missed
    pub(crate) fn finish<T>(self, value: T) -> Result<T, ClassifyError> {
        match self.first {
            None => Ok(value),
            Some((x, y, pixel)) => Err(ClassifyError::UnrecognizedColor {
                x,
                y,
                pixel,
                count: self.count,
            }),
        }
    }
}

/// Total rainfall in millimetres over the mask, from an RGBA met image.
///
/// Every masked pixel in the bounding box is classified even after a miss;
/// any miss fails the whole call.
pub fn total_amount(mask: &Mask, raster: &Raster) -> Result<f32, ClassifyError> {
    require_layout(raster, PixelLayout::Rgba)?;
    require_same_size(mask, raster)?;

    let mut total = 0.0f32;
    let mut misses = Misses::default();
    for (x, y) in mask.scan() {
        let pixel = classifier::rgba(raster.pixel(x, y));
        match classifier::amount(pixel) {
            Ok(mm) => total += mm,
            Err(_) => misses.record(x, y, pixel),
        }
    }
    misses.finish(total)
}

/// Total rainfall in millimetres over the mask, from a grayscale image.
pub fn total_gray(mask: &Mask, raster: &Raster) -> Result<f32, ClassifyError> {
    require_layout(raster, PixelLayout::Gray)?;
    require_same_size(mask, raster)?;

    let levels: u64 = mask
        .scan()
        .map(|(x, y)| u64::from(raster.first_channel(x, y)))
        .sum();
    Ok(MM_PER_GRAY_LEVEL * levels as f32)
}

/// Millimetres per pixel over the whole frame, zero outside the mask.
///
/// Indexed `[y, x]`.
pub fn dense_grid(mask: &Mask, raster: &Raster) -> Result<Array2<f32>, ClassifyError> {
    require_layout(raster, PixelLayout::Gray)?;
    require_same_size(mask, raster)?;

    Ok(Array2::from_shape_fn(
        (raster.height(), raster.width()),
        |(y, x)| {
            if mask.is_set(x, y) {
                MM_PER_GRAY_LEVEL * f32::from(raster.first_channel(x, y))
            } else {
                0.0
            }
        },
    ))
}

/// One-hot rainfall categories over the whole frame.
///
/// Indexed `[channel, y, x]`. Masked pixels with a nonzero gray code get a 1.0
/// in the plane given by [`classifier::channel_index`]; everything else is 0.0.
pub fn channel_tensor(mask: &Mask, raster: &Raster) -> Result<Array3<f32>, ClassifyError> {
    require_layout(raster, PixelLayout::Gray)?;
    require_same_size(mask, raster)?;

    let mut tensor = Array3::zeros((CHANNEL_COUNT, raster.height(), raster.width()));
    for (y, row) in raster.rows().enumerate() {
        for (x, &gray) in row.iter().enumerate() {
            if gray == 0 || !mask.is_set(x, y) {
                continue;
            }
            tensor[[classifier::channel_index(gray), y, x]] = 1.0;
        }
    }
    Ok(tensor)
}

/// Millimetres per pixel of a grayscale image, without a mask.
pub fn gray_grid(raster: &Raster) -> Result<Array2<f32>, ClassifyError> {
    require_layout(raster, PixelLayout::Gray)?;

    Ok(Array2::from_shape_fn(
        (raster.height(), raster.width()),
        |(y, x)| MM_PER_GRAY_LEVEL * f32::from(raster.first_channel(x, y)),
    ))
}
