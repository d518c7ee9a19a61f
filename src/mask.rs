//! Region-of-interest masks.
//!
//! A mask is an ordinary raster whose set pixels (first channel byte nonzero)
//! select the region to aggregate over. The bounding box of that region is
//! computed once when the mask is built.

use serde::Serialize;
use std::ops::Range;
use std::path::Path;

use crate::codec;
use crate::error::DecodeError;
use crate::raster::{Geometry, Raster};

/// Bounds of the set region of a mask.
///
/// Iteration covers `x_min..x_max` and `y_min..y_max`: `min` is inclusive and
/// `max` exclusive, so the last set column and row are left out of
/// bounding-box scans. A mask with no set pixels keeps the initial scan state
/// `(width - 1, 0, height - 1, 0)`, an inverted box that iterates nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x_min: usize,
    pub x_max: usize,
    pub y_min: usize,
    pub y_max: usize,
}

impl BoundingBox {
    /// Starting state of the scan for a frame of the given size
    pub fn initial(geometry: &Geometry) -> Self {
        Self {
            x_min: geometry.width.saturating_sub(1),
            x_max: 0,
            y_min: geometry.height.saturating_sub(1),
            y_max: 0,
        }
    }

    fn include(&mut self, x: usize, y: usize) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }

    /// Columns visited by a bounding-box scan
    pub fn columns(&self) -> Range<usize> {
        self.x_min..self.x_max
    }

    /// Rows visited by a bounding-box scan
    pub fn rows(&self) -> Range<usize> {
        self.y_min..self.y_max
    }

    /// Whether a scan over this box visits no pixel
    pub fn is_empty(&self) -> bool {
        self.columns().is_empty() || self.rows().is_empty()
    }
}

/// A decoded mask raster plus the bounding box of its set pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    raster: Raster,
    bounds: BoundingBox,
}

impl Mask {
    /// Scan the whole frame once and record the bounds of the set pixels.
    pub fn from_raster(raster: Raster) -> Self {
        let geometry = raster.geometry();
        let bpp = raster.bytes_per_pixel();
        let mut bounds = BoundingBox::initial(&geometry);

        for (y, row) in raster.rows().enumerate() {
            for (x, pixel) in row.chunks_exact(bpp).enumerate() {
                if pixel[0] > 0 {
                    bounds.include(x, y);
                }
            }
        }

        Self { raster, bounds }
    }

    /// Decode a mask file and build its bounds
    pub fn load(path: &Path, geometry: &Geometry) -> Result<Self, DecodeError> {
        codec::decode(path, geometry).map(Self::from_raster)
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn geometry(&self) -> Geometry {
        self.raster.geometry()
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Whether the pixel at `(x, y)` is part of the region
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.raster.first_channel(x, y) != 0
    }

    /// Number of set pixels in the whole frame
    pub fn set_count(&self) -> usize {
        let bpp = self.raster.bytes_per_pixel();
        self.raster
            .as_bytes()
            .chunks_exact(bpp)
            .filter(|pixel| pixel[0] != 0)
            .count()
    }

    /// Set coordinates visited by a bounding-box scan, row by row
    pub fn scan(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.bounds.rows().flat_map(move |y| {
            self.bounds
                .columns()
                .filter(move |&x| self.is_set(x, y))
                .map(move |x| (x, y))
        })
    }

    /// Give back the underlying raster
    pub fn into_raster(self) -> Raster {
        self.raster
    }
}

/// Build a [`Mask`] from a decoded raster
pub fn build_mask(raster: Raster) -> Mask {
    Mask::from_raster(raster)
}
