//! File-level pipeline.
//!
//! A [`Masker`] holds one decoded mask and runs an aggregation against any
//! number of data files. Each call decodes its input, aggregates and drops
//! the decoded raster before returning. Errors name the file they came from.

use ndarray::{Array2, Array3};
use std::path::Path;

use crate::aggregate;
use crate::codec;
use crate::convert;
use crate::error::{MaskerError, Result};
use crate::mask::Mask;
use crate::raster::{Geometry, Raster};

/// A mask bound to the geometry its data files must share.
#[derive(Debug, Clone)]
pub struct Masker {
    mask: Mask,
    geometry: Geometry,
}

impl Masker {
    /// Decode the mask file at `path`
    pub fn open(path: &Path, geometry: Geometry) -> Result<Self> {
        let mask = Mask::load(path, &geometry)?;
        Ok(Self { mask, geometry })
    }

    /// Use an already built mask
    pub fn new(mask: Mask) -> Self {
        let geometry = mask.geometry();
        Self { mask, geometry }
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn decode(&self, path: &Path) -> Result<Raster> {
        Ok(codec::decode(path, &self.geometry)?)
    }

    /// Masked rainfall total in millimetres of a met color image
    pub fn total_met(&self, path: &Path) -> Result<f32> {
        let raster = self.decode(path)?;
        aggregate::total_amount(&self.mask, &raster)
            .map_err(|source| MaskerError::classify(path, source))
    }

    /// Masked rainfall total in millimetres of a grayscale image
    pub fn total_gray(&self, path: &Path) -> Result<f32> {
        let raster = self.decode(path)?;
        aggregate::total_gray(&self.mask, &raster)
            .map_err(|source| MaskerError::classify(path, source))
    }

    /// Masked millimetre grid of a grayscale image, indexed `[y, x]`
    pub fn load_gray(&self, path: &Path) -> Result<Array2<f32>> {
        let raster = self.decode(path)?;
        aggregate::dense_grid(&self.mask, &raster)
            .map_err(|source| MaskerError::classify(path, source))
    }

    /// Masked one-hot category tensor of a grayscale image, indexed `[channel, y, x]`
    pub fn load_channels(&self, path: &Path) -> Result<Array3<f32>> {
        let raster = self.decode(path)?;
        aggregate::channel_tensor(&self.mask, &raster)
            .map_err(|source| MaskerError::classify(path, source))
    }
}

/// Unmasked millimetre grid of a grayscale image, indexed `[y, x]`
pub fn load_gray(path: &Path, geometry: &Geometry) -> Result<Array2<f32>> {
    let raster = codec::decode(path, geometry)?;
    aggregate::gray_grid(&raster).map_err(|source| MaskerError::classify(path, source))
}

/// Convert a met color image to a grayscale PNG.
///
/// Nothing is written unless the whole input classifies.
pub fn met_to_gray(input: &Path, output: &Path, geometry: &Geometry) -> Result<()> {
    let met = codec::decode(input, geometry)?;
    let gray =
        convert::met_to_grayscale(&met).map_err(|source| MaskerError::classify(input, source))?;
    drop(met);
    codec::encode(&gray, output)
}
