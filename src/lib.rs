//! # metmasker
//!
//! Rainfall totals from Met Office rainfall-radar PNG composites, restricted
//! to a region of interest given as a mask image.
//!
//! The radar composites use a fixed palette of eight colors, one per rainfall
//! category. This library decodes those images, classifies each pixel into
//! millimetres of rain, and aggregates over the pixels a mask selects.
//!
//! ## Key Features
//!
//! - **Strict decoding**: PNG inputs must match the configured geometry
//!   (500x500, 8-bit by default) and one of four 8-bit color types
//! - **Palette classification**: met colors map to a gray code of four levels per millimetre
//! - **Masked aggregation**: scalar totals, dense `[y, x]` grids and one-hot
//!   `[channel, y, x]` tensors
//! - **Conversion**: met color images to compact grayscale PNGs
//!
//! ## Architecture
//!
//! - **Raster Layer**: [`codec`] decodes PNG files into [`Raster`]s
//! - **Classification**: [`classifier`] holds the palette table
//! - **Aggregation**: [`mask`], [`aggregate`] and [`convert`] work on decoded rasters
//! - **Pipeline**: [`masker`] ties the above to files, [`commands`] drives the CLI

pub mod aggregate;
pub mod classifier;
pub mod codec;
pub mod commands;
pub mod config;
pub mod convert;
pub mod error;
pub mod logging;
pub mod mask;
pub mod masker;
pub mod raster;

pub use aggregate::{channel_tensor, dense_grid, gray_grid, total_amount, total_gray};
pub use classifier::{channel_index, classify, RainCategory, CHANNEL_COUNT};
pub use codec::{decode, encode};
pub use config::Config;
pub use convert::met_to_grayscale;
pub use error::{ClassifyError, DecodeError, MaskerError, Result};
pub use logging::{init_tracing, log_error, log_operation_end, log_operation_start};
pub use mask::{build_mask, BoundingBox, Mask};
pub use masker::{load_gray, met_to_gray, Masker};
pub use raster::{Geometry, PixelLayout, Raster};
