//! PNG fixtures written with the `image` crate.
//!
//! Every fixture is evaluated per `(x, y)` so tests can describe images as
//! small closures over coordinates.

use image::{ColorType, ImageFormat};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use metmasker::classifier::PALETTE;

/// Side of the default frame
pub const SIZE: u32 = 500;

/// Met colors of the eight rainfall categories, opaque
pub const MET_COLORS: [[u8; 4]; 8] = [
    [0, 0, 254, 255],
    [50, 101, 254, 255],
    [127, 127, 0, 255],
    [254, 203, 0, 255],
    [254, 152, 0, 255],
    [254, 0, 0, 255],
    [254, 0, 254, 255],
    [229, 254, 254, 255],
];

/// Gray code of palette row `index`
pub fn gray_of(index: usize) -> u8 {
    PALETTE[index].category.gray
}

fn channels(color: ColorType) -> usize {
    match color {
        ColorType::L8 => 1,
        ColorType::La8 => 2,
        ColorType::Rgb8 => 3,
        _ => 4,
    }
}

/// Write a PNG of the given color type, sampling `f` at every pixel
pub fn write_png<F>(path: &Path, width: u32, height: u32, color: ColorType, mut f: F)
where
    F: FnMut(u32, u32) -> [u8; 4],
{
    let n = channels(color);
    let mut buf = Vec::with_capacity((width * height) as usize * n);
    for y in 0..height {
        for x in 0..width {
            buf.extend_from_slice(&f(x, y)[..n]);
        }
    }
    image::save_buffer_with_format(path, &buf, width, height, color, ImageFormat::Png)
        .expect("Failed to write PNG fixture");
}

/// 500x500 grayscale mask with `inside` selecting set pixels
pub fn write_mask<F>(path: &Path, inside: F)
where
    F: Fn(u32, u32) -> bool,
{
    write_png(path, SIZE, SIZE, ColorType::L8, |x, y| {
        [if inside(x, y) { 255 } else { 0 }, 0, 0, 0]
    });
}

/// 500x500 met color image
pub fn write_met<F>(path: &Path, f: F)
where
    F: FnMut(u32, u32) -> [u8; 4],
{
    write_png(path, SIZE, SIZE, ColorType::Rgba8, f);
}

/// 500x500 grayscale rainfall image
pub fn write_gray<F>(path: &Path, mut f: F)
where
    F: FnMut(u32, u32) -> u8,
{
    write_png(path, SIZE, SIZE, ColorType::L8, |x, y| [f(x, y), 0, 0, 0]);
}

/// A scratch directory that hands out file paths
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
