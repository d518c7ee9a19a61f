//! In-memory raster model.
//!
//! A [`Raster`] is a decoded 8-bit image stored as one contiguous, row-major
//! byte buffer. Every row holds exactly `width * bytes_per_pixel` bytes, so a
//! pixel at `(x, y)` is always `bytes_per_pixel` bytes long.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width, height and bit depth every raster in a run must share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// Bits per channel
    pub bit_depth: u8,
}

impl Geometry {
    /// The 500x500, 8-bit frame used by the Met Office rainfall radar composites.
    pub const MET_OFFICE: Geometry = Geometry {
        width: 500,
        height: 500,
        bit_depth: 8,
    };

    /// An 8-bit geometry of the given size.
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bit_depth: 8,
        }
    }

    /// Number of pixels in one frame
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Bytes in one row for the given layout
    pub fn row_bytes(&self, layout: PixelLayout) -> usize {
        self.width * layout.bytes_per_pixel()
    }

    /// Bytes in one frame for the given layout
    pub fn frame_bytes(&self, layout: PixelLayout) -> usize {
        self.row_bytes(layout) * self.height
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::MET_OFFICE
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}@{}bit", self.width, self.height, self.bit_depth)
    }
}

/// Channel arrangement of a pixel, one of the four 8-bit PNG color types we accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelLayout {
    /// One luminance byte
    Gray,
    /// Luminance plus alpha
    GrayAlpha,
    /// Red, green, blue
    Rgb,
    /// Red, green, blue, alpha
    Rgba,
}

impl PixelLayout {
    /// Number of interleaved bytes per pixel
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelLayout::Gray => 1,
            PixelLayout::GrayAlpha => 2,
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }

    /// Translate a PNG IHDR color-type tag.
    ///
    /// Indexed color (tag 3) and any reserved value are not supported.
    pub const fn from_color_type_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(PixelLayout::Gray),
            2 => Some(PixelLayout::Rgb),
            4 => Some(PixelLayout::GrayAlpha),
            6 => Some(PixelLayout::Rgba),
            _ => None,
        }
    }

    /// The PNG IHDR color-type tag for this layout
    pub const fn color_type_tag(self) -> u8 {
        match self {
            PixelLayout::Gray => 0,
            PixelLayout::Rgb => 2,
            PixelLayout::GrayAlpha => 4,
            PixelLayout::Rgba => 6,
        }
    }

    /// Short lowercase name used in reports
    pub const fn name(self) -> &'static str {
        match self {
            PixelLayout::Gray => "gray",
            PixelLayout::GrayAlpha => "gray_alpha",
            PixelLayout::Rgb => "rgb",
            PixelLayout::Rgba => "rgba",
        }
    }
}

impl fmt::Display for PixelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} byte/px)", self.name(), self.bytes_per_pixel())
    }
}

/// A fully decoded image.
///
/// The buffer is owned; dropping the raster releases it exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    geometry: Geometry,
    layout: PixelLayout,
    pixels: Vec<u8>,
}

impl Raster {
    /// Wrap an existing buffer.
    ///
    /// Returns `None` unless `pixels` holds exactly one frame for the given
    /// geometry and layout.
    pub fn from_raw(geometry: Geometry, layout: PixelLayout, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != geometry.frame_bytes(layout) {
            return None;
        }
        Some(Self {
            geometry,
            layout,
            pixels,
        })
    }

    /// A raster with every byte set to zero
    pub fn zeroed(geometry: Geometry, layout: PixelLayout) -> Self {
        Self {
            geometry,
            layout,
            pixels: vec![0; geometry.frame_bytes(layout)],
        }
    }

    /// Build a raster by evaluating `f` at every `(x, y)`.
    ///
    /// `f` must return at least `bytes_per_pixel` bytes; extra bytes are ignored.
    pub fn from_fn<F>(geometry: Geometry, layout: PixelLayout, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> [u8; 4],
    {
        let bpp = layout.bytes_per_pixel();
        let mut pixels = Vec::with_capacity(geometry.frame_bytes(layout));
        for y in 0..geometry.height {
            for x in 0..geometry.width {
                pixels.extend_from_slice(&f(x, y)[..bpp]);
            }
        }
        Self {
            geometry,
            layout,
            pixels,
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn width(&self) -> usize {
        self.geometry.width
    }

    pub fn height(&self) -> usize {
        self.geometry.height
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.layout.bytes_per_pixel()
    }

    /// Raw frame bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the raster and hand back its buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    /// Bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.geometry.row_bytes(self.layout);
        &self.pixels[y * stride..(y + 1) * stride]
    }

    /// Iterate over all rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels
            .chunks_exact(self.geometry.row_bytes(self.layout))
    }

    /// Bytes of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let bpp = self.bytes_per_pixel();
        let start = y * self.geometry.row_bytes(self.layout) + x * bpp;
        &self.pixels[start..start + bpp]
    }

    /// First channel byte at `(x, y)`
    pub fn first_channel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.geometry.row_bytes(self.layout) + x * self.bytes_per_pixel()]
    }

    /// Overwrite the pixel at `(x, y)` with the first `bytes_per_pixel` bytes of `value`.
    pub fn put_pixel(&mut self, x: usize, y: usize, value: &[u8]) {
        let bpp = self.bytes_per_pixel();
        let start = y * self.geometry.row_bytes(self.layout) + x * bpp;
        self.pixels[start..start + bpp].copy_from_slice(&value[..bpp]);
    }
}
