//! Met Office rainfall palette.
//!
//! Radar composites encode rainfall rate as one of eight opaque RGBA colors.
//! Anything not fully opaque carries no data. [`PALETTE`] is the single
//! source of truth: the gray code, the millimetre amount and the neural-net
//! channel of a pixel are all read off the same row.

use serde::Serialize;
use std::fmt;

/// Gray levels per millimetre of rainfall in the single-byte encoding
pub const GRAY_LEVELS_PER_MM: f32 = 4.0;

/// Millimetres represented by one gray level
pub const MM_PER_GRAY_LEVEL: f32 = 1.0 / GRAY_LEVELS_PER_MM;

/// Number of one-hot planes in a channel tensor
pub const CHANNEL_COUNT: usize = 8;

/// Alpha value a pixel needs to be considered at all
const OPAQUE: u8 = 255;

/// One rainfall category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RainCategory {
    /// Single-byte encoding, four gray levels per millimetre
    pub gray: u8,
    /// Rainfall in millimetres
    pub amount_mm: f32,
}

/// Category for pixels with alpha below 255
pub const TRANSPARENT: RainCategory = RainCategory {
    gray: 0,
    amount_mm: 0.0,
};

/// Byte pattern an opaque pixel must match. `None` matches any byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPattern {
    pub red: u8,
    pub green: Option<u8>,
    pub blue: Option<u8>,
}

impl ColorPattern {
    const fn red(red: u8) -> Self {
        Self {
            red,
            green: None,
            blue: None,
        }
    }

    const fn red_green(red: u8, green: u8) -> Self {
        Self {
            red,
            green: Some(green),
            blue: None,
        }
    }

    const fn red_blue(red: u8, blue: u8) -> Self {
        Self {
            red,
            green: None,
            blue: Some(blue),
        }
    }

    /// Whether `(r, g, b)` matches this pattern
    pub fn matches(&self, r: u8, g: u8, b: u8) -> bool {
        self.red == r
            && self.green.map_or(true, |green| green == g)
            && self.blue.map_or(true, |blue| blue == b)
    }
}

/// A palette row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteEntry {
    pub pattern: ColorPattern,
    pub category: RainCategory,
}

const fn entry(pattern: ColorPattern, gray: u8, amount_mm: f32) -> PaletteEntry {
    PaletteEntry {
        pattern,
        category: RainCategory { gray, amount_mm },
    }
}

/// Opaque palette rows in match order. The row index is the channel index.
///
/// The four `254` rows overlap (e.g. `(254, 203, 0)`); the first match wins.
pub const PALETTE: [PaletteEntry; CHANNEL_COUNT] = [
    entry(ColorPattern::red(0), 1, 0.25),
    entry(ColorPattern::red(50), 3, 0.75),
    entry(ColorPattern::red(127), 6, 1.5),
    entry(ColorPattern::red_green(254, 203), 12, 3.0),
    entry(ColorPattern::red_green(254, 152), 24, 6.0),
    entry(ColorPattern::red_blue(254, 0), 48, 12.0),
    entry(ColorPattern::red_blue(254, 254), 96, 24.0),
    entry(ColorPattern::red(229), 192, 48.0),
];

/// An opaque pixel that matches no palette row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnrecognizedColor(pub [u8; 4]);

impl fmt::Display for UnrecognizedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "unrecognized met color rgba({r}, {g}, {b}, {a})")
    }
}

impl std::error::Error for UnrecognizedColor {}

/// Look up the category of an RGBA pixel.
pub fn classify(pixel: [u8; 4]) -> Result<RainCategory, UnrecognizedColor> {
    let [r, g, b, a] = pixel;
    if a < OPAQUE {
        return Ok(TRANSPARENT);
    }
    PALETTE
        .iter()
        .find(|row| row.pattern.matches(r, g, b))
        .map(|row| row.category)
        .ok_or(UnrecognizedColor(pixel))
}

/// Gray code of an RGBA pixel
pub fn classify_category(pixel: [u8; 4]) -> Result<u8, UnrecognizedColor> {
    classify(pixel).map(|category| category.gray)
}

/// Rainfall in millimetres of an RGBA pixel
pub fn amount(pixel: [u8; 4]) -> Result<f32, UnrecognizedColor> {
    classify(pixel).map(|category| category.amount_mm)
}

/// Channel of a gray code, or `None` for 0 and codes outside the palette.
pub fn try_channel_index(gray: u8) -> Option<usize> {
    PALETTE.iter().position(|row| row.category.gray == gray)
}

/// Channel of a gray code.
///
/// Codes outside the palette land in channel 0, the same plane as 1 (0.25 mm).
/// Use [`try_channel_index`] to tell them apart.
pub fn channel_index(gray: u8) -> usize {
    try_channel_index(gray).unwrap_or(0)
}

/// Copy the first four bytes of an RGBA pixel slice.
///
/// Callers guarantee `pixel.len() >= 4`.
pub(crate) fn rgba(pixel: &[u8]) -> [u8; 4] {
    [pixel[0], pixel[1], pixel[2], pixel[3]]
}
