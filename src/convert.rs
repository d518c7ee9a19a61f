//! Met color to grayscale conversion.

use crate::aggregate::Misses;
use crate::classifier;
use crate::error::ClassifyError;
use crate::raster::{PixelLayout, Raster};

/// Replace every RGBA met pixel by its gray code.
///
/// The whole frame is classified; if any pixel is outside the palette no
/// raster is returned.
pub fn met_to_grayscale(raster: &Raster) -> Result<Raster, ClassifyError> {
    if raster.layout() != PixelLayout::Rgba {
        return Err(ClassifyError::UnsupportedColorType {
            expected: PixelLayout::Rgba,
            found: raster.layout(),
        });
    }

    let mut gray = Raster::zeroed(raster.geometry(), PixelLayout::Gray);
    let mut misses = Misses::default();

    for (y, row) in raster.rows().enumerate() {
        for (x, pixel) in row.chunks_exact(4).enumerate() {
            let pixel = classifier::rgba(pixel);
            match classifier::classify_category(pixel) {
                Ok(code) => gray.put_pixel(x, y, &[code]),
                Err(_) => misses.record(x, y, pixel),
            }
        }
    }

    misses.finish(gray)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::PALETTE;
    use crate::raster::Geometry;
    use pretty_assertions::assert_eq;

    fn palette_pixel(x: usize, y: usize) -> [u8; 4] {
        match (x + y) % 10 {
            0 => [12, 34, 56, 0],
            1 => [254, 203, 17, 255],
            2 => [254, 152, 17, 255],
            3 => [254, 17, 0, 255],
            4 => [254, 17, 254, 255],
            5 => [0, 0, 0, 255],
            6 => [50, 0, 0, 255],
            7 => [127, 0, 0, 255],
            8 => [229, 0, 0, 255],
            _ => [1, 1, 1, 200],
        }
    }

    #[test]
    fn test_matches_per_pixel_classification() {
        let geometry = Geometry::new(7, 5);
        let met = Raster::from_fn(geometry, PixelLayout::Rgba, palette_pixel);
        let gray = met_to_grayscale(&met).unwrap();

        assert_eq!(gray.layout(), PixelLayout::Gray);
        assert_eq!(gray.geometry(), geometry);
        for y in 0..5 {
            for x in 0..7 {
                let expected = classifier::classify_category(palette_pixel(x, y)).unwrap();
                assert_eq!(gray.first_channel(x, y), expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_every_palette_code_appears() {
        let geometry = Geometry::new(10, 1);
        let met = Raster::from_fn(geometry, PixelLayout::Rgba, palette_pixel);
        let gray = met_to_grayscale(&met).unwrap();

        let mut codes: Vec<u8> = gray.as_bytes().to_vec();
        codes.sort_unstable();
        codes.dedup();
        let mut expected: Vec<u8> = PALETTE.iter().map(|row| row.category.gray).collect();
        expected.insert(0, 0);
        assert_eq!(codes, expected);
    }

    #[test]
    fn test_fails_without_output_on_any_miss() {
        let mut met = Raster::from_fn(Geometry::new(4, 4), PixelLayout::Rgba, |_, _| [0, 0, 0, 255]);
        met.put_pixel(3, 3, &[255, 255, 255, 255]);

        assert_eq!(
            met_to_grayscale(&met),
            Err(ClassifyError::UnrecognizedColor {
                x: 3,
                y: 3,
                pixel: [255, 255, 255, 255],
                count: 1
            })
        );
    }

    #[test]
    fn test_requires_rgba() {
        let rgb = Raster::zeroed(Geometry::new(2, 2), PixelLayout::Rgb);
        assert_eq!(
            met_to_grayscale(&rgb),
            Err(ClassifyError::UnsupportedColorType {
                expected: PixelLayout::Rgba,
                found: PixelLayout::Rgb
            })
        );
    }
}
