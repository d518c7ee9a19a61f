//! Image inspection utilities for testing.

use image::{DynamicImage, ImageError, ImageFormat};
use std::path::Path;

/// Load an image from a file
pub fn load_image(path: &Path) -> Result<DynamicImage, ImageError> {
    image::open(path)
}

/// Detect image format from the file contents
pub fn detect_image_format(path: &Path) -> Option<ImageFormat> {
    let bytes = std::fs::read(path).ok()?;
    image::guess_format(&bytes).ok()
}

/// Assert that an image on disk is an 8-bit grayscale PNG of the given size
pub fn assert_gray_png(path: &Path, width: u32, height: u32) -> DynamicImage {
    assert_eq!(detect_image_format(path), Some(ImageFormat::Png));
    let image = load_image(path).expect("Failed to load image");
    assert!(
        matches!(image, DynamicImage::ImageLuma8(_)),
        "Expected 8-bit grayscale, got {:?}",
        image.color()
    );
    assert_eq!((image.width(), image.height()), (width, height));
    image
}
