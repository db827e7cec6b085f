//! Shared test utilities.
//!
//! Synthetic images are generated with the `image` crate so tests never
//! depend on fixture files.

use image::{ImageEncoder, RgbImage};
use std::path::Path;

/// Create a small valid JPEG file with the given dimensions.
///
/// The pattern is a gradient so resampled output is not uniform.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}
