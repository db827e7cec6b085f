//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header only) |
//! | Decode (JPEG, PNG, GIF, TIFF, WebP) | `image::ImageReader` |
//! | Resample | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Crop | `DynamicImage::crop_imm` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality |
//! | Encode → PNG, GIF, TIFF, WebP | `DynamicImage::save_with_format` (lossless) |

use super::backend::{BackendError, ImageBackend};
use super::params::ReduceParams;
use crate::drawing::Size;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;
use std::sync::LazyLock;

const FORMAT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("gif", ImageFormat::Gif),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_INPUT: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    FORMAT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

static SUPPORTED_OUTPUT: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    FORMAT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.writing_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_INPUT
}

/// Extensions [`RustBackend`] can write.
pub fn supported_output_extensions() -> &'static [&'static str] {
    &SUPPORTED_OUTPUT
}

fn format_for(path: &Path) -> Result<ImageFormat, BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    FORMAT_CANDIDATES
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, fmt)| *fmt)
        .ok_or(BackendError::UnsupportedFormat(ext))
}

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_exists(path: &Path) -> Result<(), BackendError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(BackendError::NotFound(path.to_path_buf()))
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ensure_exists(path)?;
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| BackendError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Save a DynamicImage to the given path, choosing the encoder by extension.
fn save_image(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let format = format_for(path)?;
    if !format.writing_enabled() {
        return Err(BackendError::UnsupportedFormat(format!("{format:?}")));
    }
    let encode_err = |e: image::ImageError| BackendError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let writer = std::io::BufWriter::new(file);
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality.min(100) as u8);
            // JPEG has no alpha channel.
            DynamicImage::ImageRgb8(img.to_rgb8())
                .write_with_encoder(encoder)
                .map_err(encode_err)
        }
        ImageFormat::Gif => DynamicImage::ImageRgba8(img.to_rgba8())
            .save_with_format(path, format)
            .map_err(encode_err),
        other => img.save_with_format(path, other).map_err(encode_err),
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Size, BackendError> {
        ensure_exists(path)?;
        let (width, height) =
            image::image_dimensions(path).map_err(|e| BackendError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        tracing::debug!(path = %path.display(), width, height, "identified image");
        Ok(Size::new_fixed(i64::from(width), i64::from(height)))
    }

    fn reduce(&self, params: &ReduceParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let plan = &params.plan;

        let resized = if plan.resized.width() == img.width()
            && plan.resized.height() == img.height()
        {
            img
        } else {
            img.resize_exact(
                plan.resized.width(),
                plan.resized.height(),
                FilterType::Lanczos3,
            )
        };

        let final_img = match plan.crop {
            Some(rect) => resized.crop_imm(
                rect.point.x.max(0) as u32,
                rect.point.y.max(0) as u32,
                rect.width(),
                rect.height(),
            ),
            None => resized,
        };

        if let Some(parent) = params.output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        save_image(&final_img, &params.output, params.quality.value())?;
        tracing::debug!(
            source = %params.source.display(),
            output = %params.output.display(),
            width = final_img.width(),
            height = final_img.height(),
            "wrote reduced image"
        );
        Ok(())
    }
}
