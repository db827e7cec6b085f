//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the boundary to real pixels: probing a
//! file's size and executing a [`ReductionPlan`](crate::reducer::ReductionPlan).
//! Everything above it is pure geometry.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::ReduceParams;
use crate::drawing::Size;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Resource errors: the only failures that involve the file system.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Image not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
    #[error("Failed to encode {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
}

/// Trait for image processing backends.
///
/// `Sync` so one backend can be shared by every rayon worker.
pub trait ImageBackend: Sync {
    /// Image dimensions as a fixed [`Size`].
    fn identify(&self, path: &Path) -> Result<Size, BackendError>;

    /// Decode, resample to `plan.resized`, crop to `plan.crop` if set and
    /// encode to `output`.
    fn reduce(&self, params: &ReduceParams) -> Result<(), BackendError>;
}
