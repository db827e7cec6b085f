//! High-level image operations.
//!
//! These functions combine the reducer's geometry with backend execution:
//! probe the source, compute a plan, hand the plan to the backend.

use super::backend::{BackendError, ImageBackend};
use super::params::{Quality, ReduceParams};
use crate::drawing::{DrawingError, Size};
use crate::reducer::{ImageSizeReducer, ReductionPlan};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperationError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("Cannot plan reduction: {0}")]
    Plan(#[from] DrawingError),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, OperationError>;

/// Get image size using the backend.
pub fn get_size(backend: &impl ImageBackend, path: &Path) -> Result<Size> {
    Ok(backend.identify(path)?)
}

/// Plan a reduction of the image at `path` without executing it.
pub fn plan_reduction(
    backend: &impl ImageBackend,
    path: &Path,
    reducer: &ImageSizeReducer,
) -> Result<ReductionPlan> {
    let size = get_size(backend, path)?;
    Ok(reducer.run(size)?)
}

/// Reduce `source` into `output` and return the plan that was executed.
pub fn reduce_image(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    reducer: &ImageSizeReducer,
    quality: Quality,
) -> Result<ReductionPlan> {
    let size = get_size(backend, source)?;
    reduce_sized_image(backend, source, size, output, reducer, quality)
}

/// [`reduce_image`] for a source whose size is already known.
pub fn reduce_sized_image(
    backend: &impl ImageBackend,
    source: &Path,
    size: Size,
    output: &Path,
    reducer: &ImageSizeReducer,
    quality: Quality,
) -> Result<ReductionPlan> {
    let plan = reducer.run(size)?;
    backend.reduce(&ReduceParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        plan,
        quality,
    })?;
    Ok(plan)
}
