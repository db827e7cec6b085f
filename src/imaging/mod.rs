//! Image processing: the boundary between size policies and real pixels.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Resample** | Lanczos3 via `DynamicImage::resize_exact` |
//! | **Crop** | `DynamicImage::crop_imm` at the plan's rectangle |
//! | **Encode** | JPEG with quality, other formats lossless |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining reducer plans + backend

pub mod backend;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use operations::{
    OperationError, get_size, plan_reduction, reduce_image, reduce_sized_image,
};
pub use params::{Quality, ReduceParams};
pub use rust_backend::{RustBackend, supported_input_extensions, supported_output_extensions};
