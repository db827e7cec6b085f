//! # pixfit
//!
//! Deterministic image size reduction: given an image's size and a policy,
//! compute exactly which integer dimensions and crop rectangle result, with
//! the same rounding on every platform. Pixels are touched only at the very
//! edge, by an interchangeable backend.
//!
//! # Architecture
//!
//! ```text
//! drawing   Color, Point, Size, Rectangle, Gravity      (pure values)
//!    ↑
//! reducer   ImageSizeReducer::run(Size) → ReductionPlan  (pure policy)
//!    ↑
//! imaging   ImageBackend: identify + reduce              (file I/O)
//!    ↑
//! process   presets × images → Manifest                  (batch, rayon)
//! ```
//!
//! Everything above `imaging` is synchronous value computation with no I/O,
//! so it is tested without touching the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`drawing`] | Color model and conversion engine, 2D geometry, gravity anchors |
//! | [`reducer`] | Crop / resize / long-side / short-side policies and their JSON and XML forms |
//! | [`imaging`] | `image`-crate backend executing reduction plans |
//! | [`config`] | `pixfit.toml` loading, merging over stock defaults, validation |
//! | [`process`] | Batch pipeline: every preset over every image in a directory |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Example
//!
//! ```
//! use pixfit::drawing::{Gravity, Rectangle, Size};
//! use pixfit::reducer::ImageSizeReducer;
//!
//! let thumb = ImageSizeReducer::cropper(75, 100, Gravity::MiddleCenter).unwrap();
//! let plan = thumb.run(Size::new(250, 150)).unwrap();
//! assert_eq!(plan.crop, Some(Rectangle::init(45, 0, 75, 100)));
//! ```

pub mod config;
pub mod drawing;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod process;
pub mod reducer;

#[cfg(test)]
pub(crate) mod test_helpers;
