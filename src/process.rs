//! Batch reduction: every preset applied to every image under a directory.
//!
//! ## Output Structure
//!
//! ```text
//! output/
//! ├── manifest.json              # Written by the CLI from the returned Manifest
//! ├── thumb/
//! │   ├── dawn.jpg               # 200x200 crop
//! │   └── travel/tokyo.jpg       # Source sub-directories are mirrored
//! └── web/
//!     ├── dawn.jpg               # long side 1600 / 1200
//!     └── travel/tokyo.jpg
//! ```
//!
//! With `output.format` set, every variant gets that extension instead of
//! the source's.
//!
//! ## Failures
//!
//! An image that cannot be read or written is reported as
//! [`ProcessEvent::ImageFailed`], listed under `skipped` in the manifest,
//! and does not stop the batch. Missing source directories and I/O errors on
//! the output root abort with a [`ProcessError`].
//!
//! ## Parallel Processing
//!
//! Images are processed in parallel using [rayon](https://docs.rs/rayon); the
//! caller sizes the global pool (see
//! [`effective_threads`](crate::config::effective_threads)). Manifest order is
//! the sorted source order regardless of completion order.

use crate::config::PixfitConfig;
use crate::imaging::{
    ImageBackend, OperationError, RustBackend, reduce_sized_image, supported_input_extensions,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
}

/// Progress notifications, sent in completion order.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    Started {
        images: usize,
        presets: usize,
    },
    ImageProcessed {
        source: String,
        original: (u32, u32),
        variants: Vec<(String, Variant)>,
    },
    ImageFailed {
        source: String,
        error: String,
    },
}

/// Result of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub images: Vec<ManifestImage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestImage {
    /// Path relative to the source directory, `/`-separated.
    pub source: String,
    /// Original dimensions (width, height)
    pub original: (u32, u32),
    /// Preset name → written variant.
    pub variants: BTreeMap<String, Variant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Path relative to the output directory, `/`-separated.
    pub path: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedImage {
    pub source: String,
    pub error: String,
}

pub fn process(
    source_dir: &Path,
    output_dir: &Path,
    config: &PixfitConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<Manifest, ProcessError> {
    let backend = RustBackend::new();
    process_with_backend(&backend, source_dir, output_dir, config, events)
}

/// Process images using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    source_dir: &Path,
    output_dir: &Path,
    config: &PixfitConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<Manifest, ProcessError> {
    if !source_dir.is_dir() {
        return Err(ProcessError::SourceNotFound(source_dir.to_path_buf()));
    }
    let sources = find_images(source_dir, output_dir)?;
    std::fs::create_dir_all(output_dir)?;

    tracing::info!(
        images = sources.len(),
        presets = config.presets.len(),
        source = %source_dir.display(),
        "starting batch"
    );
    send(
        &events,
        ProcessEvent::Started {
            images: sources.len(),
            presets: config.presets.len(),
        },
    );

    let results: Vec<(String, Result<ManifestImage, OperationError>)> = sources
        .par_iter()
        .map(|relative| {
            let source = to_slash(relative);
            let result = process_image(backend, source_dir, output_dir, relative, config);
            match &result {
                Ok(image) => {
                    tracing::info!(source = %source, "processed image");
                    send(
                        &events,
                        ProcessEvent::ImageProcessed {
                            source: source.clone(),
                            original: image.original,
                            variants: image
                                .variants
                                .iter()
                                .map(|(k, v)| (k.clone(), v.clone()))
                                .collect(),
                        },
                    );
                }
                Err(e) => {
                    tracing::warn!(source = %source, error = %e, "skipping image");
                    send(
                        &events,
                        ProcessEvent::ImageFailed {
                            source: source.clone(),
                            error: e.to_string(),
                        },
                    );
                }
            }
            (source, result)
        })
        .collect();

    let mut manifest = Manifest::default();
    for (source, result) in results {
        match result {
            Ok(image) => manifest.images.push(image),
            Err(e) => manifest.skipped.push(SkippedImage {
                source,
                error: e.to_string(),
            }),
        }
    }
    Ok(manifest)
}

/// Write `manifest.json` into `output_dir` and return its path.
pub fn write_manifest(manifest: &Manifest, output_dir: &Path) -> Result<PathBuf, ProcessError> {
    let path = output_dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

fn send(events: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening.
        let _ = tx.send(event);
    }
}

fn process_image(
    backend: &impl ImageBackend,
    source_dir: &Path,
    output_dir: &Path,
    relative: &Path,
    config: &PixfitConfig,
) -> Result<ManifestImage, OperationError> {
    let source_path = source_dir.join(relative);
    let original = backend.identify(&source_path)?;
    let mut variants = BTreeMap::new();

    for (name, reducer) in &config.presets {
        let relative_out = variant_path(name, relative, config.output.format.as_deref());
        let plan = reduce_sized_image(
            backend,
            &source_path,
            original,
            &output_dir.join(&relative_out),
            reducer,
            config.quality(),
        )?;
        let target = plan.target();
        variants.insert(
            name.clone(),
            Variant {
                path: to_slash(&relative_out),
                width: target.width(),
                height: target.height(),
            },
        );
    }

    Ok(ManifestImage {
        source: to_slash(relative),
        original: (original.width(), original.height()),
        variants,
    })
}

/// `<preset>/<relative>`, with the extension replaced when `format` is set.
fn variant_path(preset: &str, relative: &Path, format: Option<&str>) -> PathBuf {
    let path = Path::new(preset).join(relative);
    match format {
        Some(ext) => path.with_extension(ext.to_ascii_lowercase()),
        None => path,
    }
}

/// Supported images under `source_dir`, relative and sorted. `output_dir`
/// is skipped when it lies inside the source tree.
fn find_images(source_dir: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, ProcessError> {
    let supported = supported_input_extensions();
    let output_dir = output_dir.canonicalize().ok();
    let mut found = Vec::new();

    let walker = WalkDir::new(source_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            output_dir
                .as_ref()
                .is_none_or(|out| entry.path().canonicalize().ok().as_ref() != Some(out))
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_image = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| supported.contains(&e.to_ascii_lowercase().as_str()));
        if !is_image {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(source_dir) {
            found.push(relative.to_path_buf());
        }
    }
    Ok(found)
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
