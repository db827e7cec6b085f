//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Plan
//!
//! ```text
//! crop 75x100 (middle-center)
//!     Source: width=250; height=150
//!     Resize: width=166; height=100
//!     Crop: x=45; y=0; width=75; height=100
//!     Result: 75x100
//! ```
//!
//! ## Batch
//!
//! ```text
//! Processing 2 images with 2 presets
//! travel/dawn.jpg (4000x3000)
//!     thumb: 200x200 → thumb/travel/dawn.jpg
//!     web: 1600x1200 → web/travel/dawn.jpg
//! broken.jpg
//!     skipped: Failed to decode broken.jpg: ...
//! ```
//!
//! ## Color
//!
//! ```text
//! #ff0000
//!     RGB: 255, 0, 0
//!     Name: red
//!     Opacity: 100 (alpha 0)
//!     Packed ARGB: 0x00ff0000
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::drawing::Color;
use crate::process::{Manifest, ProcessEvent};
use crate::reducer::{ImageSizeReducer, ReducerType, ReductionPlan};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// One-line description of a reducer's policy.
///
/// ```text
/// crop 75x100 (middle-center)
/// long side 1600 landscape / 1200 portrait
/// ```
pub fn describe_reducer(reducer: &ImageSizeReducer) -> String {
    match reducer.kind() {
        ReducerType::Crop => format!(
            "crop {}x{} ({})",
            reducer.width(),
            reducer.height(),
            reducer.gravity()
        ),
        ReducerType::Resize => format!("resize {}x{}", reducer.width(), reducer.height()),
        ReducerType::LongSide => format!(
            "long side {} landscape / {} portrait",
            reducer.landscape(),
            reducer.portrait()
        ),
        ReducerType::ShortSide => format!(
            "short side {} landscape / {} portrait",
            reducer.landscape(),
            reducer.portrait()
        ),
    }
}

// ============================================================================
// Plan
// ============================================================================

pub fn format_plan(reducer: &ImageSizeReducer, plan: &ReductionPlan) -> Vec<String> {
    let ctx = indent(1);
    let mut lines = vec![describe_reducer(reducer)];
    lines.push(format!("{ctx}Source: {}", plan.source));
    if plan.is_noop() {
        lines.push(format!("{ctx}Unchanged"));
        return lines;
    }
    lines.push(format!("{ctx}Resize: {}", plan.resized));
    if let Some(crop) = plan.crop {
        lines.push(format!("{ctx}Crop: {crop}"));
    }
    let target = plan.target();
    lines.push(format!("{ctx}Result: {}x{}", target.width(), target.height()));
    lines
}

pub fn print_plan(reducer: &ImageSizeReducer, plan: &ReductionPlan) {
    for line in format_plan(reducer, plan) {
        println!("{}", line);
    }
}

// ============================================================================
// Batch
// ============================================================================

/// Lines for one progress event.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    let ctx = indent(1);
    match event {
        ProcessEvent::Started { images, presets } => vec![format!(
            "Processing {} {} with {} {}",
            images,
            plural(*images, "image", "images"),
            presets,
            plural(*presets, "preset", "presets"),
        )],
        ProcessEvent::ImageProcessed {
            source,
            original,
            variants,
        } => {
            let mut lines = vec![format!("{} ({}x{})", source, original.0, original.1)];
            for (preset, variant) in variants {
                lines.push(format!(
                    "{ctx}{}: {}x{} → {}",
                    preset, variant.width, variant.height, variant.path
                ));
            }
            lines
        }
        ProcessEvent::ImageFailed { source, error } => {
            vec![source.clone(), format!("{ctx}skipped: {error}")]
        }
    }
}

/// Closing summary after a batch.
pub fn format_batch_summary(manifest: &Manifest) -> Vec<String> {
    let written: usize = manifest.images.iter().map(|i| i.variants.len()).sum();
    let mut lines = vec![format!(
        "Wrote {} {} from {} {}",
        written,
        plural(written, "variant", "variants"),
        manifest.images.len(),
        plural(manifest.images.len(), "image", "images"),
    )];
    if !manifest.skipped.is_empty() {
        lines.push(format!(
            "Skipped {} {}",
            manifest.skipped.len(),
            plural(manifest.skipped.len(), "image", "images"),
        ));
    }
    lines
}

pub fn print_batch_summary(manifest: &Manifest) {
    for line in format_batch_summary(manifest) {
        println!("{}", line);
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}

// ============================================================================
// Color
// ============================================================================

pub fn format_color(color: &Color, name: Option<&str>) -> Vec<String> {
    let ctx = indent(1);
    let [r, g, b] = color.rgb();
    let mut lines = vec![color.hex(), format!("{ctx}RGB: {r}, {g}, {b}")];
    if let Some(name) = name {
        lines.push(format!("{ctx}Name: {name}"));
    }
    lines.push(format!(
        "{ctx}Opacity: {} (alpha {})",
        color.opacity(),
        color.alpha()
    ));
    lines.push(format!("{ctx}Packed ARGB: {:#010x}", color.to_packed_argb()));
    lines
}

pub fn print_color(color: &Color, name: Option<&str>) {
    for line in format_color(color, name) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{Gravity, Size};
    use crate::process::{ManifestImage, SkippedImage, Variant};
    use std::collections::BTreeMap;

    // =========================================================================
    // Plan
    // =========================================================================

    #[test]
    fn describe_each_reducer_type() {
        let crop = ImageSizeReducer::cropper(75, 100, Gravity::TopLeft).unwrap();
        assert_eq!(describe_reducer(&crop), "crop 75x100 (top-left)");
        let resize = ImageSizeReducer::resizer(640, 480).unwrap();
        assert_eq!(describe_reducer(&resize), "resize 640x480");
        let long = ImageSizeReducer::long_side(1600, 1200).unwrap();
        assert_eq!(
            describe_reducer(&long),
            "long side 1600 landscape / 1200 portrait"
        );
    }

    #[test]
    fn format_crop_plan() {
        let reducer = ImageSizeReducer::cropper(75, 100, Gravity::MiddleCenter).unwrap();
        let plan = reducer.run(Size::new(250, 150)).unwrap();
        assert_eq!(
            format_plan(&reducer, &plan),
            vec![
                "crop 75x100 (middle-center)",
                "    Source: width=250; height=150",
                "    Resize: width=166; height=100",
                "    Crop: x=45; y=0; width=75; height=100",
                "    Result: 75x100",
            ]
        );
    }

    #[test]
    fn format_noop_plan() {
        let reducer = ImageSizeReducer::resizer(1000, 1000).unwrap();
        let plan = reducer.run(Size::new(20, 10)).unwrap();
        let lines = format_plan(&reducer, &plan);
        assert_eq!(lines.last().unwrap(), "    Unchanged");
    }

    // =========================================================================
    // Batch
    // =========================================================================

    #[test]
    fn format_started_pluralizes() {
        let lines = format_process_event(&ProcessEvent::Started {
            images: 1,
            presets: 2,
        });
        assert_eq!(lines, vec!["Processing 1 image with 2 presets"]);
    }

    #[test]
    fn format_processed_image_lists_variants() {
        let event = ProcessEvent::ImageProcessed {
            source: "travel/dawn.jpg".into(),
            original: (4000, 3000),
            variants: vec![(
                "thumb".into(),
                Variant {
                    path: "thumb/travel/dawn.jpg".into(),
                    width: 200,
                    height: 200,
                },
            )],
        };
        assert_eq!(
            format_process_event(&event),
            vec![
                "travel/dawn.jpg (4000x3000)",
                "    thumb: 200x200 → thumb/travel/dawn.jpg",
            ]
        );
    }

    #[test]
    fn format_failed_image() {
        let event = ProcessEvent::ImageFailed {
            source: "broken.jpg".into(),
            error: "bad".into(),
        };
        assert_eq!(
            format_process_event(&event),
            vec!["broken.jpg", "    skipped: bad"]
        );
    }

    #[test]
    fn batch_summary_counts() {
        let manifest = Manifest {
            images: vec![ManifestImage {
                source: "a.jpg".into(),
                original: (10, 10),
                variants: BTreeMap::from([
                    (
                        "a".into(),
                        Variant {
                            path: "a/a.jpg".into(),
                            width: 5,
                            height: 5,
                        },
                    ),
                    (
                        "b".into(),
                        Variant {
                            path: "b/a.jpg".into(),
                            width: 8,
                            height: 8,
                        },
                    ),
                ]),
            }],
            skipped: vec![SkippedImage {
                source: "x.jpg".into(),
                error: "bad".into(),
            }],
        };
        assert_eq!(
            format_batch_summary(&manifest),
            vec!["Wrote 2 variants from 1 image", "Skipped 1 image"]
        );
    }

    // =========================================================================
    // Color
    // =========================================================================

    #[test]
    fn format_opaque_named_color() {
        let color = Color::from_rgb(255, 0, 0);
        assert_eq!(
            format_color(&color, Some("red")),
            vec![
                "#ff0000",
                "    RGB: 255, 0, 0",
                "    Name: red",
                "    Opacity: 100 (alpha 0)",
                "    Packed ARGB: 0x00ff0000",
            ]
        );
    }

    #[test]
    fn format_translucent_color() {
        let color = Color::new("#000080", Some(50));
        let lines = format_color(&color, None);
        assert_eq!(lines[2], "    Opacity: 50 (alpha 63)");
        assert_eq!(lines[3], "    Packed ARGB: 0x3f000080");
    }
}
