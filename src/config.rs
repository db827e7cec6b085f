//! Configuration module.
//!
//! Handles loading, validating, and merging `pixfit.toml`. Stock defaults are
//! overridden by the user file; the file is sparse and only needs the keys it
//! changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! quality = 75              # JPEG quality (1-100)
//! # format = "jpg"          # Force an output format; omit to keep the source's
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//!
//! [presets.thumb]           # Named reducers, in record form
//! type = 0                  # 0 crop, 1 resize, 2 long side, 3 short side
//! width = 200
//! height = 200
//! gravity = 4
//! ```
//!
//! ## Presets
//!
//! A `[presets]` table in the user file replaces the stock presets instead of
//! merging into them, so a file can define exactly the variants it wants.
//! Every preset is decoded strictly: unknown keys or invalid values are
//! errors here, unlike the lenient record parser.
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Quality, supported_output_extensions};
use crate::reducer::ImageSizeReducer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up when no `--config` is given.
pub const CONFIG_FILE: &str = "pixfit.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `pixfit.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PixfitConfig {
    /// Encoding settings for written images.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Named reducers applied by `batch`, selectable by name elsewhere.
    pub presets: BTreeMap<String, ImageSizeReducer>,
}

impl Default for PixfitConfig {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            processing: ProcessingConfig::default(),
            presets: stock_presets(),
        }
    }
}

fn stock_presets() -> BTreeMap<String, ImageSizeReducer> {
    let mut presets = BTreeMap::new();
    if let Ok(thumb) =
        ImageSizeReducer::cropper(200, 200, crate::drawing::Gravity::MiddleCenter)
    {
        presets.insert("thumb".to_string(), thumb);
    }
    if let Ok(web) = ImageSizeReducer::long_side(1600, 1200) {
        presets.insert("web".to_string(), web);
    }
    presets
}

impl PixfitConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if let Some(format) = &self.output.format {
            let format = format.to_ascii_lowercase();
            if !supported_output_extensions().contains(&format.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "output.format '{format}' has no encoder (supported: {})",
                    supported_output_extensions().join(", ")
                )));
            }
        }
        if self.presets.is_empty() {
            return Err(ConfigError::Validation(
                "presets must define at least one reducer".into(),
            ));
        }
        for name in self.presets.keys() {
            if !is_valid_preset_name(name) {
                return Err(ConfigError::Validation(format!(
                    "preset name '{name}' must be a plain directory name"
                )));
            }
        }
        Ok(())
    }

    pub fn preset(&self, name: &str) -> Option<&ImageSizeReducer> {
        self.presets.get(name)
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.output.quality)
    }
}

/// Preset names become output directory names.
fn is_valid_preset_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_control)
}

/// Encoding settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Lossy encoding quality (1-100), used by JPEG output.
    pub quality: u32,
    /// Output extension for every variant. `None` keeps each source's format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default().value(),
            format: None,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(PixfitConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PixfitConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => {
            let base = match (base, ov.get("presets")) {
                (toml::Value::Table(mut table), Some(_)) => {
                    table.remove("presets");
                    toml::Value::Table(table)
                }
                (base, _) => base,
            };
            merge_toml(base, ov)
        }
        None => base,
    };
    let config: PixfitConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when the file
/// does not exist.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<PixfitConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    if overlay.is_some() {
        tracing::debug!(path = %path.display(), "loaded config file");
    }
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `pixfit.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# pixfit configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output encoding
# ---------------------------------------------------------------------------
[output]
# JPEG encoding quality (1 = worst, 100 = best). Other formats are lossless.
quality = 75

# Force every variant to one format (jpg, png, gif, tif, webp).
# Omit to keep each source image's own format.
# format = "jpg"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Presets
# ---------------------------------------------------------------------------
# Each [presets.<name>] is one reducer; `batch` writes every image once per
# preset into <output>/<name>/. Defining any preset replaces this whole list.
#
#   type 0  crop:       width, height, gravity -> exactly width x height
#   type 1  resize:     width, height          -> fits inside width x height
#   type 2  long side:  landscape, portrait    -> long side limited per orientation
#   type 3  short side: landscape, portrait    -> short side limited per orientation
#
# gravity: 0 top-left    1 top-center    2 top-right
#          3 middle-left 4 middle-center 5 middle-right
#          6 bottom-left 7 bottom-center 8 bottom-right
[presets.thumb]
type = 0
width = 200
height = 200
gravity = 4

[presets.web]
type = 2
landscape = 1600
portrait = 1200
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::Gravity;
    use crate::reducer::ReducerType;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = PixfitConfig::default();
        assert_eq!(config.output.quality, 75);
        assert_eq!(config.output.format, None);
        assert_eq!(config.processing.max_processes, None);
        assert_eq!(
            config.presets.keys().collect::<Vec<_>>(),
            vec!["thumb", "web"]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let config: PixfitConfig = toml::from_str("[output]\nquality = 90\n").unwrap();
        assert_eq!(config.output.quality, 90);
        assert_eq!(config.presets.len(), 2);
    }

    #[test]
    fn parse_preset_records() {
        let toml_str = r#"
[presets.square]
type = 0
width = 300
height = 300
gravity = 1

[presets.small]
type = 3
landscape = 240
portrait = 320
"#;
        let config: PixfitConfig = toml::from_str(toml_str).unwrap();
        let square = config.preset("square").unwrap();
        assert_eq!(square.kind(), ReducerType::Crop);
        assert_eq!(square.gravity(), Gravity::TopCenter);
        let small = config.preset("small").unwrap();
        assert_eq!((small.landscape(), small.portrait()), (240, 320));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn quality_out_of_range_rejected() {
        for quality in [0, 101] {
            let mut config = PixfitConfig::default();
            config.output.quality = quality;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::Validation(msg)) if msg.contains("quality")
            ));
        }
    }

    #[test]
    fn empty_presets_rejected() {
        let config = PixfitConfig {
            presets: BTreeMap::new(),
            ..PixfitConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_output_format_rejected() {
        let mut config = PixfitConfig::default();
        config.output.format = Some("bmp".into());
        assert!(config.validate().is_err());
        config.output.format = Some("JPG".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn preset_names_must_be_directory_names() {
        for bad in ["", "..", "a/b", "a\\b"] {
            let mut config = PixfitConfig::default();
            config
                .presets
                .insert(bad.to_string(), ImageSizeReducer::resizer(1, 1).unwrap());
            assert!(config.validate().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn invalid_preset_record_rejected() {
        let toml_str = r#"
[presets.broken]
type = 1
width = 0
height = 10
"#;
        assert!(toml::from_str::<PixfitConfig>(toml_str).is_err());
    }

    #[test]
    fn preset_unknown_key_rejected() {
        let toml_str = r#"
[presets.broken]
type = 1
width = 10
height = 10
colour = 3
"#;
        assert!(toml::from_str::<PixfitConfig>(toml_str).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        assert!(toml::from_str::<PixfitConfig>("[outptu]\nquality = 1\n").is_err());
    }

    // =========================================================================
    // effective_threads
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_zero_means_one() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // Merging and loading
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("quality = 90").unwrap();
        let overlay: toml::Value = toml::from_str("quality = 70").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("quality").unwrap().as_integer(), Some(70));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(1));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(3));
    }

    #[test]
    fn user_presets_replace_stock_presets() {
        let overlay: toml::Value = toml::from_str(
            r#"
[presets.tiny]
type = 1
width = 32
height = 32
"#,
        )
        .unwrap();
        let config = resolve_config(stock_defaults_value().unwrap(), Some(overlay)).unwrap();
        assert_eq!(config.presets.keys().collect::<Vec<_>>(), vec!["tiny"]);
        assert_eq!(config.output.quality, 75);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, PixfitConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, "[output]\nquality = 40\nformat = \"png\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.output.quality, 40);
        assert_eq!(config.output.format.as_deref(), Some("png"));
        assert_eq!(config.presets.len(), 2);
    }

    #[test]
    fn load_config_invalid_toml_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, "[output\nquality = ").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, "[output]\nquality = 0\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_config_toml_matches_defaults() {
        let config: PixfitConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, PixfitConfig::default());
    }
}
