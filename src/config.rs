//! Site configuration module.
//!
//! Handles loading, validating, and merging `qr-gifts.toml`. Every value has a
//! stock default; a config file only needs the keys it wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_base_url = "https://example.github.io/qr-gifts"
//! site_title = "QR Gifts"
//!
//! [paths]
//! data_file = "data/recipients.csv"   # Recipient table (CSV with header row)
//! static_dir = "static"               # Copied to <publish_root>/static/
//! publish_root = "docs"               # Served as the public site
//! codes_dir = "out/qr"                # QR images, kept out of the site
//!
//! [defaults]
//! title = "Happy New Year!"
//! video_type = "youtube"
//! theme = "snow"
//!
//! [codes]
//! png_module_size = 10      # Pixels per QR module in the PNG
//! svg_scale = 8             # Units per QR module in the SVG
//!
//! [build]
//! duplicate_slugs = "overwrite"   # or "reject"
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Relative paths resolve against the directory holding the config file, or
//! the working directory when no file is used.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config filename looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "qr-gifts.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `qr-gifts.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Public URL the publish root is served from. Page URLs encoded in the
    /// QR codes are `<site_base_url>/p/<slug>/`.
    pub site_base_url: String,
    /// Heading and `<title>` of the generated index page.
    pub site_title: String,
    pub paths: PathsConfig,
    /// Fallbacks for empty recipient cells.
    pub defaults: DefaultsConfig,
    pub codes: CodesConfig,
    pub build: BuildConfig,
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_base_url: "https://example.github.io/qr-gifts".to_string(),
            site_title: "QR Gifts".to_string(),
            paths: PathsConfig::default(),
            defaults: DefaultsConfig::default(),
            codes: CodesConfig::default(),
            build: BuildConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.site_base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "site_base_url must be an http(s) URL, got {base:?}"
            )));
        }
        if self.codes.png_module_size == 0 || self.codes.svg_scale == 0 {
            return Err(ConfigError::Validation(
                "codes.png_module_size and codes.svg_scale must be non-zero".into(),
            ));
        }
        if self.defaults.theme.trim().is_empty() {
            return Err(ConfigError::Validation(
                "defaults.theme must not be empty".into(),
            ));
        }
        if self.defaults.video_type.trim().is_empty() {
            return Err(ConfigError::Validation(
                "defaults.video_type must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Canonical public URL of a recipient page.
    pub fn page_url(&self, slug: &str) -> String {
        page_url(&self.site_base_url, slug)
    }

    /// Return a copy with every relative path joined onto `base_dir`.
    pub fn resolve_paths(mut self, base_dir: &Path) -> Self {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base_dir.join(&*p);
            }
        };
        resolve(&mut self.paths.data_file);
        resolve(&mut self.paths.static_dir);
        resolve(&mut self.paths.publish_root);
        resolve(&mut self.paths.codes_dir);
        self
    }
}

/// `<base>/p/<slug>/`, tolerating a trailing slash on `base`.
pub fn page_url(base: &str, slug: &str) -> String {
    format!("{}/p/{}/", base.trim().trim_end_matches('/'), slug)
}

/// Input and output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub data_file: PathBuf,
    pub static_dir: PathBuf,
    pub publish_root: PathBuf,
    pub codes_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/recipients.csv"),
            static_dir: PathBuf::from("static"),
            publish_root: PathBuf::from("docs"),
            codes_dir: PathBuf::from("out/qr"),
        }
    }
}

/// Values substituted for empty `title`, `video_type` and `theme` cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    pub title: String,
    pub video_type: String,
    pub theme: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            title: "Happy New Year!".to_string(),
            video_type: "youtube".to_string(),
            theme: "snow".to_string(),
        }
    }
}

/// QR image rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodesConfig {
    /// Pixels per module in the PNG output.
    pub png_module_size: u32,
    /// Units per module in the SVG output.
    pub svg_scale: u32,
}

impl Default for CodesConfig {
    fn default() -> Self {
        Self {
            png_module_size: 10,
            svg_scale: 8,
        }
    }
}

/// What to do when two rows normalize to the same slug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateSlugPolicy {
    /// Last row wins; each collision is reported as a warning.
    #[default]
    Overwrite,
    /// Abort the build before any page is written.
    Reject,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub duplicate_slugs: DuplicateSlugPolicy,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel page/code workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
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
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
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

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a file path.
///
/// A missing file is not an error: stock defaults are used and relative paths
/// resolve against the file's (would-be) parent directory.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let overlay = if path.exists() {
        let content = fs::read_to_string(path)?;
        Some(toml::from_str::<toml::Value>(&content)?)
    } else {
        None
    };
    let config = resolve_config(overlay)?;
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(base_dir) => Ok(config.resolve_paths(base_dir)),
        None => Ok(config),
    }
}

/// Returns a fully-commented stock `qr-gifts.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# QR Gifts Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Public URL the publish root is served from. Each QR code encodes
# <site_base_url>/p/<slug>/
site_base_url = "https://example.github.io/qr-gifts"

# Heading of the generated index page.
site_title = "QR Gifts"

# ---------------------------------------------------------------------------
# Paths (relative paths resolve against this file's directory)
# ---------------------------------------------------------------------------
[paths]
# Recipient table: CSV with a header row.
data_file = "data/recipients.csv"

# Files in this directory (not subdirectories) are copied to
# <publish_root>/static/ on every build.
static_dir = "static"

# The public site. Only <publish_root>/p/ is cleaned between builds.
publish_root = "docs"

# QR images go here. Keep it out of the published site: anyone holding a
# code can open the page it points at.
codes_dir = "out/qr"

# ---------------------------------------------------------------------------
# Defaults for empty recipient cells
# ---------------------------------------------------------------------------
[defaults]
title = "Happy New Year!"
video_type = "youtube"
theme = "snow"

# ---------------------------------------------------------------------------
# QR code rendering
# ---------------------------------------------------------------------------
[codes]
# Pixels per QR module in <slug>.png
png_module_size = 10

# Units per QR module in <slug>.svg
svg_scale = 8

# ---------------------------------------------------------------------------
# Build behavior
# ---------------------------------------------------------------------------
[build]
# Two rows normalizing to the same slug:
#   "overwrite" - the later row wins, a warning is printed
#   "reject"    - the build fails before writing any page
duplicate_slugs = "overwrite"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page/code workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
