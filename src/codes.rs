//! QR code image generation.
//!
//! Each recipient page gets two QR images encoding its public URL:
//!
//! ```text
//! out/qr/
//! ├── anna.png    # raster, for printing on cards
//! └── anna.svg    # vector, scales to any size
//! ```
//!
//! The codes directory is deliberately separate from the publish root. A code
//! is effectively the key to its page, so codes are handed out privately and
//! never committed alongside the site.
//!
//! The [`CodeBackend`] trait is the seam between the build pipeline and the
//! encoder; [`QrBackend`] is the production implementation on top of the
//! `qrcode` and `image` crates.

use crate::config::CodesConfig;
use image::Luma;
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("QR encoding failed: {0}")]
    Qr(#[from] qrcode::types::QrError),
    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Encodes a URL into image files.
pub trait CodeBackend: Sync {
    /// Write a raster QR code for `url` to `path`.
    fn write_png(&self, url: &str, path: &Path) -> Result<(), CodeError>;

    /// Write a vector QR code for `url` to `path`.
    fn write_svg(&self, url: &str, path: &Path) -> Result<(), CodeError>;
}

/// `qrcode`-based backend. Both formats use the medium (M) error-correction
/// tier.
#[derive(Debug, Clone)]
pub struct QrBackend {
    png_module_size: u32,
    svg_scale: u32,
}

impl QrBackend {
    pub fn new(config: &CodesConfig) -> Self {
        Self {
            png_module_size: config.png_module_size,
            svg_scale: config.svg_scale,
        }
    }

    fn encode(url: &str) -> Result<QrCode, CodeError> {
        Ok(QrCode::with_error_correction_level(url.as_bytes(), EcLevel::M)?)
    }
}

impl Default for QrBackend {
    fn default() -> Self {
        Self::new(&CodesConfig::default())
    }
}

impl CodeBackend for QrBackend {
    fn write_png(&self, url: &str, path: &Path) -> Result<(), CodeError> {
        let image = Self::encode(url)?
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .module_dimensions(self.png_module_size, self.png_module_size)
            .build();
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    fn write_svg(&self, url: &str, path: &Path) -> Result<(), CodeError> {
        let document = Self::encode(url)?
            .render::<svg::Color>()
            .quiet_zone(true)
            .module_dimensions(self.svg_scale, self.svg_scale)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build();
        fs::write(path, document)?;
        Ok(())
    }
}

/// Files written for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePaths {
    pub png: PathBuf,
    pub svg: PathBuf,
}

impl CodePaths {
    pub fn for_slug(codes_dir: &Path, slug: &str) -> Self {
        Self {
            png: codes_dir.join(format!("{slug}.png")),
            svg: codes_dir.join(format!("{slug}.svg")),
        }
    }
}

/// Write `<slug>.png` and `<slug>.svg` encoding `url` into `codes_dir`.
pub fn generate_codes(
    backend: &dyn CodeBackend,
    slug: &str,
    url: &str,
    codes_dir: &Path,
) -> Result<CodePaths, CodeError> {
    fs::create_dir_all(codes_dir)?;
    let paths = CodePaths::for_slug(codes_dir, slug);
    backend.write_png(url, &paths.png)?;
    backend.write_svg(url, &paths.svg)?;
    tracing::debug!(slug, url, "wrote QR codes");
    Ok(paths)
}
