//! Shared test utilities for the qr-gifts test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let config = setup_site(tmp.path(), &[("anna", "Anna"), ("bob", "Bob")]);
//! let report = Site::with_backend(config, MockBackend::default()).build().unwrap();
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SiteConfig;
use crate::recipients::Recipient;
use crate::video::VideoKind;

// =========================================================================
// Records
// =========================================================================

/// A recipient with the given slug and every other field at its load default.
pub fn recipient(slug: &str) -> Recipient {
    Recipient {
        slug: slug.to_string(),
        title: "Happy New Year!".to_string(),
        to_name: String::new(),
        message: String::new(),
        from_name: String::new(),
        hero_image_url: None,
        gallery_urls: Vec::new(),
        video_url: None,
        video_type: VideoKind::YouTube,
        music_url: None,
        theme: "snow".to_string(),
    }
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `data/recipients.csv` under `dir` with one `(slug, to_name)` row per
/// entry and return its path.
pub fn write_csv(dir: &Path, rows: &[(&str, &str)]) -> PathBuf {
    let data_dir = dir.join("data");
    fs::create_dir_all(&data_dir).unwrap();
    let path = data_dir.join("recipients.csv");

    let mut writer = csv::Writer::from_path(&path).unwrap();
    writer.write_record(["slug", "to_name", "message"]).unwrap();
    for (slug, to_name) in rows {
        writer
            .write_record([*slug, *to_name, "Best wishes"])
            .unwrap();
    }
    writer.flush().unwrap();
    path
}

/// Lay out a complete project under `root` and return a config pointing at it.
///
/// ```text
/// root/
/// ├── data/recipients.csv
/// ├── static/style.css
/// ├── docs/          (publish root, created by the build)
/// └── out/qr/        (codes dir, created by the build)
/// ```
pub fn setup_site(root: &Path, rows: &[(&str, &str)]) -> SiteConfig {
    let data_file = write_csv(root, rows);
    let static_dir = root.join("static");
    fs::create_dir_all(&static_dir).unwrap();
    fs::write(static_dir.join("style.css"), "body { margin: 0; }").unwrap();

    let mut config = SiteConfig {
        site_base_url: "https://gifts.example".to_string(),
        ..SiteConfig::default()
    };
    config.paths.data_file = data_file;
    config.paths.static_dir = static_dir;
    config.paths.publish_root = root.join("docs");
    config.paths.codes_dir = root.join("out").join("qr");
    config
}
