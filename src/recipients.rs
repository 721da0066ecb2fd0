//! Recipient table loading.
//!
//! The data source is a CSV file with a header row. Columns are matched by
//! name, so their order does not matter and extra columns are ignored:
//!
//! ```text
//! slug,title,to_name,message,from_name,hero_image_url,gallery_urls,video_url,video_type,music_url,theme
//! anna,,Anna,"Warm wishes!",Max,https://…/hero.jpg,a.jpg | b.jpg,https://youtu.be/X,,,
//! ```
//!
//! ## Defaulting Rules
//!
//! Every data row becomes exactly one [`Recipient`]; nothing is rejected for
//! missing data. Cells are trimmed, and an empty or absent cell becomes:
//!
//! | Column | Default |
//! |--------|---------|
//! | `slug` | normalized text, `"page"` when nothing survives |
//! | `title` | `defaults.title` from config |
//! | `video_type` | `defaults.video_type` (lowercased) |
//! | `theme` | `defaults.theme` (lowercased) |
//! | `*_url` singles | `None` |
//! | `gallery_urls` | `[]` |
//! | other text | `""` |
//!
//! Only unreadable files and malformed CSV/UTF-8 are errors.

use crate::config::DefaultsConfig;
use crate::naming::normalize_slug;
use crate::video::VideoKind;
use csv::StringRecord;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Separator between items of the `gallery_urls` column.
pub const GALLERY_DELIMITER: char = '|';

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// One input row, normalized. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipient {
    pub slug: String,
    pub title: String,
    pub to_name: String,
    pub message: String,
    pub from_name: String,
    pub hero_image_url: Option<String>,
    pub gallery_urls: Vec<String>,
    pub video_url: Option<String>,
    pub video_type: VideoKind,
    pub music_url: Option<String>,
    pub theme: String,
}

/// Split a `gallery_urls` cell on `|`, trimming items and dropping empties.
pub fn parse_gallery(raw: &str) -> Vec<String> {
    raw.split(GALLERY_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Header name → column position.
struct Columns(HashMap<String, usize>);

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let map = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim_start_matches('\u{feff}').trim().to_string(), i))
            .collect();
        Columns(map)
    }

    /// Trimmed cell value; `""` for absent columns or short rows.
    fn cell<'r>(&self, record: &'r StringRecord, name: &str) -> &'r str {
        self.0
            .get(name)
            .and_then(|&i| record.get(i))
            .map(str::trim)
            .unwrap_or("")
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn or_default<'a>(s: &'a str, default: &'a str) -> &'a str {
    if s.is_empty() { default.trim() } else { s }
}

impl Recipient {
    fn from_record(record: &StringRecord, columns: &Columns, defaults: &DefaultsConfig) -> Self {
        let cell = |name: &str| columns.cell(record, name);

        Recipient {
            slug: normalize_slug(cell("slug")),
            title: or_default(cell("title"), &defaults.title).to_string(),
            to_name: cell("to_name").to_string(),
            message: cell("message").to_string(),
            from_name: cell("from_name").to_string(),
            hero_image_url: non_empty(cell("hero_image_url")),
            gallery_urls: parse_gallery(cell("gallery_urls")),
            video_url: non_empty(cell("video_url")),
            video_type: VideoKind::parse(or_default(cell("video_type"), &defaults.video_type)),
            music_url: non_empty(cell("music_url")),
            theme: or_default(cell("theme"), &defaults.theme).to_lowercase(),
        }
    }

    /// Name shown next to the slug on the index page.
    pub fn display_name(&self) -> &str {
        &self.to_name
    }
}

/// Load every row of the recipient table, in file order.
pub fn load_recipients(path: &Path, defaults: &DefaultsConfig) -> Result<Vec<Recipient>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_recipients(file, defaults).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse recipients from any CSV reader.
pub fn read_recipients<R: std::io::Read>(
    reader: R,
    defaults: &DefaultsConfig,
) -> Result<Vec<Recipient>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::from_headers(csv_reader.headers()?);
    let mut recipients = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        recipients.push(Recipient::from_record(&record, &columns, defaults));
    }
    tracing::debug!(count = recipients.len(), "loaded recipients");
    Ok(recipients)
}
