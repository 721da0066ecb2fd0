//! Site assembly.
//!
//! Orchestrates a full build from the recipient table to the publishable
//! directory. Steps run in this order, and each is safe to rerun:
//!
//! 1. Ensure the publish root exists
//! 2. Clean the generated-pages subtree (`p/`) and nothing else
//! 3. Load recipients
//! 4. Check for duplicate slugs (warn or reject, per config)
//! 5. Copy static assets into `static/`
//! 6. Per recipient: render and write `p/<slug>/index.html`, write QR codes
//! 7. Write `index.html` listing every recipient
//!
//! ## Output Structure
//!
//! ```text
//! docs/                       # publish root
//! ├── index.html
//! ├── static/
//! │   ├── style.css
//! │   └── page.js
//! └── p/
//!     ├── anna/index.html
//!     └── bob/index.html
//!
//! out/qr/                     # codes root, never published
//! ├── anna.png
//! ├── anna.svg
//! └── ...
//! ```
//!
//! ## Parallel Processing
//!
//! Step 6 runs on a [rayon](https://docs.rs/rayon) pool. Duplicate slugs are
//! resolved before it starts (only the last row of each slug is written), so
//! every worker owns a disjoint page directory and code filenames. The result
//! is identical to a sequential last-write-wins run.

use crate::codes::{CodeBackend, CodeError, CodePaths, QrBackend, generate_codes};
use crate::config::{self, DuplicateSlugPolicy, SiteConfig};
use crate::recipients::{LoadError, Recipient, load_recipients};
use crate::render::{PAGE_ROOT, PageContext, render_index, render_page};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Generated-pages subtree under the publish root.
pub const PAGES_DIR: &str = "p";
/// Static-assets subtree under the publish root.
pub const STATIC_DIR: &str = "static";

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("QR codes for {slug}: {source}")]
    Code {
        slug: String,
        #[source]
        source: CodeError,
    },
    #[error("Duplicate slug {slug:?} in rows {rows:?}")]
    DuplicateSlug { slug: String, rows: Vec<usize> },
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> SiteError {
    move |source| SiteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Several rows normalized to the same slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSlug {
    pub slug: String,
    /// 1-based data row numbers (header excluded), in file order.
    pub rows: Vec<usize>,
}

/// One generated page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub slug: String,
    pub to_name: String,
    /// Written file, relative to the publish root.
    pub page_path: String,
    pub url: String,
    pub codes: CodePaths,
}

/// What a build produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub publish_root: PathBuf,
    pub codes_dir: PathBuf,
    pub pages: Vec<PageReport>,
    pub duplicates: Vec<DuplicateSlug>,
    /// Number of static files copied; `None` when the source dir is missing.
    pub static_files: Option<usize>,
    /// Rows loaded, including ones shadowed by a duplicate slug.
    pub recipient_count: usize,
}

/// Builds the site described by a [`SiteConfig`].
pub struct Site<B: CodeBackend = QrBackend> {
    config: SiteConfig,
    backend: B,
}

impl Site<QrBackend> {
    pub fn new(config: SiteConfig) -> Self {
        let backend = QrBackend::new(&config.codes);
        Self { config, backend }
    }
}

impl<B: CodeBackend> Site<B> {
    pub fn with_backend(config: SiteConfig, backend: B) -> Self {
        Self { config, backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load the recipient table named in the config.
    pub fn load_recipients(&self) -> Result<Vec<Recipient>, SiteError> {
        Ok(load_recipients(
            &self.config.paths.data_file,
            &self.config.defaults,
        )?)
    }

    /// Run the full build.
    pub fn build(&self) -> Result<BuildReport, SiteError> {
        let paths = &self.config.paths;
        let publish_root = &paths.publish_root;

        fs::create_dir_all(publish_root).map_err(io_error(publish_root))?;
        clean_generated_pages(publish_root)?;

        let recipients = self.load_recipients()?;
        tracing::info!(count = recipients.len(), "recipients loaded");

        let duplicates = find_duplicates(&recipients);
        if let Some(first) = duplicates.first() {
            if self.config.build.duplicate_slugs == DuplicateSlugPolicy::Reject {
                return Err(SiteError::DuplicateSlug {
                    slug: first.slug.clone(),
                    rows: first.rows.clone(),
                });
            }
            for dup in &duplicates {
                tracing::warn!(slug = %dup.slug, rows = ?dup.rows, "duplicate slug, last row wins");
            }
        }

        let static_files = copy_static(&paths.static_dir, &publish_root.join(STATIC_DIR))?;

        let unique = last_per_slug(&recipients);
        let pages = self.build_pages(&unique)?;

        let index_path = publish_root.join("index.html");
        let index = render_index(&self.config.site_title, &recipients);
        fs::write(&index_path, index.into_string()).map_err(io_error(&index_path))?;
        tracing::info!(pages = pages.len(), "site generated");

        Ok(BuildReport {
            publish_root: publish_root.clone(),
            codes_dir: paths.codes_dir.clone(),
            pages,
            duplicates,
            static_files,
            recipient_count: recipients.len(),
        })
    }

    fn build_pages(&self, recipients: &[&Recipient]) -> Result<Vec<PageReport>, SiteError> {
        let threads = config::effective_threads(&self.config.processing);
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        pool.install(|| {
            recipients
                .par_iter()
                .map(|r| self.build_page(r))
                .collect()
        })
    }

    /// Render, write, and encode one recipient page.
    fn build_page(&self, recipient: &Recipient) -> Result<PageReport, SiteError> {
        let slug = &recipient.slug;
        let page_dir = self.config.paths.publish_root.join(PAGES_DIR).join(slug);
        fs::create_dir_all(&page_dir).map_err(io_error(&page_dir))?;

        let url = self.config.page_url(slug);
        let ctx = PageContext {
            root: PAGE_ROOT,
            page_url: &url,
        };
        let page_path = page_dir.join("index.html");
        let html = render_page(recipient, &ctx);
        fs::write(&page_path, html.into_string()).map_err(io_error(&page_path))?;

        let codes = generate_codes(&self.backend, slug, &url, &self.config.paths.codes_dir)
            .map_err(|source| SiteError::Code {
                slug: slug.clone(),
                source,
            })?;
        tracing::debug!(slug = %slug, "page written");

        Ok(PageReport {
            slug: slug.clone(),
            to_name: recipient.to_name.clone(),
            page_path: format!("{PAGES_DIR}/{slug}/index.html"),
            url,
            codes,
        })
    }
}

/// Remove the generated-pages subtree (`<publish_root>/p`).
///
/// Files are deleted depth-first, then each directory is removed bottom-up.
/// A directory that cannot be removed (e.g. it gained a stray entry) is left
/// in place. A missing subtree is not an error.
pub fn clean_generated_pages(publish_root: &Path) -> Result<(), SiteError> {
    let pages_dir = publish_root.join(PAGES_DIR);
    if !pages_dir.exists() {
        return Ok(());
    }

    for entry in WalkDir::new(&pages_dir).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_dir() {
            if let Err(err) = fs::remove_dir(path) {
                tracing::debug!(path = %path.display(), error = %err, "directory left in place");
            }
        } else {
            fs::remove_file(path).map_err(io_error(path))?;
        }
    }
    Ok(())
}

/// Copy regular files (not subdirectories) from `src` into `dst`,
/// overwriting same-named files.
///
/// `dst` is always created. Returns the number of files copied, or `None`
/// when `src` does not exist.
pub fn copy_static(src: &Path, dst: &Path) -> Result<Option<usize>, SiteError> {
    fs::create_dir_all(dst).map_err(io_error(dst))?;
    if !src.is_dir() {
        tracing::warn!(path = %src.display(), "static assets directory not found");
        return Ok(None);
    }

    let mut files: Vec<PathBuf> = fs::read_dir(src)
        .map_err(io_error(src))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()
        .map_err(io_error(src))?;
    files.retain(|p| p.is_file());
    files.sort();

    for path in &files {
        if let Some(name) = path.file_name() {
            let target = dst.join(name);
            fs::copy(path, &target).map_err(io_error(&target))?;
        }
    }
    Ok(Some(files.len()))
}

/// Slugs that occur on more than one row, in order of first occurrence.
pub fn find_duplicates(recipients: &[Recipient]) -> Vec<DuplicateSlug> {
    let mut rows_by_slug: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for (i, r) in recipients.iter().enumerate() {
        let rows = rows_by_slug.entry(r.slug.as_str()).or_default();
        if rows.is_empty() {
            order.push(&r.slug);
        }
        rows.push(i + 1);
    }

    order
        .into_iter()
        .filter_map(|slug| {
            let rows = rows_by_slug.remove(slug)?;
            (rows.len() > 1).then(|| DuplicateSlug {
                slug: slug.to_string(),
                rows,
            })
        })
        .collect()
}

/// The last recipient of each slug, in load order.
fn last_per_slug(recipients: &[Recipient]) -> Vec<&Recipient> {
    let last_index: HashMap<&str, usize> = recipients
        .iter()
        .enumerate()
        .map(|(i, r)| (r.slug.as_str(), i))
        .collect();
    recipients
        .iter()
        .enumerate()
        .filter(|(i, r)| last_index.get(r.slug.as_str()) == Some(i))
        .map(|(_, r)| r)
        .collect()
}
