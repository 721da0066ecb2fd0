//! # QR Gifts
//!
//! A build-time generator for personalized greeting pages. Each row of a CSV
//! table becomes a static web page plus a QR code that links to it, so the
//! code can be printed on a card or sent privately.
//!
//! # Pipeline
//!
//! ```text
//! data/recipients.csv ──load──▶ Vec<Recipient> ──render──▶ docs/p/<slug>/index.html
//!                                       │
//!                                       └──encode──▶ out/qr/<slug>.{png,svg}
//! ```
//!
//! A run is a single pass: clean the generated pages, load rows, copy static
//! assets, write one page and two QR images per recipient, then write the
//! index. Rerunning with unchanged input produces byte-identical output.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `qr-gifts.toml` loading, defaults, validation |
//! | [`recipients`] | CSV loading into strongly typed [`recipients::Recipient`] values |
//! | [`naming`] | Slug normalization |
//! | [`video`] | YouTube share link → embeddable player URL |
//! | [`render`] | Maud templates for recipient pages and the index |
//! | [`codes`] | QR code generation (PNG + SVG) |
//! | [`site`] | Orchestrates a full build |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Every interpolation is auto-escaped, and the index page uses
//! the same templates as the recipient pages, so user-supplied names are
//! escaped everywhere.
//!
//! ## Codes Live Outside the Site
//!
//! Pages are unlisted but public: anyone holding a QR code can open its page.
//! Codes are therefore written to a separate directory that is never part of
//! the published tree.
//!
//! ## Explicit Configuration
//!
//! Base URL, paths and defaults live in one [`config::SiteConfig`] value that
//! is passed to [`site::Site::new`]; nothing is read from globals.

pub mod codes;
pub mod config;
pub mod naming;
pub mod output;
pub mod recipients;
pub mod render;
pub mod site;
pub mod video;

#[cfg(test)]
pub(crate) mod test_helpers;
