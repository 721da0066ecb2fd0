//! Slug normalization for recipient pages.
//!
//! Every recipient row carries a free-text `slug` column. Before it is used as
//! a directory name under `p/` and as the QR image filename it is reduced to a
//! URL-safe identifier:
//!
//! - `"Anna"` → `"anna"`
//! - `"  Café Gift! "` → `"caf-gift"`
//! - `"--a__b--"` → `"a-b"`
//! - `""`, `"!!!"` → `"page"`
//!
//! The result always matches `^[a-z0-9]+(-[a-z0-9]+)*$` or equals
//! [`FALLBACK_SLUG`].

/// Returned when nothing usable survives normalization.
pub const FALLBACK_SLUG: &str = "page";

/// Normalize arbitrary text into a URL-safe slug.
///
/// Trims and lowercases the input, turns every run of characters outside
/// `[a-z0-9-]` into a single hyphen, collapses repeated hyphens and strips
/// them from both ends. Never fails: empty or fully-invalid input yields
/// [`FALLBACK_SLUG`].
pub fn normalize_slug(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());

    for c in lowered.chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '-'
        };
        // Runs of hyphens (literal or substituted) collapse to one.
        if c == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push(c);
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}
