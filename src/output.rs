//! CLI output formatting.
//!
//! Output is **information-centric**: every recipient leads with its positional
//! index and slug, with details on indented context lines. Each command has a
//! `format_*` function (returns `Vec<String>`, pure, no I/O) for testability
//! and a `print_*` wrapper that writes to stdout.
//!
//! ## Check
//!
//! ```text
//! Recipients
//! 001 anna → Anna
//!     Title: Happy New Year!
//!     Theme: snow
//!     Media: hero, 3 photos, video (youtube), music
//! 002 bob → Bob
//!     Title: Happy New Year!
//!     Theme: snow
//!
//! 2 recipients, 2 pages
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! Static: 2 files → static/
//! 001 anna → Anna
//!     Page: p/anna/index.html
//!     URL: https://example.github.io/qr-gifts/p/anna/
//!     QR: out/qr/anna.png, out/qr/anna.svg
//! 002 bob → Bob
//!     Page: p/bob/index.html
//!     URL: https://example.github.io/qr-gifts/p/bob/
//!     QR: out/qr/bob.png, out/qr/bob.svg
//!
//! Generated 2 pages from 2 recipients
//! OK: generated pages in docs
//! OK: qr codes in out/qr (not committed)
//! ```

use crate::recipients::Recipient;
use crate::site::{BuildReport, DuplicateSlug, STATIC_DIR};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `001 anna → Anna`, or just `001 anna` for a nameless recipient.
fn entity_header(index: usize, slug: &str, name: &str) -> String {
    if name.is_empty() {
        format!("{} {}", format_index(index), slug)
    } else {
        format!("{} {} \u{2192} {}", format_index(index), slug, name)
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

/// Comma-separated summary of a recipient's media, or `None` when it has none.
fn media_summary(r: &Recipient) -> Option<String> {
    let mut parts = Vec::new();
    if r.hero_image_url.is_some() {
        parts.push("hero".to_string());
    }
    if !r.gallery_urls.is_empty() {
        parts.push(plural(r.gallery_urls.len(), "photo", "photos"));
    }
    if r.video_url.is_some() {
        parts.push(format!("video ({})", r.video_type));
    }
    if r.music_url.is_some() {
        parts.push("music".to_string());
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn duplicate_line(dup: &DuplicateSlug) -> String {
    let rows: Vec<String> = dup.rows.iter().map(|r| r.to_string()).collect();
    format!(
        "Warning: slug \"{}\" used by rows {} (last row wins)",
        dup.slug,
        rows.join(", ")
    )
}

// ============================================================================
// Check output
// ============================================================================

/// Format the recipient inventory shown by `check`.
pub fn format_check_output(recipients: &[Recipient], duplicates: &[DuplicateSlug]) -> Vec<String> {
    let mut lines = vec!["Recipients".to_string()];

    for (i, r) in recipients.iter().enumerate() {
        lines.push(entity_header(i + 1, &r.slug, &r.to_name));
        lines.push(format!("{}Title: {}", indent(1), r.title));
        lines.push(format!("{}Theme: {}", indent(1), r.theme));
        if let Some(media) = media_summary(r) {
            lines.push(format!("{}Media: {}", indent(1), media));
        }
    }

    if !duplicates.is_empty() {
        lines.push(String::new());
        lines.extend(duplicates.iter().map(duplicate_line));
    }

    let shadowed: usize = duplicates.iter().map(|d| d.rows.len() - 1).sum();
    let page_count = recipients.len() - shadowed;
    lines.push(String::new());
    lines.push(format!(
        "{}, {}",
        plural(recipients.len(), "recipient", "recipients"),
        plural(page_count, "page", "pages")
    ));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(recipients: &[Recipient], duplicates: &[DuplicateSlug]) {
    for line in format_check_output(recipients, duplicates) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the result of a full build, ending with the two confirmation lines.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = vec!["Home \u{2192} index.html".to_string()];

    match report.static_files {
        Some(n) => lines.push(format!(
            "Static: {} \u{2192} {}/",
            plural(n, "file", "files"),
            STATIC_DIR
        )),
        None => lines.push("Static: source directory missing, nothing copied".to_string()),
    }

    for (i, page) in report.pages.iter().enumerate() {
        lines.push(entity_header(i + 1, &page.slug, &page.to_name));
        lines.push(format!("{}Page: {}", indent(1), page.page_path));
        lines.push(format!("{}URL: {}", indent(1), page.url));
        lines.push(format!(
            "{}QR: {}, {}",
            indent(1),
            page.codes.png.display(),
            page.codes.svg.display()
        ));
    }

    if !report.duplicates.is_empty() {
        lines.push(String::new());
        lines.extend(report.duplicates.iter().map(duplicate_line));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {} from {}",
        plural(report.pages.len(), "page", "pages"),
        plural(report.recipient_count, "recipient", "recipients")
    ));
    lines.push(format!(
        "OK: generated pages in {}",
        report.publish_root.display()
    ));
    lines.push(format!(
        "OK: qr codes in {} (not committed)",
        report.codes_dir.display()
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::CodePaths;
    use crate::site::PageReport;
    use crate::test_helpers::recipient;
    use std::path::{Path, PathBuf};

    fn page(slug: &str) -> PageReport {
        PageReport {
            slug: slug.to_string(),
            to_name: String::new(),
            page_path: format!("p/{slug}/index.html"),
            url: format!("https://gifts.example/p/{slug}/"),
            codes: CodePaths::for_slug(Path::new("out/qr"), slug),
        }
    }

    fn report(pages: Vec<PageReport>) -> BuildReport {
        BuildReport {
            publish_root: PathBuf::from("docs"),
            codes_dir: PathBuf::from("out/qr"),
            recipient_count: pages.len(),
            pages,
            duplicates: vec![],
            static_files: Some(2),
        }
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(1), "    ");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn entity_header_with_and_without_name() {
        assert_eq!(entity_header(1, "anna", "Anna"), "001 anna \u{2192} Anna");
        assert_eq!(entity_header(2, "bob", ""), "002 bob");
    }

    #[test]
    fn media_summary_lists_present_media() {
        let mut r = recipient("a");
        assert_eq!(media_summary(&r), None);

        r.hero_image_url = Some("h.jpg".to_string());
        r.gallery_urls = vec!["1.jpg".to_string()];
        r.video_url = Some("https://youtu.be/x".to_string());
        r.music_url = Some("m.mp3".to_string());
        assert_eq!(
            media_summary(&r).as_deref(),
            Some("hero, 1 photo, video (youtube), music")
        );
    }

    #[test]
    fn build_output_ends_with_confirmation_lines() {
        let lines = format_build_output(&report(vec![page("anna")]));
        let n = lines.len();
        assert_eq!(lines[n - 2], "OK: generated pages in docs");
        assert_eq!(lines[n - 1], "OK: qr codes in out/qr (not committed)");
    }

    #[test]
    fn build_output_lists_pages() {
        let lines = format_build_output(&report(vec![page("anna"), page("bob")]));
        assert_eq!(lines[0], "Home \u{2192} index.html");
        assert_eq!(lines[1], "Static: 2 files \u{2192} static/");
        assert_eq!(lines[2], "001 anna");
        assert_eq!(lines[3], "    Page: p/anna/index.html");
        assert_eq!(lines[4], "    URL: https://gifts.example/p/anna/");
        assert_eq!(lines[5], "    QR: out/qr/anna.png, out/qr/anna.svg");
        assert_eq!(lines[6], "002 bob");
        assert!(lines.contains(&"Generated 2 pages from 2 recipients".to_string()));
    }

    #[test]
    fn build_output_shows_recipient_name() {
        let mut anna = page("anna");
        anna.to_name = "Anna".to_string();
        let lines = format_build_output(&report(vec![anna]));
        assert_eq!(lines[2], "001 anna \u{2192} Anna");
    }

    #[test]
    fn build_output_reports_missing_static_and_duplicates() {
        let mut r = report(vec![page("anna")]);
        r.static_files = None;
        r.recipient_count = 2;
        r.duplicates = vec![DuplicateSlug {
            slug: "anna".to_string(),
            rows: vec![1, 2],
        }];
        let lines = format_build_output(&r);
        assert_eq!(lines[1], "Static: source directory missing, nothing copied");
        assert!(lines.contains(
            &"Warning: slug \"anna\" used by rows 1, 2 (last row wins)".to_string()
        ));
        assert!(lines.contains(&"Generated 1 page from 2 recipients".to_string()));
    }

    #[test]
    fn check_output_shows_recipients() {
        let mut anna = recipient("anna");
        anna.to_name = "Anna".to_string();
        anna.gallery_urls = vec!["1.jpg".to_string(), "2.jpg".to_string()];
        let bob = recipient("bob");

        let lines = format_check_output(&[anna, bob], &[]);
        assert_eq!(
            lines,
            vec![
                "Recipients",
                "001 anna \u{2192} Anna",
                "    Title: Happy New Year!",
                "    Theme: snow",
                "    Media: 2 photos",
                "002 bob",
                "    Title: Happy New Year!",
                "    Theme: snow",
                "",
                "2 recipients, 2 pages",
            ]
        );
    }

    #[test]
    fn check_output_counts_pages_after_duplicates() {
        let rs = vec![recipient("a"), recipient("a"), recipient("a")];
        let dups = vec![DuplicateSlug {
            slug: "a".to_string(),
            rows: vec![1, 2, 3],
        }];
        let lines = format_check_output(&rs, &dups);
        assert_eq!(lines.last().unwrap(), "3 recipients, 1 page");
    }
}
