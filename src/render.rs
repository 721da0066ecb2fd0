//! HTML rendering for recipient pages and the site index.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Every interpolated value is escaped, so recipient text such as
//! `<script>` ends up as `&lt;script&gt;` in both the pages and the index.
//!
//! ## Generated Pages
//!
//! - **Recipient page** (`p/<slug>/index.html`): greeting card with optional
//!   hero image, gallery, video and background music
//! - **Index page** (`index.html`): list of every generated page
//!
//! Pages reference `static/style.css` and `static/page.js` relative to the
//! site root, so the site works from any base path.
//!
//! Sections whose fields are empty emit no markup at all.

use crate::recipients::Recipient;
use crate::video::embed_url_for;
use maud::{DOCTYPE, Markup, html};

/// Path from `p/<slug>/index.html` back to the publish root.
pub const PAGE_ROOT: &str = "../../";

/// Per-page values that are not part of the recipient record.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// Relative path to the publish root (ends with `/` or is empty).
    pub root: &'a str,
    /// Canonical public URL of the page.
    pub page_url: &'a str,
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    title: &str,
    root: &str,
    body_class: &str,
    head_extra: Markup,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                (head_extra)
                link rel="stylesheet" href={ (root) "static/style.css" };
            }
            body class=(body_class) {
                (content)
            }
        }
    }
}

fn hero(url: &str, alt: &str) -> Markup {
    html! {
        div.card.hero {
            img.hero-img src=(url) alt=(alt);
        }
    }
}

fn greeting(recipient: &Recipient) -> Markup {
    html! {
        div.card.greeting {
            @if !recipient.to_name.is_empty() {
                p.to { (recipient.to_name) }
            }
            h1 { (recipient.title) }
            @if !recipient.message.is_empty() {
                p.message { (recipient.message) }
            }
            @if !recipient.from_name.is_empty() {
                p.from { "— " (recipient.from_name) }
            }
            div.actions {
                button.btn id="shareBtn" type="button" { "Share" }
                @if let Some(music) = &recipient.music_url {
                    button.btn id="musicBtn" type="button" data-music=(music) { "▶ Play music" }
                    audio id="bgMusic" preload="none" {}
                }
            }
        }
    }
}

fn gallery(urls: &[String]) -> Markup {
    html! {
        div.card {
            h2 { "Photos" }
            div.gallery {
                @for url in urls {
                    a.gallery-item href=(url) target="_blank" rel="noopener" {
                        img src=(url) alt="" loading="lazy";
                    }
                }
            }
        }
    }
}

fn video_section(raw_url: &str, embed_url: Option<&str>) -> Markup {
    html! {
        div.card.video {
            h2 { "Video" }
            @if let Some(embed) = embed_url {
                div.video-frame {
                    iframe src=(embed) title="Video"
                        allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture"
                        allowfullscreen {}
                }
            } @else {
                video.video-player src=(raw_url) controls preload="metadata" {}
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Render one recipient's greeting page.
pub fn render_page(recipient: &Recipient, ctx: &PageContext) -> Markup {
    let embed_url = embed_url_for(recipient);
    let body_class = format!("theme-{}", recipient.theme);

    let head_extra = html! {
        link rel="canonical" href=(ctx.page_url);
        meta property="og:title" content=(recipient.title);
    };

    let content = html! {
        main.wrap data-theme=(recipient.theme) {
            @if let Some(url) = &recipient.hero_image_url {
                (hero(url, &recipient.title))
            }
            (greeting(recipient))
            @if !recipient.gallery_urls.is_empty() {
                (gallery(&recipient.gallery_urls))
            }
            @if let Some(url) = &recipient.video_url {
                (video_section(url, embed_url.as_deref()))
            }
            footer.small {
                "© " span id="year" {}
            }
        }
        script src={ (ctx.root) "static/page.js" } defer {}
    };

    base_document(&recipient.title, ctx.root, &body_class, head_extra, content)
}

/// Render the landing page listing every recipient in load order.
pub fn render_index(site_title: &str, recipients: &[Recipient]) -> Markup {
    let content = html! {
        div.wrap {
            div.card {
                h1 { (site_title) }
                p.small { "Generated pages:" }
            }
            div.card {
                @if recipients.is_empty() {
                    p.small { "No pages yet." }
                } @else {
                    ul.index-list {
                        @for r in recipients {
                            li {
                                a href={ "p/" (r.slug) "/" } { (r.slug) }
                                @if !r.display_name().is_empty() {
                                    " — " (r.display_name())
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base_document(site_title, "", "index", html! {}, content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::recipient;
    use crate::video::VideoKind;

    const URL: &str = "https://example.org/p/anna/";

    fn ctx() -> PageContext<'static> {
        PageContext {
            root: PAGE_ROOT,
            page_url: URL,
        }
    }

    fn full_recipient() -> Recipient {
        let mut r = recipient("anna");
        r.to_name = "Anna".to_string();
        r.message = "All the best".to_string();
        r.from_name = "Max".to_string();
        r.hero_image_url = Some("https://img.example/hero.jpg".to_string());
        r.gallery_urls = vec!["g1.jpg".to_string(), "g2.jpg".to_string()];
        r.video_url = Some("https://youtu.be/ABC123".to_string());
        r.music_url = Some("https://audio.example/song.mp3".to_string());
        r
    }

    #[test]
    fn page_includes_doctype_and_title() {
        let html = render_page(&full_recipient(), &ctx()).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Happy New Year!</title>"));
    }

    #[test]
    fn page_includes_text_fields() {
        let html = render_page(&full_recipient(), &ctx()).into_string();
        assert!(html.contains("Anna"));
        assert!(html.contains("All the best"));
        assert!(html.contains("— Max"));
    }

    #[test]
    fn page_links_static_assets_relative_to_root() {
        let html = render_page(&full_recipient(), &ctx()).into_string();
        assert!(html.contains(r#"href="../../static/style.css""#));
        assert!(html.contains(r#"src="../../static/page.js""#));
    }

    #[test]
    fn page_has_canonical_url() {
        let html = render_page(&full_recipient(), &ctx()).into_string();
        assert!(html.contains(&format!(r#"rel="canonical" href="{URL}""#)));
    }

    #[test]
    fn page_applies_theme_class() {
        let mut r = full_recipient();
        r.theme = "aurora".to_string();
        let html = render_page(&r, &ctx()).into_string();
        assert!(html.contains(r#"class="theme-aurora""#));
        assert!(html.contains(r#"data-theme="aurora""#));
    }

    #[test]
    fn page_renders_media_sections() {
        let html = render_page(&full_recipient(), &ctx()).into_string();
        assert!(html.contains("hero-img"));
        assert!(html.contains(r#"src="https://img.example/hero.jpg""#));
        assert!(html.contains(r#"src="g1.jpg""#));
        assert!(html.contains(r#"src="g2.jpg""#));
        assert!(html.contains(r#"id="musicBtn""#));
        assert!(html.contains(r#"data-music="https://audio.example/song.mp3""#));
        assert!(html.contains(r#"id="bgMusic""#));
    }

    #[test]
    fn gallery_keeps_order() {
        let html = render_page(&full_recipient(), &ctx()).into_string();
        let first = html.find("g1.jpg").unwrap();
        let second = html.find("g2.jpg").unwrap();
        assert!(first < second);
    }

    #[test]
    fn youtube_video_is_embedded() {
        let html = render_page(&full_recipient(), &ctx()).into_string();
        assert!(html.contains("<iframe"));
        assert!(html.contains("https://www.youtube.com/embed/ABC123?rel=0&amp;modestbranding=1"));
    }

    #[test]
    fn other_video_kind_uses_video_element() {
        let mut r = full_recipient();
        r.video_url = Some("https://cdn.example/clip.mp4".to_string());
        r.video_type = VideoKind::Other("mp4".to_string());
        let html = render_page(&r, &ctx()).into_string();
        assert!(!html.contains("<iframe"));
        assert!(html.contains(r#"src="https://cdn.example/clip.mp4""#));
        assert!(html.contains("<video"));
    }

    #[test]
    fn empty_record_renders_without_media_sections() {
        let r = recipient("bare");
        let html = render_page(&r, &ctx()).into_string();
        assert!(!html.contains("hero-img"));
        assert!(!html.contains("gallery"));
        assert!(!html.contains("<iframe"));
        assert!(!html.contains("<video"));
        assert!(!html.contains("musicBtn"));
        assert!(html.contains(r#"id="shareBtn""#));
        assert!(html.contains(r#"id="year""#));
    }

    #[test]
    fn free_text_is_escaped() {
        let mut r = recipient("x");
        r.to_name = "<script>alert('to')</script>".to_string();
        r.message = "<script>alert('msg')</script>".to_string();
        r.from_name = "<b>Max</b>".to_string();
        r.title = "<script>t</script>".to_string();
        let html = render_page(&r, &ctx()).into_string();
        assert!(!html.contains("<script>alert"));
        assert!(!html.contains("<script>t"));
        assert!(!html.contains("<b>Max"));
        assert!(html.contains("&lt;script&gt;alert"));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut r = recipient("x");
        r.hero_image_url = Some(r#"x.jpg" onerror="alert(1)"#.to_string());
        let html = render_page(&r, &ctx()).into_string();
        assert!(!html.contains(r#"onerror="alert(1)""#));
        assert!(html.contains("&quot;"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let r = full_recipient();
        let a = render_page(&r, &ctx()).into_string();
        let b = render_page(&r, &ctx()).into_string();
        assert_eq!(a, b);
    }

    #[test]
    fn index_lists_recipients_in_order() {
        let mut first = recipient("zed");
        first.to_name = "Zed".to_string();
        let mut second = recipient("amy");
        second.to_name = "Amy".to_string();

        let html = render_index("QR Gifts", &[first, second]).into_string();
        assert!(html.contains("<h1>QR Gifts</h1>"));
        assert!(html.contains(r#"href="p/zed/""#));
        assert!(html.contains(r#"href="p/amy/""#));
        assert!(html.find("p/zed/").unwrap() < html.find("p/amy/").unwrap());
        assert!(html.contains("— Zed"));
        assert!(html.contains(r#"href="static/style.css""#));
    }

    #[test]
    fn index_escapes_display_name() {
        let mut r = recipient("x");
        r.to_name = "<script>alert(1)</script>".to_string();
        let html = render_index("QR Gifts", &[r]).into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn index_without_recipients() {
        let html = render_index("QR Gifts", &[]).into_string();
        assert!(html.contains("No pages yet."));
        assert!(!html.contains("<ul"));
    }

    #[test]
    fn index_omits_dash_for_nameless_recipient() {
        let html = render_index("QR Gifts", &[recipient("x")]).into_string();
        assert!(!html.contains(" — "));
    }
}
