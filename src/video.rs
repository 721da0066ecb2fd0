//! Video link resolution.
//!
//! Recipients may point at a video. When the source is YouTube, the raw share
//! link is rewritten into an embeddable player URL so the page can show it in
//! an `<iframe>`. Two link shapes are recognized:
//!
//! - short links: `https://youtu.be/<id>`
//! - watch links: `https://www.youtube.com/watch?v=<id>` (any host, `?v=` or `&v=`)
//!
//! Anything else is passed through unchanged and left for the template to
//! handle as a plain `<video>` source.

use serde::Serialize;
use std::fmt;

use crate::recipients::Recipient;

const EMBED_BASE: &str = "https://www.youtube.com/embed/";
const PLAYER_OPTIONS: &str = "rel=0&modestbranding=1";

/// Declared source of a recipient's video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum VideoKind {
    #[default]
    YouTube,
    /// Any other tag, lowercased, carried through to the template verbatim.
    Other(String),
}

impl VideoKind {
    /// Parse a `video_type` cell. Empty input is YouTube.
    pub fn parse(raw: &str) -> Self {
        let tag = raw.trim().to_lowercase();
        match tag.as_str() {
            "" | "youtube" => VideoKind::YouTube,
            _ => VideoKind::Other(tag),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            VideoKind::YouTube => "youtube",
            VideoKind::Other(tag) => tag,
        }
    }
}

impl fmt::Display for VideoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<VideoKind> for String {
    fn from(kind: VideoKind) -> Self {
        kind.as_str().to_string()
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Id characters at the start of `rest`, if there are any.
fn leading_id(rest: &str) -> Option<&str> {
    let end = rest.find(|c: char| !is_id_char(c)).unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

/// First occurrence of `marker` that is followed by a video id.
fn id_after<'a>(url: &'a str, marker: &str) -> Option<&'a str> {
    url.match_indices(marker)
        .find_map(|(i, _)| leading_id(&url[i + marker.len()..]))
}

/// First `v=` query parameter (after `?` or `&`) that carries an id.
fn query_id(url: &str) -> Option<&str> {
    url.match_indices("v=")
        .filter(|(i, _)| matches!(url[..*i].chars().next_back(), Some('?' | '&')))
        .find_map(|(i, _)| leading_id(&url[i + 2..]))
}

/// Extract a YouTube video id from a share link.
///
/// A `v=` query parameter takes precedence over a `youtu.be/` path segment.
pub fn youtube_video_id(url: &str) -> Option<&str> {
    query_id(url).or_else(|| id_after(url, "youtu.be/"))
}

/// Map a YouTube share link to its embeddable player URL.
///
/// Returns the (trimmed) input unchanged when no video id is found.
pub fn youtube_embed_url(raw: &str) -> String {
    let url = raw.trim();
    match youtube_video_id(url) {
        Some(id) => format!("{EMBED_BASE}{id}?{PLAYER_OPTIONS}"),
        None => url.to_string(),
    }
}

/// Embeddable URL for a recipient's video, when it has a YouTube one.
///
/// Other video kinds get `None`; the page then falls back to the raw
/// `video_url`.
pub fn embed_url_for(recipient: &Recipient) -> Option<String> {
    match (&recipient.video_url, &recipient.video_type) {
        (Some(url), VideoKind::YouTube) => Some(youtube_embed_url(url)),
        _ => None,
    }
}
