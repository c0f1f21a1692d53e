//! Content classification and markdown rendering for course files.
//!
//! Course material lives in the backing repository as plain files; how a
//! file is presented is decided purely by its filename extension. Markdown
//! files additionally get their body fetched and rendered to HTML.

use comrak::{Options, markdown_to_html};
use serde::{Deserialize, Serialize};

/// How a content file should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKind {
    /// Markdown text, rendered inline.
    Markdown,
    /// Image, embedded directly.
    Image,
    /// Video, played inline.
    Video,
    /// Document shown through an external viewer embed.
    Document,
    /// Anything else: offered as a plain download link.
    Download,
}

/// Classify a content file by its filename extension (case-insensitive).
///
/// Pure function of the name; unknown or missing extensions fall through to
/// [`RenderKind::Download`].
#[must_use]
pub fn classify(name: &str) -> RenderKind {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("md") => RenderKind::Markdown,
        Some("png" | "jpg" | "jpeg" | "gif") => RenderKind::Image,
        Some("mp4" | "webm" | "ogg") => RenderKind::Video,
        Some("pdf" | "doc" | "docx" | "html" | "txt") => RenderKind::Document,
        _ => RenderKind::Download,
    }
}

/// Render markdown course text to HTML.
#[must_use]
pub fn render_markdown(text: &str) -> String {
    markdown_to_html(text, &Options::default())
}

/// A renderable descriptor for one opened content file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    /// File name.
    pub name: String,
    /// Path within the course tree.
    pub path: String,
    /// Presentation kind.
    pub kind: RenderKind,
    /// Direct download URL.
    pub download_url: String,
    /// Raw text body; markdown only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Rendered HTML body; markdown only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_markdown() {
        assert_eq!(classify("notes.md"), RenderKind::Markdown);
        assert_eq!(classify("README.MD"), RenderKind::Markdown);
    }

    #[test]
    fn test_classify_images() {
        assert_eq!(classify("cover.png"), RenderKind::Image);
        assert_eq!(classify("photo.JPEG"), RenderKind::Image);
        assert_eq!(classify("anim.gif"), RenderKind::Image);
    }

    #[test]
    fn test_classify_videos() {
        assert_eq!(classify("lecture1.mp4"), RenderKind::Video);
        assert_eq!(classify("clip.webm"), RenderKind::Video);
        assert_eq!(classify("audio.ogg"), RenderKind::Video);
    }

    #[test]
    fn test_classify_documents() {
        assert_eq!(classify("syllabus.pdf"), RenderKind::Document);
        assert_eq!(classify("handout.docx"), RenderKind::Document);
        assert_eq!(classify("page.html"), RenderKind::Document);
        assert_eq!(classify("plain.txt"), RenderKind::Document);
    }

    #[test]
    fn test_classify_fallback() {
        assert_eq!(classify("archive.zip"), RenderKind::Download);
        assert_eq!(classify("Makefile"), RenderKind::Download);
        assert_eq!(classify(""), RenderKind::Download);
    }

    #[test]
    fn test_render_markdown_basic() {
        let html = render_markdown("# Title\n\nSome *emphasis*.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }
}
