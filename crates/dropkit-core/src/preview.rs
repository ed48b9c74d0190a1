//! Preview resolution
//!
//! Total, side-effect-free mapping from (MIME type, public URL) to the kind of
//! preview the presentation layer should surface. Rendering an image or
//! opening a PDF link is delegated to the viewer collaborator.

use serde::{Deserialize, Serialize};

use crate::validation::normalize_mime_type;

/// How an uploaded file should be previewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum PreviewSpec {
    /// Nothing to preview.
    None,
    /// Render the image at this URL in-process.
    Image(String),
    /// Offer a link that opens the PDF in an external browsing surface.
    PdfLink(String),
}

/// Decide which preview to surface for an uploaded file.
pub fn resolve_preview(mime_type: Option<&str>, url: Option<&str>) -> PreviewSpec {
    let (Some(mime_type), Some(url)) = (mime_type, url) else {
        return PreviewSpec::None;
    };

    let mime = normalize_mime_type(mime_type);
    if mime.starts_with("image/") {
        PreviewSpec::Image(url.to_string())
    } else if mime == "application/pdf" {
        PreviewSpec::PdfLink(url.to_string())
    } else {
        PreviewSpec::None
    }
}
