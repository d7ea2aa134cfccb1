mod errors;
mod qr_renderer;

use crate::models::EMPTY_FIELD;
use crate::types::{QrType, RowNumber};
use std::path::PathBuf;

pub use errors::ArtifactError;
pub use qr_renderer::QrRenderer;

/// Inline preview of a scannable code.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Glyph {
    /// Self-contained SVG markup.
    Svg(String),
    /// Shown when there is nothing to encode or encoding failed.
    Placeholder
}

impl Glyph {
    pub fn as_markup(&self) -> &str {
        match self {
            Glyph::Svg(markup) => markup,
            Glyph::Placeholder => EMPTY_FIELD
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Download {
    Saved(PathBuf),
    Unavailable(String),
    /// No code to offer for download.
    Skipped
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RenderedArtifact {
    pub preview: Glyph,
    pub download: Download
}

/// Turns scannable text into previews and downloadable images.
///
/// Rendering never fails a row: problems degrade to [`Glyph::Placeholder`] or
/// [`Download::Unavailable`].
pub trait ArtifactRenderer: Send + Sync {
    fn render_preview(&self, text: &str, size: u32) -> Glyph;

    fn render_downloadable(&self, text: &str, preview_size: u32, download_size: u32, filename: &str) -> RenderedArtifact;
}

/// `qr_{TYPE}_{row}_{request_id}.png`, with anything outside `[A-Za-z0-9._-]` replaced by `_`.
pub fn artifact_file_name(qr_type: QrType, row_number: RowNumber, request_id: &str) -> String {
    let request_id: String = request_id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();

    format!("qr_{qr_type}_{row_number}_{request_id}.png")
}

/// Strips line breaks and surrounding whitespace from a returned code.
pub fn clean_payload(text: &str) -> String {
    text.replace(['\r', '\n'], "").trim().to_string()
}
