use crate::artifact::{clean_payload, ArtifactError, ArtifactRenderer, Download, Glyph, RenderedArtifact};
use image::{ImageFormat, Luma};
use moka::sync::Cache;
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

const PREVIEW_CACHE_CAPACITY: u64 = 512;

/// Renders codes at error-correction level M, black on white.
///
/// Previews are memoized by (text, size); identical input always yields identical output.
pub struct QrRenderer {
    output_dir: PathBuf,
    previews: Cache<(String, u32), String>
}

impl QrRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            previews: Cache::new(PREVIEW_CACHE_CAPACITY)
        }
    }

    fn encode(text: &str) -> Result<QrCode, ArtifactError> {
        Ok(QrCode::with_error_correction_level(text.as_bytes(), EcLevel::M)?)
    }

    fn svg(text: &str, size: u32) -> Result<String, ArtifactError> {
        let markup = Self::encode(text)?
            .render::<svg::Color>()
            .min_dimensions(size, size)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build();

        Ok(markup)
    }

    fn save_png(&self, text: &str, size: u32, filename: &str) -> Result<PathBuf, ArtifactError> {
        let image = Self::encode(text)?
            .render::<Luma<u8>>()
            .min_dimensions(size, size)
            .build();

        if image.width() == 0 || image.height() == 0 {
            return Err(ArtifactError::EmptySurface);
        }

        fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join(filename);
        image.save_with_format(&path, ImageFormat::Png)?;

        Ok(path)
    }
}

impl ArtifactRenderer for QrRenderer {
    fn render_preview(&self, text: &str, size: u32) -> Glyph {
        let text = clean_payload(text);

        if text.is_empty() {
            return Glyph::Placeholder;
        }

        let key = (text, size);

        if let Some(markup) = self.previews.get(&key) {
            return Glyph::Svg(markup);
        }

        match Self::svg(&key.0, size) {
            Ok(markup) => {
                self.previews.insert(key, markup.clone());
                Glyph::Svg(markup)
            }
            Err(error) => {
                warn!("QR preview could not be rendered: {error}");
                Glyph::Placeholder
            }
        }
    }

    fn render_downloadable(&self, text: &str, preview_size: u32, download_size: u32, filename: &str) -> RenderedArtifact {
        let preview = self.render_preview(text, preview_size);
        let text = clean_payload(text);

        if text.is_empty() {
            return RenderedArtifact { preview, download: Download::Skipped };
        }

        let download = match self.save_png(&text, download_size, filename) {
            Ok(path) => {
                debug!("QR artifact saved to {}", path.display());
                Download::Saved(path)
            }
            Err(error) => {
                warn!("QR download unavailable for {filename}: {error}");
                Download::Unavailable(error.to_string())
            }
        };

        RenderedArtifact { preview, download }
    }
}
